//! Fixed-depth negamax search driven in small steps.
//!
//! The coordinator owns an explicit node stack instead of recursing, so a
//! caller can advance it a bounded number of nodes at a time and keep
//! servicing other work (the protocol layer reads input between steps).
//!
//! ```text
//!   Idle --load--> Init --start--> Searching --step..--> Done --take_result--> Idle
//!     ^                                                                         |
//!     +------------------------------- reset (from any state) -----------------+
//! ```

use tracing::{debug, trace, warn};

use crate::{
    board::BoardState,
    error::{ChessError, ChessResult},
    eval::{score_successor, MATE_SCORE},
    executor::apply,
    movegen::{legal_moves_into, MAX_MOVES},
    sorter::StreamSorter,
    types::Move,
    uci::move_to_uci,
};

/// Deepest search the coordinator accepts; deeper requests are clamped.
pub const MAX_DEPTH: u8 = 16;

/// Fifty-move counter value at which a position scores as drawn.
const FIFTY_MOVE_PLIES: u8 = 100;

const INFINITY: i32 = i32::MAX / 2;

/// Nodes advanced per `step` call by the blocking `search` wrapper.
const SEARCH_CHUNK: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    /// Root position latched, waiting for `start`.
    Init,
    Searching,
    /// Result ready for `take_result`.
    Done,
}

/// Result of a search operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The best move found (None if no legal moves)
    pub best_move: Option<Move>,
    /// Evaluation score in centipawns from the side to move's perspective
    pub score: i32,
    /// Search depth requested
    pub depth: u8,
    /// Number of nodes visited
    pub nodes: u64,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    mv: Move,
    board: BoardState,
    /// Static score of `board` from the mover's view.
    score: i32,
}

#[derive(Debug)]
struct SearchNode {
    /// Plies left below this node.
    depth: u8,
    /// Move that led here from the parent; `None` at the root.
    via: Option<Move>,
    /// Candidates, best static score first.
    candidates: Vec<Candidate>,
    next: usize,
    alpha: i32,
    beta: i32,
    best_score: i32,
    best_move: Option<Move>,
}

impl SearchNode {
    /// Fold a child's score (already negated to this node's view) in.
    fn record(&mut self, mv: Move, score: i32) {
        if score > self.best_score {
            self.best_score = score;
            self.best_move = Some(mv);
        }
        if score > self.alpha {
            self.alpha = score;
        }
    }

    fn exhausted(&self) -> bool {
        self.next >= self.candidates.len() || self.alpha >= self.beta
    }
}

enum Expansion {
    Interior(SearchNode),
    /// Node needs no children; the score is from its side to move's view.
    Terminal(i32),
}

pub struct SearchCoordinator {
    state: SearchState,
    root: Option<BoardState>,
    max_depth: u8,
    stack: Vec<SearchNode>,
    sorter: StreamSorter<i32, Candidate>,
    moves: Vec<Move>,
    result: Option<SearchResult>,
    nodes: u64,
    diagnostics: Vec<String>,
}

impl Default for SearchCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchCoordinator {
    pub fn new() -> Self {
        Self {
            state: SearchState::Idle,
            root: None,
            max_depth: 1,
            stack: Vec::with_capacity(MAX_DEPTH as usize + 1),
            sorter: StreamSorter::new(MAX_MOVES),
            moves: Vec::with_capacity(MAX_MOVES),
            result: None,
            nodes: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn is_searching(&self) -> bool {
        self.state == SearchState::Searching
    }

    /// Nodes visited by the current or last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Latch a root position and depth. Refused while a search runs; any
    /// unread result from a finished search is discarded.
    pub fn load(&mut self, board: BoardState, max_depth: u8) -> ChessResult<()> {
        if self.state == SearchState::Searching {
            return Err(ChessError::SearchBusy);
        }
        board.validate()?;
        self.root = Some(board);
        self.max_depth = max_depth.clamp(1, MAX_DEPTH);
        self.result = None;
        self.state = SearchState::Init;
        Ok(())
    }

    /// Begin searching the latched root. Returns false, changing nothing,
    /// unless a root is loaded and no search is running.
    pub fn start(&mut self) -> bool {
        let root = match (self.state, self.root) {
            (SearchState::Init, Some(root)) => root,
            (state, _) => {
                debug!(?state, "search start ignored");
                return false;
            }
        };
        self.stack.clear();
        self.nodes = 0;
        self.state = SearchState::Searching;

        match self.expand(root, self.max_depth, None, -INFINITY, INFINITY) {
            Expansion::Interior(node) => {
                self.diagnostics.push(format!(
                    "search depth {} candidates {}",
                    self.max_depth,
                    node.candidates.len()
                ));
                debug!(depth = self.max_depth, candidates = node.candidates.len(), "search started");
                self.stack.push(node);
            }
            Expansion::Terminal(score) => {
                debug!(score, "root has no legal moves");
                self.publish(None, score);
            }
        }
        true
    }

    /// Advance the search by at most `budget` nodes and report the state
    /// afterwards. Does nothing outside `Searching`.
    pub fn step(&mut self, budget: u32) -> SearchState {
        for _ in 0..budget {
            if self.state != SearchState::Searching {
                break;
            }
            self.advance();
        }
        self.state
    }

    /// Hand out the finished result, returning to `Idle`. `None` unless the
    /// search is `Done`.
    pub fn take_result(&mut self) -> Option<SearchResult> {
        if self.state != SearchState::Done {
            return None;
        }
        self.state = SearchState::Idle;
        self.root = None;
        self.result.take()
    }

    /// Drop all search state from any state. Nothing from an interrupted
    /// search is ever published.
    pub fn reset(&mut self) {
        if self.state == SearchState::Searching {
            debug!(nodes = self.nodes, "search abandoned");
        }
        self.state = SearchState::Idle;
        self.root = None;
        self.stack.clear();
        self.sorter.clear();
        self.result = None;
        self.nodes = 0;
        self.diagnostics.clear();
    }

    /// Diagnostic lines produced since the last drain.
    pub fn drain_diagnostics(&mut self) -> std::vec::Drain<'_, String> {
        self.diagnostics.drain(..)
    }

    /// Run a whole search to completion, discarding any previous state.
    pub fn search(&mut self, board: BoardState, depth: u8) -> ChessResult<SearchResult> {
        self.reset();
        self.load(board, depth)?;
        self.start();
        while self.step(SEARCH_CHUNK) == SearchState::Searching {}
        self.take_result().ok_or(ChessError::SearchBusy)
    }

    /// One unit of work: open the next candidate of the top node, or close
    /// the top node and hand its score to the parent.
    fn advance(&mut self) {
        let ply = self.stack.len();
        let Some(node) = self.stack.last_mut() else {
            self.state = SearchState::Idle;
            return;
        };

        if node.exhausted() {
            let Some(done) = self.stack.pop() else {
                return;
            };
            match (self.stack.last_mut(), done.via) {
                (Some(parent), Some(mv)) => parent.record(mv, -done.best_score),
                _ => self.publish(done.best_move, done.best_score),
            }
            return;
        }

        let cand = node.candidates[node.next];
        node.next += 1;
        let (alpha, beta, child_depth) = (node.alpha, node.beta, node.depth - 1);
        self.nodes += 1;

        // `ply` counts the nodes on the stack, so the child sits at that depth.
        let score = if cand.board.is_checkmated(cand.board.side_to_move()) {
            MATE_SCORE - ply as i32
        } else if cand.board.ply50 >= FIFTY_MOVE_PLIES {
            0
        } else if child_depth == 0 {
            cand.score
        } else {
            match self.expand(cand.board, child_depth, Some(cand.mv), -beta, -alpha) {
                Expansion::Interior(child) => {
                    self.stack.push(child);
                    return;
                }
                Expansion::Terminal(score) => -score,
            }
        };

        if let Some(node) = self.stack.last_mut() {
            node.record(cand.mv, score);
        }
    }

    /// Generate, score and order the children of `board`.
    fn expand(
        &mut self,
        board: BoardState,
        depth: u8,
        via: Option<Move>,
        alpha: i32,
        beta: i32,
    ) -> Expansion {
        legal_moves_into(&board, &mut self.moves);
        if self.moves.is_empty() {
            let ply = self.stack.len() as i32;
            let score = if board.in_check(board.side_to_move()) {
                -(MATE_SCORE - ply)
            } else {
                0
            };
            return Expansion::Terminal(score);
        }

        self.sorter.clear();
        for &mv in &self.moves {
            let child = match apply(&board, mv) {
                Ok(child) => child,
                Err(err) => {
                    warn!(%err, "generated move failed to apply");
                    continue;
                }
            };
            let score = score_successor(&child);
            // Negated key: best static score comes out first.
            if let Err(err) = self.sorter.push(-score, Candidate { mv, board: child, score }) {
                warn!(%err, "candidate dropped");
            }
        }
        let candidates: Vec<Candidate> = self.sorter.finish().map(|(_, c)| c).collect();
        if candidates.is_empty() {
            return Expansion::Terminal(0);
        }
        trace!(depth, candidates = candidates.len(), "node expanded");

        Expansion::Interior(SearchNode {
            depth,
            via,
            candidates,
            next: 0,
            alpha,
            beta,
            best_score: -INFINITY,
            best_move: None,
        })
    }

    fn publish(&mut self, best_move: Option<Move>, score: i32) {
        let result = SearchResult {
            best_move,
            score,
            depth: self.max_depth,
            nodes: self.nodes,
        };
        let text = best_move.map_or_else(|| "0000".to_string(), move_to_uci);
        self.diagnostics.push(format!(
            "depth {} nodes {} score {} bestmove {}",
            result.depth, result.nodes, result.score, text
        ));
        debug!(depth = result.depth, nodes = result.nodes, score, bestmove = %text, "search done");
        self.stack.clear();
        self.result = Some(result);
        self.state = SearchState::Done;
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
