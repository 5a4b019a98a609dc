//! UCI line protocol front-end.
//!
//! Bytes arrive one at a time through `receive` and are assembled into
//! lines; each complete line is dispatched immediately, so `uci`, `isready`
//! and `debug` are answered even while a search is running. The search
//! itself only advances in `tick`. Output is queued and drained by the
//! transport with `take_output` or `write_output`.

use std::collections::VecDeque;
use std::io::{self, Write};

use river_core::{
    move_to_uci, replay_uci_moves, BoardState, SearchCoordinator, SearchState,
};
use tracing::{debug, trace, warn};

use crate::config::EngineConfig;

/// Longest accepted command line in bytes. Longer lines are dropped whole.
pub const MAX_LINE_LEN: usize = 4096;
/// Queued output above which `receive` stops taking input.
pub const OUTBOX_HIGH_WATER: usize = 64 * 1024;
/// Maximum payload of one `info string` line in bytes.
pub const INFO_PAYLOAD_LIMIT: usize = 240;

/// Per-connection protocol state.
#[derive(Debug, Default)]
pub struct ProtocolSession {
    debug: bool,
    searching: bool,
    line: Vec<u8>,
    /// Inside an overlong line; drop bytes until the next newline.
    discarding: bool,
    outbox: VecDeque<u8>,
}

impl ProtocolSession {
    pub fn reset(&mut self) {
        self.debug = false;
        self.searching = false;
        self.line.clear();
        self.discarding = false;
        self.outbox.clear();
    }

    fn emit(&mut self, line: &str) {
        self.outbox.extend(line.as_bytes());
        self.outbox.push_back(b'\n');
    }
}

pub struct ProtocolHandler {
    config: EngineConfig,
    session: ProtocolSession,
    board: BoardState,
    coordinator: SearchCoordinator,
    quit: bool,
}

impl ProtocolHandler {
    pub fn new(config: EngineConfig) -> Self {
        let config = config.normalized();
        let session = ProtocolSession {
            debug: config.debug,
            ..ProtocolSession::default()
        };
        Self {
            config,
            session,
            board: BoardState::startpos(),
            coordinator: SearchCoordinator::new(),
            quit: false,
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn is_searching(&self) -> bool {
        self.session.searching
    }

    pub fn debug(&self) -> bool {
        self.session.debug
    }

    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Bytes of output waiting to be written.
    pub fn pending_output(&self) -> usize {
        self.session.outbox.len()
    }

    /// Offer one inbound byte. Returns false if it was not taken: after
    /// `quit`, or while more than `OUTBOX_HIGH_WATER` bytes of output wait.
    /// A refused byte should be offered again once output has drained.
    pub fn receive(&mut self, byte: u8) -> bool {
        if self.quit || self.session.outbox.len() > OUTBOX_HIGH_WATER {
            return false;
        }

        if byte == b'\n' {
            if self.session.discarding {
                self.session.discarding = false;
                return true;
            }
            let mut line = std::mem::take(&mut self.session.line);
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let text = String::from_utf8_lossy(&line);
            self.dispatch(&text);
            // Hand the allocation back for the next line.
            line.clear();
            self.session.line = line;
        } else if !self.session.discarding {
            if self.session.line.len() >= MAX_LINE_LEN {
                warn!(limit = MAX_LINE_LEN, "overlong command line discarded");
                self.session.line.clear();
                self.session.discarding = true;
            } else {
                self.session.line.push(byte);
            }
        }
        true
    }

    /// Advance a running search by the configured node budget and report
    /// the result once it is done.
    pub fn tick(&mut self) -> SearchState {
        if !self.session.searching {
            return self.coordinator.state();
        }
        let state = self.coordinator.step(self.config.nodes_per_tick);
        self.forward_diagnostics();
        match state {
            SearchState::Searching => {}
            SearchState::Done => {
                let best = self.coordinator.take_result().and_then(|r| r.best_move);
                let text = best.map_or_else(|| "0000".to_string(), move_to_uci);
                self.session.emit(&format!("bestmove {text}"));
                self.session.searching = false;
            }
            SearchState::Idle | SearchState::Init => {
                self.session.searching = false;
            }
        }
        self.coordinator.state()
    }

    /// Queue `info string <text>` if debug output is on.
    pub fn post_diagnostic(&mut self, text: &str) {
        if !self.session.debug {
            return;
        }
        let mut payload: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        if payload.len() > INFO_PAYLOAD_LIMIT {
            let mut end = INFO_PAYLOAD_LIMIT;
            while !payload.is_char_boundary(end) {
                end -= 1;
            }
            payload.truncate(end);
        }
        self.session.emit(&format!("info string {payload}"));
    }

    /// Remove and return everything queued for output.
    pub fn take_output(&mut self) -> Vec<u8> {
        self.session.outbox.drain(..).collect()
    }

    /// Write all queued output to `out` and flush it.
    pub fn write_output(&mut self, out: &mut impl Write) -> io::Result<()> {
        if self.session.outbox.is_empty() {
            return Ok(());
        }
        let (front, back) = self.session.outbox.as_slices();
        out.write_all(front)?;
        out.write_all(back)?;
        self.session.outbox.clear();
        out.flush()
    }

    /// Back to a fresh session on the start position; any search is dropped.
    pub fn reset(&mut self) {
        self.coordinator.reset();
        self.session.reset();
        self.session.debug = self.config.debug;
        self.board = BoardState::startpos();
        self.quit = false;
    }

    fn dispatch(&mut self, line: &str) {
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            return;
        };
        debug!(command = cmd, searching = self.session.searching, "dispatch");

        match cmd {
            "uci" => {
                let id_name = format!("id name {}", self.config.name);
                let id_author = format!("id author {}", self.config.author);
                self.session.emit(&id_name);
                self.session.emit(&id_author);
                self.session.emit("uciok");
            }
            "isready" => self.session.emit("readyok"),
            "debug" => match parts.next() {
                Some("on") => self.session.debug = true,
                Some("off") => self.session.debug = false,
                other => warn!(?other, "debug expects on or off"),
            },
            "ucinewgame" => {}
            "position" | "go" if self.session.searching => {
                warn!(command = cmd, "ignored while searching");
            }
            "position" => self.set_position(parts.collect()),
            "go" => self.go(parts.collect()),
            "quit" => {
                self.coordinator.reset();
                self.session.searching = false;
                self.quit = true;
            }
            other => trace!(command = other, "unknown command ignored"),
        }
    }

    fn set_position(&mut self, tokens: Vec<&str>) {
        let (start, rest) = match tokens.split_first() {
            Some((&"startpos", rest)) => (BoardState::startpos(), rest),
            Some((&"fen", rest)) => {
                let fen_len = rest.iter().position(|t| *t == "moves").unwrap_or(rest.len());
                match BoardState::from_fen(&rest[..fen_len].join(" ")) {
                    Ok(board) => (board, &rest[fen_len..]),
                    Err(err) => {
                        warn!(%err, "position unchanged");
                        self.post_diagnostic(&format!("position error: {err}"));
                        return;
                    }
                }
            }
            _ => {
                warn!("position expects startpos or fen");
                return;
            }
        };

        let moves: &[&str] = match rest.split_first() {
            Some((&"moves", moves)) => moves,
            Some((extra, _)) => {
                warn!(token = *extra, "unexpected token after position");
                &[]
            }
            None => &[],
        };

        let replay = replay_uci_moves(start, moves.iter().copied());
        if let Some((token, err)) = &replay.rejected {
            warn!(token = token.as_str(), %err, applied = replay.applied, "move list aborted");
            let note = format!("move {token} rejected: {err}");
            self.post_diagnostic(&note);
        }
        self.board = replay.board;
    }

    fn go(&mut self, tokens: Vec<&str>) {
        let mut depth = self.config.max_depth;
        let mut args = tokens.into_iter();
        while let Some(token) = args.next() {
            if token == "depth" {
                match args.next().and_then(|d| d.parse::<u8>().ok()) {
                    Some(d) => depth = d,
                    None => warn!("go depth expects a number"),
                }
            }
        }

        if let Err(err) = self.coordinator.load(self.board, depth) {
            warn!(%err, "search not started");
            self.session.emit("bestmove 0000");
            return;
        }
        self.session.searching = self.coordinator.start();
    }

    fn forward_diagnostics(&mut self) {
        let lines: Vec<String> = self.coordinator.drain_diagnostics().collect();
        for line in lines {
            self.post_diagnostic(&line);
        }
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod protocol_tests;
