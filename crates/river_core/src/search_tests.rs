use super::*;
use crate::movegen::legal_moves;
use crate::types::{file_of, Color};
use crate::uci::replay_uci_moves;

fn board(fen: &str) -> BoardState {
    BoardState::from_fen(fen).expect("valid fen")
}

fn run(b: BoardState, depth: u8) -> SearchResult {
    SearchCoordinator::new().search(b, depth).expect("search runs")
}

#[test]
fn test_finds_back_rank_mate() {
    let b = board("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    for depth in 1..=3 {
        let result = run(b, depth);
        assert_eq!(result.best_move, Some(Move::new(0, 56)), "depth {depth}");
        assert_eq!(result.score, MATE_SCORE - 1);
    }
}

#[test]
fn test_takes_hanging_queen() {
    let b = board("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1");
    let result = run(b, 2);
    assert_eq!(result.best_move, Some(Move::new(11, 35))); // d2xd5
    assert!(result.score > 300);
}

#[test]
fn test_avoids_losing_queen() {
    // Black to move; the queen on d5 is attacked by the rook and must step off the file.
    let b = board("4k3/8/8/3q4/8/8/3R4/4K3 b - - 0 1");
    let result = run(b, 2);
    let mv = result.best_move.expect("moves exist");
    assert_ne!(file_of(mv.to), file_of(mv.from), "queen stayed in the rook's line");
}

#[test]
fn test_mated_root_has_no_move() {
    let replay = replay_uci_moves(
        BoardState::startpos(),
        "e2e4 e7e5 f1c4 b8c6 d1h5 g8f6 h5f7".split_whitespace(),
    );
    assert_eq!(replay.applied, 7);
    assert!(replay.board.is_checkmated(Color::Black));

    let result = run(replay.board, 3);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, -MATE_SCORE);
}

#[test]
fn test_stalemate_root_scores_zero() {
    let b = board("k7/8/1Q6/8/8/8/8/K7 b - - 0 1");
    assert!(legal_moves(&b).is_empty());
    let result = run(b, 2);
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, 0);
}

#[test]
fn test_fifty_move_rule_draw() {
    // Any quiet move reaches 100 and scores as a draw despite the extra rook.
    let b = board("4k3/8/8/8/8/8/8/R3K3 w - - 99 80");
    let result = run(b, 2);
    assert!(result.best_move.is_some());
    assert_eq!(result.score, 0);
}

#[test]
fn test_result_is_legal_from_startpos() {
    let b = BoardState::startpos();
    let result = run(b, 3);
    let mv = result.best_move.expect("moves exist");
    assert!(legal_moves(&b).contains(&mv));
    assert_eq!(result.depth, 3);
    assert!(result.nodes >= 20);
}

#[test]
fn test_stepwise_matches_blocking_search() {
    let b = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let expected = run(b, 2);

    let mut coordinator = SearchCoordinator::new();
    coordinator.load(b, 2).expect("valid board");
    assert_eq!(coordinator.state(), SearchState::Init);
    assert!(coordinator.start());
    let mut steps = 0;
    while coordinator.step(1) == SearchState::Searching {
        steps += 1;
        assert!(coordinator.take_result().is_none());
    }
    assert!(steps > 1);
    assert_eq!(coordinator.take_result(), Some(expected));
    assert_eq!(coordinator.state(), SearchState::Idle);
}

#[test]
fn test_state_machine_guards() {
    let mut coordinator = SearchCoordinator::new();
    // Nothing loaded
    assert!(!coordinator.start());
    assert_eq!(coordinator.step(10), SearchState::Idle);
    assert!(coordinator.take_result().is_none());

    coordinator.load(BoardState::startpos(), 4).expect("valid board");
    assert!(coordinator.start());
    assert!(coordinator.is_searching());
    // A second start is ignored, a second load refused.
    assert!(!coordinator.start());
    assert_eq!(
        coordinator.load(BoardState::startpos(), 2),
        Err(ChessError::SearchBusy)
    );
    assert!(coordinator.is_searching());
}

#[test]
fn test_reset_publishes_nothing() {
    let mut coordinator = SearchCoordinator::new();
    coordinator.load(BoardState::startpos(), 4).expect("valid board");
    coordinator.start();
    coordinator.step(3);
    coordinator.reset();
    assert_eq!(coordinator.state(), SearchState::Idle);
    assert!(coordinator.take_result().is_none());
    assert_eq!(coordinator.drain_diagnostics().count(), 0);
    assert_eq!(coordinator.step(100), SearchState::Idle);
}

#[test]
fn test_depth_is_clamped() {
    let mut coordinator = SearchCoordinator::new();
    let b = board("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
    let result = coordinator.search(b, 0).expect("search runs");
    assert_eq!(result.depth, 1);

    coordinator.load(b, 200).expect("valid board");
    assert!(coordinator.start());
    coordinator.reset();
}

#[test]
fn test_invalid_board_refused() {
    let mut b = BoardState::startpos();
    b.king_black = b.king_white;
    let mut coordinator = SearchCoordinator::new();
    assert!(matches!(
        coordinator.load(b, 2),
        Err(ChessError::InvalidBoard { .. })
    ));
    assert_eq!(coordinator.state(), SearchState::Idle);
}

#[test]
fn test_diagnostics_report_search() {
    let mut coordinator = SearchCoordinator::new();
    coordinator
        .search(BoardState::startpos(), 1)
        .expect("search runs");
    let lines: Vec<String> = coordinator.drain_diagnostics().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("depth 1 nodes 20 "));
    assert_eq!(coordinator.drain_diagnostics().count(), 0);
}
