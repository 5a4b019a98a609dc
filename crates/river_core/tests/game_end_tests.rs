//! Game-end handling through the public API:
//! - Checkmate flags
//! - Stalemate
//! - Fifty-move rule

use river_core::{
    apply, legal_moves, legal_moves_into, replay_uci_moves, BoardState, Color, Move,
    SearchCoordinator, MATE_SCORE,
};

fn board(fen: &str) -> BoardState {
    BoardState::from_fen(fen).expect("valid fen")
}

// =============================================================================
// Checkmate Tests
// =============================================================================

#[test]
fn test_scholars_mate_flags_black() {
    let replay = replay_uci_moves(
        BoardState::startpos(),
        "e2e4 e7e5 f1c4 b8c6 d1h5 g8f6 h5f7".split_whitespace(),
    );
    assert!(replay.rejected.is_none());
    let mated = replay.board;

    assert!(legal_moves(&mated).is_empty(), "Mated side has no replies");
    assert!(mated.in_check(Color::Black));
    assert!(mated.is_checkmated(Color::Black));
    assert!(!mated.is_checkmated(Color::White));

    let result = SearchCoordinator::new()
        .search(mated, 4)
        .expect("search runs");
    assert_eq!(result.best_move, None);
}

#[test]
fn test_fools_mate_flags_white() {
    let replay = replay_uci_moves(
        BoardState::startpos(),
        "f2f3 e7e5 g2g4 d8h4".split_whitespace(),
    );
    assert_eq!(replay.applied, 4);
    assert!(replay.board.is_checkmated(Color::White));
    assert_eq!(replay.board.checkmate & 0b10, 0);
}

#[test]
fn test_moves_after_mate_are_refused() {
    let replay = replay_uci_moves(
        BoardState::startpos(),
        "f2f3 e7e5 g2g4 d8h4 e1f2".split_whitespace(),
    );
    assert_eq!(replay.applied, 4);
    assert_eq!(replay.rejected.map(|(token, _)| token).as_deref(), Some("e1f2"));
}

// =============================================================================
// Stalemate Tests
// =============================================================================

#[test]
fn test_stalemate_king_in_corner() {
    // Black king on a8, white queen on b6, white king on c7
    let b = board("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");

    let mut moves = Vec::new();
    legal_moves_into(&b, &mut moves);

    assert!(moves.is_empty(), "Stalemate position should have no legal moves");
    assert!(!b.in_check(Color::Black), "Stalemate means king is not in check");
    assert_eq!(b.checkmate, 0);
}

#[test]
fn test_stalemating_move_does_not_flag() {
    // Kh6-g6 leaves the black king on g8 boxed in by king and pawn.
    let before = board("6k1/6P1/7K/8/8/8/8/8 w - - 0 1");
    let after = apply(&before, Move::new(47, 46)).expect("h6g6");
    assert!(legal_moves(&after).is_empty());
    assert_eq!(after.checkmate, 0);

    let result = SearchCoordinator::new().search(after, 3).expect("search runs");
    assert_eq!(result.best_move, None);
    assert_eq!(result.score, 0);
}

#[test]
fn test_search_prefers_mate_over_stalemate() {
    // Qb6 stalemates, Qb7 mates
    let b = board("k7/2K5/8/1Q6/8/8/8/8 w - - 0 1");
    let result = SearchCoordinator::new().search(b, 2).expect("search runs");
    assert_eq!(result.score, MATE_SCORE - 1);
    let mv = result.best_move.expect("white has moves");
    let after = apply(&b, mv).expect("legal");
    assert!(after.is_checkmated(Color::Black));
}

// =============================================================================
// Fifty-Move Rule Tests
// =============================================================================

#[test]
fn test_fifty_move_counter_resets_and_saturates() {
    let b = board("8/8/8/4k3/8/3K4/4P3/8 w - - 99 60");
    let quiet = apply(&b, Move::new(19, 18)).expect("d3c3");
    assert_eq!(quiet.ply50, 100);
    let pawn = apply(&b, Move::new(12, 28)).expect("e2e4");
    assert_eq!(pawn.ply50, 0);
}

#[test]
fn test_fifty_move_draw_scores_zero() {
    // A rook up, but every move runs the counter to 100.
    let b = board("8/8/8/4k3/8/4K3/8/7R w - - 99 60");
    let result = SearchCoordinator::new().search(b, 3).expect("search runs");
    assert_eq!(result.score, 0);
}
