//! Move application.
//!
//! Boards are immutable values: applying a move produces the successor and
//! leaves the input untouched, so the search keeps each node's board instead
//! of undoing moves.

use crate::{
    bitboard::Bitboard,
    board::*,
    error::{ChessError, ChessResult},
    movegen::has_legal_move,
    types::*,
    uci::move_to_uci,
};

/// Half-move counter width in the packed layout.
const PLY_MASK: u16 = 0x7FFF;
/// Fifty-move counter saturates instead of wrapping its seven bits.
const PLY50_MAX: u8 = 127;

/// Apply `mv` and return the successor board with its checkmate flags
/// recomputed for the side now to move.
///
/// The move is trusted to follow piece geometry (it came from the generator
/// or from `resolve_move` plus a legality check); structural problems such as
/// an empty source square or a malformed castle are still reported.
pub fn apply(board: &BoardState, mv: Move) -> ChessResult<BoardState> {
    let mut next = play(board, mv)?;
    next.checkmate = mate_flags(&next);
    Ok(next)
}

/// Checkmate bits for `board`: the side to move is flagged when it is in
/// check with no legal reply. Stalemate leaves the bits clear.
pub(crate) fn mate_flags(board: &BoardState) -> u8 {
    let side = board.side_to_move();
    if !board.in_check(side) || has_legal_move(board) {
        return 0;
    }
    match side {
        Color::White => CHECKMATE_WHITE,
        Color::Black => CHECKMATE_BLACK,
    }
}

/// Apply without the checkmate recompute. Legality filtering and perft use
/// this, since they only need the resulting placement.
pub(crate) fn play(board: &BoardState, mv: Move) -> ChessResult<BoardState> {
    let us = board.side_to_move();
    let them = us.other();
    let reject = |reason: &'static str| ChessError::IllegalMove {
        uci: move_to_uci(mv),
        reason,
    };

    if mv.from > 63 || mv.to > 63 {
        return Err(reject("square out of range"));
    }
    if mv.from == mv.to {
        return Err(reject("source equals destination"));
    }
    let piece = match board.piece_at(mv.from) {
        Some(piece) if piece.color == us => piece,
        _ => return Err(reject("no piece of the side to move on the source")),
    };
    if board.color_set(us).contains(mv.to) {
        return Err(reject("destination holds an own piece"));
    }
    if mv.to == board.king_sq(them) {
        return Err(reject("destination holds the enemy king"));
    }

    let last_rank = them.home_rank();
    let reaches_last_rank = piece.kind == PieceKind::Pawn && rank_of(mv.to) == last_rank;
    let mut captured = board.piece_at(mv.to).map(|p| p.kind);
    let mut next = *board;

    match mv.special {
        Special::Normal => {
            if reaches_last_rank {
                return Err(reject("pawn on the last rank must promote"));
            }
        }
        Special::PromoteQueen
        | Special::PromoteRook
        | Special::PromoteKnight
        | Special::PromoteBishop => {
            if !reaches_last_rank {
                return Err(reject("promotion without a pawn reaching the last rank"));
            }
        }
        Special::CastleKing | Special::CastleQueen => {
            let (rook_from, rook_to) = castle_rook_squares(board, us, mv)?;
            next.rooks.clear(rook_from);
            next.rooks.set(rook_to);
            next.white.clear(rook_from);
            if us == Color::White {
                next.white.set(rook_to);
            }
        }
        Special::EnPassant => {
            let victim = en_passant_victim(board, us, mv)?;
            next.pawns.clear(victim);
            next.white.clear(victim);
            captured = Some(PieceKind::Pawn);
        }
    }

    if mv.special != Special::EnPassant {
        if let Some(kind) = captured {
            if let Some(set) = next.kind_set_mut(kind) {
                set.clear(mv.to);
            }
        }
    }

    match piece.kind {
        PieceKind::King => match us {
            Color::White => next.king_white = mv.to,
            Color::Black => next.king_black = mv.to,
        },
        kind => {
            if let Some(set) = next.kind_set_mut(kind) {
                set.clear(mv.from);
            }
            let lands_as = mv.special.promotion().unwrap_or(kind);
            if let Some(set) = next.kind_set_mut(lands_as) {
                set.set(mv.to);
            }
        }
    }

    next.white.clear(mv.from);
    next.white.clear(mv.to);
    if us == Color::White {
        next.white.set(mv.to);
    }

    next.castle &= !castle_rights_lost(piece.kind, us, mv);

    next.en_passant = 0;
    if piece.kind == PieceKind::Pawn && (rank_of(mv.to) - rank_of(mv.from)).abs() == 2 {
        next.en_passant = EN_PASSANT_VALID | file_of(mv.from) as u8;
    }

    next.ply = next.ply.wrapping_add(1) & PLY_MASK;
    next.ply50 = if piece.kind == PieceKind::Pawn || captured.is_some() {
        0
    } else {
        next.ply50.saturating_add(1).min(PLY50_MAX)
    };
    next.checkmate = 0;
    Ok(next)
}

/// Rook source and destination for a castle, after checking the king's
/// path, the right and the rook itself.
fn castle_rook_squares(board: &BoardState, us: Color, mv: Move) -> ChessResult<(u8, u8)> {
    let reject = |reason: &'static str| ChessError::IllegalMove {
        uci: move_to_uci(mv),
        reason,
    };
    let home = us.home_rank();
    let king_side = mv.special == Special::CastleKing;
    let (right, king_to, rook_from, rook_to) = match (us, king_side) {
        (Color::White, true) => (CASTLE_WHITE_KING, 6, 7, 5),
        (Color::White, false) => (CASTLE_WHITE_QUEEN, 2, 0, 3),
        (Color::Black, true) => (CASTLE_BLACK_KING, 62, 63, 61),
        (Color::Black, false) => (CASTLE_BLACK_QUEEN, 58, 56, 59),
    };
    if sq(4, home) != Some(mv.from) || board.king_sq(us) != mv.from || mv.to != king_to {
        return Err(reject("castle needs the king moving two files from its home square"));
    }
    if board.castle & right == 0 {
        return Err(reject("castling right already lost"));
    }
    if !(board.rooks & board.color_set(us)).contains(rook_from) {
        return Err(reject("no rook to castle with"));
    }
    let (lo, hi) = if rook_from < mv.from {
        (rook_from, mv.from)
    } else {
        (mv.from, rook_from)
    };
    let between = (lo + 1..hi).fold(Bitboard::EMPTY, |bb, s| bb.with(s));
    if !(board.occupied() & between).is_empty() {
        return Err(reject("castle path is blocked"));
    }
    Ok((rook_from, rook_to))
}

/// Square of the pawn removed by an en-passant capture.
fn en_passant_victim(board: &BoardState, us: Color, mv: Move) -> ChessResult<u8> {
    let reject = |reason: &'static str| ChessError::IllegalMove {
        uci: move_to_uci(mv),
        reason,
    };
    if !board.pawns.contains(mv.from) || board.en_passant_square() != Some(mv.to) {
        return Err(reject("en passant needs a pawn capturing onto the passed square"));
    }
    if (file_of(mv.to) - file_of(mv.from)).abs() != 1 {
        return Err(reject("en passant must capture diagonally"));
    }
    let victim = sq(file_of(mv.to), rank_of(mv.from));
    match victim {
        Some(s) if (board.pawns & board.color_set(us.other())).contains(s) => Ok(s),
        _ => Err(reject("no pawn to capture en passant")),
    }
}

/// Castling bits cleared by a move: a king move drops both of its side's
/// rights, and touching a corner drops the right tied to that rook.
fn castle_rights_lost(kind: PieceKind, us: Color, mv: Move) -> u8 {
    let mut lost = 0;
    if kind == PieceKind::King {
        lost |= match us {
            Color::White => CASTLE_WHITE_KING | CASTLE_WHITE_QUEEN,
            Color::Black => CASTLE_BLACK_KING | CASTLE_BLACK_QUEEN,
        };
    }
    for corner in [mv.from, mv.to] {
        lost |= match corner {
            0 => CASTLE_WHITE_QUEEN,
            7 => CASTLE_WHITE_KING,
            56 => CASTLE_BLACK_QUEEN,
            63 => CASTLE_BLACK_KING,
            _ => 0,
        };
    }
    lost
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod executor_tests;
