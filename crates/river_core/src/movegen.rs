//! Candidate move generation.
//!
//! `pseudo_moves` follows piece movement rules only. `legal_moves` is the
//! same list with every move that leaves the mover's king attacked removed,
//! which is the only list the search and the protocol layer consume.
//!
//! Output order is fixed: pawns, knights, bishops, rooks, queens, king,
//! castles. Pieces are visited from a1 upwards; a pawn yields its push,
//! double push, then captures from the lower file; sliders and leapers yield
//! destinations from a1 upwards; promotions come as Q, R, N, B.

use crate::{
    attacks::*,
    bitboard::Bitboard,
    board::*,
    executor::play,
    types::*,
};

/// Upper bound on moves in any reachable position (218), rounded up.
pub const MAX_MOVES: usize = 256;

pub fn pseudo_moves(board: &BoardState) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    pseudo_moves_into(board, &mut out);
    out
}

/// Generate pseudo-legal moves into the provided buffer, reusing it across calls.
pub fn pseudo_moves_into(board: &BoardState, out: &mut Vec<Move>) {
    out.clear();
    let us = board.side_to_move();
    let them = us.other();
    let own = board.color_set(us);
    let occupied = board.occupied();
    // The enemy king is never a capture target.
    let targets = !(own | Bitboard::from_square(board.king_sq(them)));

    gen_pawns(board, us, out);
    for from in board.knights & own {
        push_all(from, knight_attacks(from) & targets, out);
    }
    for from in board.bishops & own {
        push_all(from, bishop_attacks(from, occupied) & targets, out);
    }
    for from in board.rooks & own {
        push_all(from, rook_attacks(from, occupied) & targets, out);
    }
    for from in board.queens & own {
        push_all(from, queen_attacks(from, occupied) & targets, out);
    }
    let king = board.king_sq(us);
    push_all(king, king_attacks(king) & targets, out);
    gen_castles(board, us, out);
}

pub fn legal_moves(board: &BoardState) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    legal_moves_into(board, &mut out);
    out
}

/// Generate legal moves into the provided buffer, reusing it across calls.
pub fn legal_moves_into(board: &BoardState, out: &mut Vec<Move>) {
    pseudo_moves_into(board, out);
    out.retain(|&mv| keeps_king_safe(board, mv));
}

/// True if the side to move has at least one legal move. Stops at the first.
pub fn has_legal_move(board: &BoardState) -> bool {
    let mut moves = Vec::with_capacity(64);
    pseudo_moves_into(board, &mut moves);
    moves.into_iter().any(|mv| keeps_king_safe(board, mv))
}

fn keeps_king_safe(board: &BoardState, mv: Move) -> bool {
    let us = board.side_to_move();
    if mv.special.is_castle() {
        let passed = if mv.special == Special::CastleKing {
            mv.from + 1
        } else {
            mv.from - 1
        };
        if board.in_check(us) || board.is_square_attacked(passed, us.other()) {
            return false;
        }
    }
    match play(board, mv) {
        Ok(next) => !next.in_check(us),
        Err(_) => false,
    }
}

#[inline]
fn push_all(from: u8, destinations: Bitboard, out: &mut Vec<Move>) {
    out.extend(destinations.map(|to| Move::new(from, to)));
}

fn push_pawn_move(from: u8, to: u8, promo_rank: i8, out: &mut Vec<Move>) {
    if rank_of(to) == promo_rank {
        out.extend(PROMOTIONS.iter().map(|&special| Move::with_special(from, to, special)));
    } else {
        out.push(Move::new(from, to));
    }
}

fn gen_pawns(board: &BoardState, us: Color, out: &mut Vec<Move>) {
    let (dir, start_rank, promo_rank): (i8, i8, i8) = match us {
        Color::White => (1, 1, 7),
        Color::Black => (-1, 6, 0),
    };
    let them = us.other();
    let occupied = board.occupied();
    let victims = board.color_set(them).without(board.king_sq(them));
    let ep_target = board.en_passant_square();

    for from in board.pawns & board.color_set(us) {
        let f = file_of(from);
        let r = rank_of(from);

        if let Some(to) = sq(f, r + dir) {
            if !occupied.contains(to) {
                push_pawn_move(from, to, promo_rank, out);
                if r == start_rank {
                    if let Some(to2) = sq(f, r + 2 * dir) {
                        if !occupied.contains(to2) {
                            out.push(Move::new(from, to2));
                        }
                    }
                }
            }
        }

        for df in [-1, 1] {
            let Some(to) = sq(f + df, r + dir) else {
                continue;
            };
            if victims.contains(to) {
                push_pawn_move(from, to, promo_rank, out);
            } else if ep_target == Some(to) {
                out.push(Move::with_special(from, to, Special::EnPassant));
            }
        }
    }
}

fn gen_castles(board: &BoardState, us: Color, out: &mut Vec<Move>) {
    let home = us.home_rank();
    let (king_right, queen_right) = match us {
        Color::White => (CASTLE_WHITE_KING, CASTLE_WHITE_QUEEN),
        Color::Black => (CASTLE_BLACK_KING, CASTLE_BLACK_QUEEN),
    };
    let Some(king_from) = sq(4, home) else {
        return;
    };
    if board.king_sq(us) != king_from {
        return;
    }
    let own_rooks = board.rooks & board.color_set(us);
    let occupied = board.occupied();
    let rank_shift = home as u32 * 8;

    // f and g files must be empty
    let king_path = Bitboard(0x60 << rank_shift);
    if board.castle & king_right != 0
        && own_rooks.contains(king_from + 3)
        && (occupied & king_path).is_empty()
    {
        out.push(Move::with_special(king_from, king_from + 2, Special::CastleKing));
    }

    // b, c and d files must be empty
    let queen_path = Bitboard(0x0E << rank_shift);
    if board.castle & queen_right != 0
        && own_rooks.contains(king_from - 4)
        && (occupied & queen_path).is_empty()
    {
        out.push(Move::with_special(king_from, king_from - 2, Special::CastleQueen));
    }
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
