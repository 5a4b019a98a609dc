use crate::{
    bitboard::Bitboard,
    board::*,
    error::ChessResult,
    executor::apply,
    types::*,
};

/// Score of a delivered mate. Search subtracts the distance in plies so
/// nearer mates rank higher.
pub const MATE_SCORE: i32 = 30_000;

/// Material in centipawns, indexed by `PieceKind::idx`. The king carries no
/// material since both sides always have one.
pub const PIECE_VALUES: [i32; 6] = [100, 300, 340, 550, 1000, 0];

pub const BISHOP_PAIR_BONUS: i32 = 80;
pub const CASTLE_RIGHT_BONUS: i32 = 20;

/// Phase weights for the endgame test, indexed by `PieceKind::idx`.
const PHASE_WEIGHTS: [i32; 6] = [1, 3, 3, 5, 9, 0];
/// Both sides together at or under this much phase weight is an endgame.
const ENDGAME_PHASE: i32 = 26;

// Square tables from white's point of view, a1 first. Black squares are
// mirrored vertically before lookup.
#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      5,  10,  10, -20, -20,  10,  10,   5,
      5,  -5, -10,   0,   0, -10,  -5,   5,
      0,   0,   0,  20,  20,   0,   0,   0,
      5,   5,  10,  25,  25,  10,   5,   5,
     10,  10,  20,  30,  30,  20,  10,  10,
     50,  50,  50,  50,  50,  50,  50,  50,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
      0,   0,   0,   5,   5,   0,   0,   0,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
      5,  10,  10,  10,  10,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -10,   5,   5,   5,   5,   5,   0, -10,
      0,   0,   5,   5,   5,   5,   0,  -5,
     -5,   0,   5,   5,   5,   5,   0,  -5,
    -10,   0,   5,   5,   5,   5,   0, -10,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_MIDDLEGAME_TABLE: [i32; 64] = [
     20,  30,  10,   0,   0,  10,  30,  20,
     20,  20,   0,   0,   0,   0,  20,  20,
    -10, -20, -20, -20, -20, -20, -20, -10,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
];

#[rustfmt::skip]
const KING_ENDGAME_TABLE: [i32; 64] = [
    -50, -30, -30, -30, -30, -30, -30, -50,
    -30, -30,   0,   0,   0,   0, -30, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  30,  40,  40,  30, -10, -30,
    -30, -10,  20,  30,  30,  20, -10, -30,
    -30, -20, -10,   0,   0, -10, -20, -30,
    -50, -40, -30, -20, -20, -30, -40, -50,
];

fn square_table(kind: PieceKind, endgame: bool) -> &'static [i32; 64] {
    match kind {
        PieceKind::Pawn => &PAWN_TABLE,
        PieceKind::Knight => &KNIGHT_TABLE,
        PieceKind::Bishop => &BISHOP_TABLE,
        PieceKind::Rook => &ROOK_TABLE,
        PieceKind::Queen => &QUEEN_TABLE,
        PieceKind::King if endgame => &KING_ENDGAME_TABLE,
        PieceKind::King => &KING_MIDDLEGAME_TABLE,
    }
}

/// Table index for a piece of `color` on `s`.
#[inline]
fn table_square(color: Color, s: u8) -> usize {
    match color {
        Color::White => s as usize,
        Color::Black => (s ^ 56) as usize,
    }
}

/// True once little material is left on the board, switching the king to
/// its centralising table.
pub fn is_endgame(board: &BoardState) -> bool {
    let phase: i32 = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ]
    .into_iter()
    .map(|kind| board.kind_set(kind).popcount() as i32 * PHASE_WEIGHTS[kind.idx()])
    .sum();
    phase <= ENDGAME_PHASE
}

fn has_bishop_pair(board: &BoardState, color: Color) -> bool {
    let bishops = board.bishops & board.color_set(color);
    !(bishops & Bitboard::DARK_SQUARES).is_empty() && !(bishops & !Bitboard::DARK_SQUARES).is_empty()
}

fn castle_rights(board: &BoardState, color: Color) -> i32 {
    let mask = match color {
        Color::White => CASTLE_WHITE_KING | CASTLE_WHITE_QUEEN,
        Color::Black => CASTLE_BLACK_KING | CASTLE_BLACK_QUEEN,
    };
    (board.castle & mask).count_ones() as i32
}

/// Static score of `board` in centipawns from the side to move's point of
/// view. A flagged checkmate dominates everything else.
pub fn evaluate(board: &BoardState) -> i32 {
    let us = board.side_to_move();
    if board.is_checkmated(us) {
        return -MATE_SCORE;
    }
    if board.is_checkmated(us.other()) {
        return MATE_SCORE;
    }

    let endgame = is_endgame(board);
    let mut score = 0i32;

    for kind in [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        let table = square_table(kind, endgame);
        for s in board.kind_set(kind) {
            let color = if board.white.contains(s) {
                Color::White
            } else {
                Color::Black
            };
            let v = PIECE_VALUES[kind.idx()] + table[table_square(color, s)];
            score += if color == Color::White { v } else { -v };
        }
    }

    if has_bishop_pair(board, Color::White) {
        score += BISHOP_PAIR_BONUS;
    }
    if has_bishop_pair(board, Color::Black) {
        score -= BISHOP_PAIR_BONUS;
    }
    score += CASTLE_RIGHT_BONUS * (castle_rights(board, Color::White) - castle_rights(board, Color::Black));

    // Convert to side-to-move
    if us == Color::White { score } else { -score }
}

/// Score of the position `mv` leads to, from the mover's point of view.
pub fn score_move(board: &BoardState, mv: Move) -> ChessResult<i32> {
    let next = apply(board, mv)?;
    Ok(score_successor(&next))
}

/// Mover's view of an already applied successor.
#[inline]
pub fn score_successor(next: &BoardState) -> i32 {
    -evaluate(next)
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
