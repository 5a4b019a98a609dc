//! Pre-computed attack tables.
//!
//! Leaper tables (knight, king, pawn captures) are built at compile time from
//! their (file, rank) offsets. Sliders walk pre-computed rays and stop at the
//! first occupied square, which stays included so it can be captured.

use crate::bitboard::Bitboard;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Ray directions. Indices 0..4 grow the square index, 4..8 shrink it.
const RAY_DIRS: [(i8, i8); 8] = [
    (0, 1),   // N
    (1, 1),   // NE
    (1, 0),   // E
    (-1, 1),  // NW
    (0, -1),  // S
    (-1, -1), // SW
    (-1, 0),  // W
    (1, -1),  // SE
];

const ORTHOGONAL: [usize; 4] = [0, 2, 4, 6];
const DIAGONAL: [usize; 4] = [1, 3, 5, 7];

const fn leaper_table(offsets: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < offsets.len() {
            let f = file + offsets[i].0;
            let r = rank + offsets[i].1;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << ((r * 8 + f) as u32);
            }
            i += 1;
        }
        table[sq] = Bitboard(bits);
        sq += 1;
    }
    table
}

const fn ray_table() -> [[Bitboard; 64]; 8] {
    let mut rays = [[Bitboard::EMPTY; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (df, dr) = RAY_DIRS[dir];
        let mut sq = 0;
        while sq < 64 {
            let mut f = (sq % 8) as i8 + df;
            let mut r = (sq / 8) as i8 + dr;
            let mut bits = 0u64;
            while f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << ((r * 8 + f) as u32);
                f += df;
                r += dr;
            }
            rays[dir][sq] = Bitboard(bits);
            sq += 1;
        }
        dir += 1;
    }
    rays
}

pub static KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_OFFSETS);
pub static KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_OFFSETS);
pub static WHITE_PAWN_ATTACKS: [Bitboard; 64] = leaper_table(&[(-1, 1), (1, 1)]);
pub static BLACK_PAWN_ATTACKS: [Bitboard; 64] = leaper_table(&[(-1, -1), (1, -1)]);

/// `RAYS[dir][sq]`: every square from `sq` in direction `dir`, `sq` excluded.
pub static RAYS: [[Bitboard; 64]; 8] = ray_table();

/// Squares a pawn of the given colour on `sq` captures on.
#[inline(always)]
pub fn pawn_attacks(sq: u8, is_white: bool) -> Bitboard {
    if is_white {
        WHITE_PAWN_ATTACKS[sq as usize]
    } else {
        BLACK_PAWN_ATTACKS[sq as usize]
    }
}

#[inline(always)]
pub fn knight_attacks(sq: u8) -> Bitboard {
    KNIGHT_ATTACKS[sq as usize]
}

#[inline(always)]
pub fn king_attacks(sq: u8) -> Bitboard {
    KING_ATTACKS[sq as usize]
}

#[inline]
fn slide(sq: u8, occupied: Bitboard, dirs: [usize; 4]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for dir in dirs {
        let ray = RAYS[dir][sq as usize];
        let blockers = ray & occupied;
        // Rays 0..4 walk upwards, so their nearest blocker is the lowest bit.
        let nearest = if dir < 4 { blockers.lsb() } else { blockers.msb() };
        attacks |= match nearest {
            Some(blocker) => ray & !RAYS[dir][blocker as usize],
            None => ray,
        };
    }
    attacks
}

#[inline]
pub fn bishop_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    slide(sq, occupied, DIAGONAL)
}

#[inline]
pub fn rook_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    slide(sq, occupied, ORTHOGONAL)
}

#[inline]
pub fn queen_attacks(sq: u8, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
