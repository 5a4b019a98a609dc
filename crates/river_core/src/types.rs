use crate::error::{ChessError, ChessResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Side to move for a half-move counter: even plies belong to white.
    pub fn from_ply(ply: u16) -> Color {
        if ply & 1 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Rank index of this side's back rank.
    pub fn home_rank(self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub fn idx(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

/// The 3-bit special code carried by every move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Special {
    /// Plain move or capture
    #[default]
    Normal = 0,
    PromoteQueen = 1,
    PromoteRook = 2,
    PromoteKnight = 3,
    PromoteBishop = 4,
    CastleKing = 5,
    CastleQueen = 6,
    EnPassant = 7,
}

impl Special {
    /// Every special, indexed by its code.
    pub const ALL: [Special; 8] = [
        Special::Normal,
        Special::PromoteQueen,
        Special::PromoteRook,
        Special::PromoteKnight,
        Special::PromoteBishop,
        Special::CastleKing,
        Special::CastleQueen,
        Special::EnPassant,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> ChessResult<Special> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(ChessError::InvalidSpecial { code })
    }

    /// Piece a promotion special turns the pawn into.
    pub fn promotion(self) -> Option<PieceKind> {
        match self {
            Special::PromoteQueen => Some(PieceKind::Queen),
            Special::PromoteRook => Some(PieceKind::Rook),
            Special::PromoteKnight => Some(PieceKind::Knight),
            Special::PromoteBishop => Some(PieceKind::Bishop),
            _ => None,
        }
    }

    pub fn is_castle(self) -> bool {
        matches!(self, Special::CastleKing | Special::CastleQueen)
    }
}

/// Promotion specials in generation order.
pub const PROMOTIONS: [Special; 4] = [
    Special::PromoteQueen,
    Special::PromoteRook,
    Special::PromoteKnight,
    Special::PromoteBishop,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: u8, // 0..63
    pub to: u8,   // 0..63
    pub special: Special,
}

impl Move {
    pub fn new(from: u8, to: u8) -> Self {
        Self {
            from,
            to,
            special: Special::Normal,
        }
    }

    pub fn with_special(from: u8, to: u8, special: Special) -> Self {
        Self { from, to, special }
    }

    /// Packed 15-bit form: special@0(3), dst_file@3(3), dst_rank@6(3),
    /// src_file@9(3), src_rank@12(3).
    pub fn to_bits(self) -> u16 {
        let from = self.from as u16;
        let to = self.to as u16;
        (self.special.code() as u16)
            | ((to & 7) << 3)
            | (((to >> 3) & 7) << 6)
            | ((from & 7) << 9)
            | (((from >> 3) & 7) << 12)
    }

    /// Inverse of [`Move::to_bits`]; bit 15 is ignored.
    pub fn from_bits(bits: u16) -> Self {
        let field = |offset: u16| ((bits >> offset) & 7) as u8;
        Self {
            from: field(12) * 8 + field(9),
            to: field(6) * 8 + field(3),
            special: Special::ALL[field(0) as usize],
        }
    }
}

// Helpers
pub fn file_of(sq: u8) -> i8 {
    (sq & 7) as i8
}
pub fn rank_of(sq: u8) -> i8 {
    ((sq >> 3) & 7) as i8
}
pub fn sq(file: i8, rank: i8) -> Option<u8> {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some((rank as u8) * 8 + (file as u8))
    } else {
        None
    }
}

/// Algebraic name of a square, e.g. `0` → `"a1"`.
pub fn sq_to_coord(sq: u8) -> String {
    let f = (b'a' + (sq & 7)) as char;
    let r = (b'1' + ((sq >> 3) & 7)) as char;
    format!("{f}{r}")
}

/// Square index of an algebraic name, e.g. `"e4"` → `28`.
pub fn coord_to_sq(c: &str) -> ChessResult<u8> {
    match c.as_bytes() {
        [f @ b'a'..=b'h', r @ b'1'..=b'8'] => Ok((r - b'1') * 8 + (f - b'a')),
        _ => Err(ChessError::InvalidSquare {
            text: c.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
