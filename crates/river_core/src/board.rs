//! The packed board record and everything that reads it.
//!
//! [`BoardState`] is the unpacked, `Copy` working form; [`PackedBoard`] is the
//! exact 428-bit interop layout. Both directions are lossless.

use std::fmt;

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::error::{ChessError, ChessResult};
use crate::types::*;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub const CASTLE_WHITE_KING: u8 = 0b0001;
pub const CASTLE_WHITE_QUEEN: u8 = 0b0010;
pub const CASTLE_BLACK_KING: u8 = 0b0100;
pub const CASTLE_BLACK_QUEEN: u8 = 0b1000;

/// Set in `en_passant` when the low three bits name a capturable file.
pub const EN_PASSANT_VALID: u8 = 0b1000;

pub const CHECKMATE_WHITE: u8 = 0b01;
pub const CHECKMATE_BLACK: u8 = 0b10;

pub const PACKED_WORDS: usize = 7;
pub const PACKED_BITS: usize = 428;

/// (offset, width) of each packed field.
type Field = (usize, usize);

const PAWN: Field = (364, 64);
const QUEEN: Field = (300, 64);
const ROOK: Field = (236, 64);
const BISHOP: Field = (172, 64);
const KNIGHT: Field = (108, 64);
const WHITE: Field = (44, 64);
const KING_BLACK: Field = (38, 6);
const KING_WHITE: Field = (32, 6);
const CHECKMATE: Field = (30, 2);
const EN_PASSANT: Field = (26, 4);
const CASTLE: Field = (22, 4);
const PLY: Field = (7, 15);
const PLY50: Field = (0, 7);

#[inline]
fn width_mask(width: usize) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// The 428-bit board record, bit `i` stored in bit `i % 64` of word `i / 64`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PackedBoard(pub [u64; PACKED_WORDS]);

impl PackedBoard {
    fn field(&self, (offset, width): Field) -> u64 {
        let word = offset / 64;
        let shift = offset % 64;
        let mut value = self.0[word] >> shift;
        if shift != 0 && shift + width > 64 {
            value |= self.0[word + 1] << (64 - shift);
        }
        value & width_mask(width)
    }

    fn set_field(&mut self, (offset, width): Field, value: u64) {
        let mask = width_mask(width);
        let value = value & mask;
        let word = offset / 64;
        let shift = offset % 64;
        self.0[word] = (self.0[word] & !(mask << shift)) | (value << shift);
        if shift != 0 && shift + width > 64 {
            let spill = 64 - shift;
            self.0[word + 1] = (self.0[word + 1] & !(mask >> spill)) | (value >> spill);
        }
    }
}

/// Most-significant word first, zero padded, so the text reads as one integer.
impl fmt::LowerHex for PackedBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in self.0.iter().rev() {
            write!(f, "{word:016x}")?;
        }
        Ok(())
    }
}

/// Board position in the packed engine layout.
///
/// The five type bitboards are colour-agnostic; `white` tells which occupied
/// squares (kings included) hold white pieces. Kings are kept as plain square
/// indices. The side to move is the parity of `ply`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoardState {
    pub pawns: Bitboard,
    pub knights: Bitboard,
    pub bishops: Bitboard,
    pub rooks: Bitboard,
    pub queens: Bitboard,
    pub white: Bitboard,
    pub king_white: u8,
    pub king_black: u8,
    pub checkmate: u8,
    pub en_passant: u8,
    pub castle: u8,
    pub ply: u16,
    pub ply50: u8,
}

impl BoardState {
    pub fn startpos() -> Self {
        BoardState {
            pawns: Bitboard(0x00FF_0000_0000_FF00),
            knights: Bitboard(0x4200_0000_0000_0042),
            bishops: Bitboard(0x2400_0000_0000_0024),
            rooks: Bitboard(0x8100_0000_0000_0081),
            queens: Bitboard(0x0800_0000_0000_0008),
            white: Bitboard(0x0000_0000_0000_FFFF),
            king_white: 4,
            king_black: 60,
            checkmate: 0,
            en_passant: 0,
            castle: CASTLE_WHITE_KING | CASTLE_WHITE_QUEEN | CASTLE_BLACK_KING | CASTLE_BLACK_QUEEN,
            ply: 0,
            ply50: 0,
        }
    }

    pub fn encode(&self) -> PackedBoard {
        let mut packed = PackedBoard::default();
        packed.set_field(PAWN, self.pawns.0);
        packed.set_field(QUEEN, self.queens.0);
        packed.set_field(ROOK, self.rooks.0);
        packed.set_field(BISHOP, self.bishops.0);
        packed.set_field(KNIGHT, self.knights.0);
        packed.set_field(WHITE, self.white.0);
        packed.set_field(KING_BLACK, self.king_black as u64);
        packed.set_field(KING_WHITE, self.king_white as u64);
        packed.set_field(CHECKMATE, self.checkmate as u64);
        packed.set_field(EN_PASSANT, self.en_passant as u64);
        packed.set_field(CASTLE, self.castle as u64);
        packed.set_field(PLY, self.ply as u64);
        packed.set_field(PLY50, self.ply50 as u64);
        packed
    }

    /// Unpacks without validation; the producer is trusted.
    pub fn decode(packed: &PackedBoard) -> Self {
        BoardState {
            pawns: Bitboard(packed.field(PAWN)),
            knights: Bitboard(packed.field(KNIGHT)),
            bishops: Bitboard(packed.field(BISHOP)),
            rooks: Bitboard(packed.field(ROOK)),
            queens: Bitboard(packed.field(QUEEN)),
            white: Bitboard(packed.field(WHITE)),
            king_white: packed.field(KING_WHITE) as u8,
            king_black: packed.field(KING_BLACK) as u8,
            checkmate: packed.field(CHECKMATE) as u8,
            en_passant: packed.field(EN_PASSANT) as u8,
            castle: packed.field(CASTLE) as u8,
            ply: packed.field(PLY) as u16,
            ply50: packed.field(PLY50) as u8,
        }
    }

    /// Parse a 4 to 6 field FEN. The checkmate bits are derived from the
    /// position since FEN does not carry them.
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        let invalid = |reason: &'static str| ChessError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };

        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 || parts.len() > 6 {
            return Err(invalid("expected 4 to 6 fields"));
        }

        let mut board = BoardState {
            pawns: Bitboard::EMPTY,
            knights: Bitboard::EMPTY,
            bishops: Bitboard::EMPTY,
            rooks: Bitboard::EMPTY,
            queens: Bitboard::EMPTY,
            white: Bitboard::EMPTY,
            king_white: 0,
            king_black: 0,
            checkmate: 0,
            en_passant: 0,
            castle: 0,
            ply: 0,
            ply50: 0,
        };

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid("board needs 8 ranks"));
        }
        let mut kings = [0u8; 2];
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as i8; // FEN lists rank 8 .. 1
            let mut file: i8 = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    if !(1..=8).contains(&d) {
                        return Err(invalid("bad empty-square count"));
                    }
                    file += d as i8;
                    if file > 8 {
                        return Err(invalid("too many files in rank"));
                    }
                    continue;
                }
                let s = sq(file, rank).ok_or_else(|| invalid("too many files in rank"))?;
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                match ch.to_ascii_lowercase() {
                    'p' => board.pawns.set(s),
                    'n' => board.knights.set(s),
                    'b' => board.bishops.set(s),
                    'r' => board.rooks.set(s),
                    'q' => board.queens.set(s),
                    'k' => {
                        kings[color.idx()] += 1;
                        match color {
                            Color::White => board.king_white = s,
                            Color::Black => board.king_black = s,
                        }
                    }
                    _ => return Err(invalid("unknown piece letter")),
                }
                if color == Color::White {
                    board.white.set(s);
                }
                file += 1;
            }
            if file != 8 {
                return Err(invalid("rank does not cover 8 files"));
            }
        }
        if kings != [1, 1] {
            return Err(invalid("each side needs exactly one king"));
        }

        let black_to_move = match parts[1] {
            "w" => false,
            "b" => true,
            _ => return Err(invalid("side to move must be w or b")),
        };

        if parts[2] != "-" {
            for c in parts[2].chars() {
                let bit = match c {
                    'K' => CASTLE_WHITE_KING,
                    'Q' => CASTLE_WHITE_QUEEN,
                    'k' => CASTLE_BLACK_KING,
                    'q' => CASTLE_BLACK_QUEEN,
                    _ => return Err(invalid("unknown castling letter")),
                };
                if board.castle & bit != 0 {
                    return Err(invalid("repeated castling letter"));
                }
                board.castle |= bit;
            }
        }

        if parts[3] != "-" {
            let target = coord_to_sq(parts[3]).map_err(|_| invalid("bad en-passant square"))?;
            // The target sits behind the pawn that just moved, so its rank
            // tells who moved it.
            let expected_rank = if black_to_move { 2 } else { 5 };
            if rank_of(target) != expected_rank {
                return Err(invalid("en-passant square on the wrong rank"));
            }
            board.en_passant = EN_PASSANT_VALID | file_of(target) as u8;
        }

        let halfmove: u32 = match parts.get(4) {
            Some(text) => text.parse().map_err(|_| invalid("bad halfmove clock"))?,
            None => 0,
        };
        let fullmove: u32 = match parts.get(5) {
            Some(text) => text.parse().map_err(|_| invalid("bad fullmove number"))?,
            None => 1,
        };
        board.ply50 = halfmove.min(127) as u8;
        let ply = (fullmove.max(1) as u64 - 1) * 2 + black_to_move as u64;
        if ply > 0x7FFF {
            return Err(invalid("fullmove number out of range"));
        }
        board.ply = ply as u16;

        board
            .validate()
            .map_err(|_| invalid("position breaks board invariants"))?;
        board.checkmate = crate::executor::mate_flags(&board);
        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let s = rank * 8 + file;
                match self.piece_at(s) {
                    None => empty += 1,
                    Some(pc) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        let ch = match pc.kind {
                            PieceKind::Pawn => 'p',
                            PieceKind::Knight => 'n',
                            PieceKind::Bishop => 'b',
                            PieceKind::Rook => 'r',
                            PieceKind::Queen => 'q',
                            PieceKind::King => 'k',
                        };
                        out.push(match pc.color {
                            Color::White => ch.to_ascii_uppercase(),
                            Color::Black => ch,
                        });
                    }
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push_str(match self.side_to_move() {
            Color::White => " w ",
            Color::Black => " b ",
        });

        if self.castle == 0 {
            out.push('-');
        }
        for (bit, ch) in [
            (CASTLE_WHITE_KING, 'K'),
            (CASTLE_WHITE_QUEEN, 'Q'),
            (CASTLE_BLACK_KING, 'k'),
            (CASTLE_BLACK_QUEEN, 'q'),
        ] {
            if self.castle & bit != 0 {
                out.push(ch);
            }
        }

        match self.en_passant_square() {
            Some(s) => out.push_str(&format!(" {} ", sq_to_coord(s))),
            None => out.push_str(" - "),
        }
        out.push_str(&format!("{} {}", self.ply50, self.ply / 2 + 1));
        out
    }

    /// Checks the packed-state invariants; this is the gate a board passes
    /// before a search may latch it.
    pub fn validate(&self) -> ChessResult<()> {
        let invalid = |reason| Err(ChessError::InvalidBoard { reason });

        if self.king_white > 63 || self.king_black > 63 {
            return invalid("king square out of range");
        }
        if self.king_white == self.king_black {
            return invalid("kings share a square");
        }
        let mut seen = Bitboard::EMPTY;
        for set in [self.pawns, self.knights, self.bishops, self.rooks, self.queens] {
            if !(seen & set).is_empty() {
                return invalid("piece sets overlap");
            }
            seen |= set;
        }
        if seen.contains(self.king_white) || seen.contains(self.king_black) {
            return invalid("king shares a square with another piece");
        }
        if !(self.white & !self.occupied()).is_empty() {
            return invalid("white occupancy outside occupied squares");
        }
        if !self.white.contains(self.king_white) || self.white.contains(self.king_black) {
            return invalid("king colour does not match white occupancy");
        }
        if !(self.pawns & (Bitboard::RANK_1 | Bitboard::RANK_8)).is_empty() {
            return invalid("pawn on a back rank");
        }
        if self.en_passant > 15 || (self.en_passant != 0 && self.en_passant & EN_PASSANT_VALID == 0) {
            return invalid("malformed en-passant field");
        }
        if self.castle > 15 || self.checkmate > 3 || self.ply > 0x7FFF || self.ply50 > 127 {
            return invalid("field exceeds its packed width");
        }
        Ok(())
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        Color::from_ply(self.ply)
    }

    #[inline]
    pub fn king_sq(&self, c: Color) -> u8 {
        match c {
            Color::White => self.king_white,
            Color::Black => self.king_black,
        }
    }

    #[inline]
    pub fn kings(&self) -> Bitboard {
        Bitboard::from_square(self.king_white).with(self.king_black)
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.pawns | self.knights | self.bishops | self.rooks | self.queens | self.kings()
    }

    /// Every square holding a piece of colour `c`, king included.
    #[inline]
    pub fn color_set(&self, c: Color) -> Bitboard {
        match c {
            Color::White => self.white,
            Color::Black => self.occupied() & !self.white,
        }
    }

    /// Type bitboard for `kind`; for the king, both king squares.
    pub fn kind_set(&self, kind: PieceKind) -> Bitboard {
        match kind {
            PieceKind::Pawn => self.pawns,
            PieceKind::Knight => self.knights,
            PieceKind::Bishop => self.bishops,
            PieceKind::Rook => self.rooks,
            PieceKind::Queen => self.queens,
            PieceKind::King => self.kings(),
        }
    }

    pub(crate) fn kind_set_mut(&mut self, kind: PieceKind) -> Option<&mut Bitboard> {
        match kind {
            PieceKind::Pawn => Some(&mut self.pawns),
            PieceKind::Knight => Some(&mut self.knights),
            PieceKind::Bishop => Some(&mut self.bishops),
            PieceKind::Rook => Some(&mut self.rooks),
            PieceKind::Queen => Some(&mut self.queens),
            PieceKind::King => None,
        }
    }

    pub fn piece_at(&self, s: u8) -> Option<Piece> {
        let kind = if s == self.king_white || s == self.king_black {
            PieceKind::King
        } else if self.pawns.contains(s) {
            PieceKind::Pawn
        } else if self.knights.contains(s) {
            PieceKind::Knight
        } else if self.bishops.contains(s) {
            PieceKind::Bishop
        } else if self.rooks.contains(s) {
            PieceKind::Rook
        } else if self.queens.contains(s) {
            PieceKind::Queen
        } else {
            return None;
        };
        let color = if self.white.contains(s) {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece { color, kind })
    }

    /// Square a pawn of the side to move would land on capturing en passant.
    pub fn en_passant_square(&self) -> Option<u8> {
        if self.en_passant & EN_PASSANT_VALID == 0 {
            return None;
        }
        let file = (self.en_passant & 7) as i8;
        let rank = match self.side_to_move() {
            Color::White => 5,
            Color::Black => 2,
        };
        sq(file, rank)
    }

    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        let attackers = self.color_set(by);
        let occupied = self.occupied();

        // A pawn of `by` attacks `target` iff a pawn of the other colour
        // standing on `target` would attack it back.
        if !(pawn_attacks(target, by == Color::Black) & self.pawns & attackers).is_empty() {
            return true;
        }
        if !(knight_attacks(target) & self.knights & attackers).is_empty() {
            return true;
        }
        if king_attacks(target).contains(self.king_sq(by)) {
            return true;
        }
        let diagonal = (self.bishops | self.queens) & attackers;
        if !(bishop_attacks(target, occupied) & diagonal).is_empty() {
            return true;
        }
        let orthogonal = (self.rooks | self.queens) & attackers;
        !(rook_attacks(target, occupied) & orthogonal).is_empty()
    }

    pub fn in_check(&self, c: Color) -> bool {
        self.is_square_attacked(self.king_sq(c), c.other())
    }

    pub fn is_checkmated(&self, c: Color) -> bool {
        let bit = match c {
            Color::White => CHECKMATE_WHITE,
            Color::Black => CHECKMATE_BLACK,
        };
        self.checkmate & bit != 0
    }

    /// Fills in the castle/en-passant special of a move decoded from text,
    /// where only the squares and a promotion are known.
    pub fn resolve_move(&self, mv: Move) -> Move {
        if mv.special != Special::Normal {
            return mv;
        }
        let us = self.side_to_move();
        let king_home = sq(4, us.home_rank());
        if mv.from == self.king_sq(us) && Some(mv.from) == king_home {
            if mv.to == mv.from + 2 {
                return Move::with_special(mv.from, mv.to, Special::CastleKing);
            }
            if mv.to + 2 == mv.from {
                return Move::with_special(mv.from, mv.to, Special::CastleQueen);
            }
        }
        let is_our_pawn = self.pawns.contains(mv.from) && self.color_set(us).contains(mv.from);
        if is_our_pawn
            && file_of(mv.from) != file_of(mv.to)
            && Some(mv.to) == self.en_passant_square()
            && !self.occupied().contains(mv.to)
        {
            return Move::with_special(mv.from, mv.to, Special::EnPassant);
        }
        mv
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
