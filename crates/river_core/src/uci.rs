use crate::{
    board::BoardState,
    error::{ChessError, ChessResult},
    executor::apply,
    movegen::legal_moves,
    types::*,
};

/// Long algebraic text for a move, e.g. `e2e4` or `a7a8q`.
pub fn move_to_uci(mv: Move) -> String {
    let mut s = String::with_capacity(5);
    s.push_str(&sq_to_coord(mv.from));
    s.push_str(&sq_to_coord(mv.to));
    if let Some(p) = mv.special.promotion() {
        let ch = match p {
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            _ => 'n',
        };
        s.push(ch);
    }
    s
}

/// Decode move text without looking at a board. Castles and en passant come
/// back as `Normal`; `BoardState::resolve_move` fills those in.
pub fn parse_uci_move(txt: &str) -> ChessResult<Move> {
    let bad_text = || ChessError::InvalidMoveText {
        text: txt.to_string(),
    };
    if !txt.is_ascii() || !(4..=5).contains(&txt.len()) {
        return Err(bad_text());
    }
    let from = coord_to_sq(&txt[0..2]).map_err(|_| bad_text())?;
    let to = coord_to_sq(&txt[2..4]).map_err(|_| bad_text())?;
    let special = match txt.as_bytes().get(4) {
        None => Special::Normal,
        Some(&b) => match b.to_ascii_lowercase() {
            b'q' => Special::PromoteQueen,
            b'r' => Special::PromoteRook,
            b'n' => Special::PromoteKnight,
            b'b' => Special::PromoteBishop,
            _ => {
                return Err(ChessError::InvalidPromotion {
                    text: txt.to_string(),
                    suffix: b as char,
                });
            }
        },
    };
    Ok(Move::with_special(from, to, special))
}

/// Decode move text against `board` and accept it only if it is one of the
/// legal moves there.
pub fn parse_legal_move(board: &BoardState, txt: &str) -> ChessResult<Move> {
    let mv = board.resolve_move(parse_uci_move(txt)?);
    if legal_moves(board).contains(&mv) {
        Ok(mv)
    } else {
        Err(ChessError::IllegalMove {
            uci: txt.to_string(),
            reason: "not a legal move in this position",
        })
    }
}

/// Outcome of replaying a `moves` list onto a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    /// Position after the accepted prefix.
    pub board: BoardState,
    /// Number of moves applied.
    pub applied: usize,
    /// First token that was refused, with the reason.
    pub rejected: Option<(String, ChessError)>,
}

/// Apply moves in order, stopping at the first token that does not parse or
/// is not legal. Moves before it stay applied; nothing after it is read.
pub fn replay_uci_moves<'a, I>(start: BoardState, tokens: I) -> Replay
where
    I: IntoIterator<Item = &'a str>,
{
    let mut board = start;
    let mut applied = 0;
    for token in tokens {
        match parse_legal_move(&board, token).and_then(|mv| apply(&board, mv)) {
            Ok(next) => {
                board = next;
                applied += 1;
            }
            Err(err) => {
                return Replay {
                    board,
                    applied,
                    rejected: Some((token.to_string(), err)),
                };
            }
        }
    }
    Replay {
        board,
        applied,
        rejected: None,
    }
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
