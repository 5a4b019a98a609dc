//! Error types for the search core
//!
//! Every fallible operation in this crate returns [`ChessResult`]. Nothing here
//! is fatal: callers at the protocol layer absorb these and answer with an
//! absent or explicit "no move" response.

use thiserror::Error;

/// Errors produced by board setup, move decoding, execution and search control.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// Square text was not a file `a`-`h` followed by a rank `1`-`8`
    #[error("Invalid square: {text:?}")]
    InvalidSquare { text: String },

    /// Move token was not 4 or 5 characters of long algebraic notation
    #[error("Invalid move text: {text:?}")]
    InvalidMoveText { text: String },

    /// Fifth character of a move token was not one of `q`, `r`, `n`, `b`
    #[error("Invalid promotion suffix {suffix:?} in move {text:?}")]
    InvalidPromotion { text: String, suffix: char },

    /// Special code outside the 3-bit range
    #[error("Invalid move special code: {code}")]
    InvalidSpecial { code: u8 },

    /// FEN text could not be parsed
    #[error("Invalid FEN ({reason}): {fen:?}")]
    InvalidFen { fen: String, reason: &'static str },

    /// Board breaks one of the packed-state invariants
    #[error("Invalid board: {reason}")]
    InvalidBoard { reason: &'static str },

    /// Move cannot be executed on the given board
    #[error("Illegal move {uci}: {reason}")]
    IllegalMove { uci: String, reason: &'static str },

    /// Candidate sorter already holds its full capacity
    #[error("Sorter full: capacity {capacity}")]
    SorterFull { capacity: usize },

    /// A search is already in flight
    #[error("Search already in progress")]
    SearchBusy,
}

/// Result type alias for search core operations
pub type ChessResult<T> = Result<T, ChessError>;
