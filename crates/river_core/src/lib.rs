pub mod attacks;
pub mod bitboard;
pub mod board;
pub mod error;
pub mod eval;
pub mod executor;
pub mod movegen;
pub mod perft;
pub mod search;
pub mod sorter;
pub mod types;
pub mod uci;

// Re-export the search core
pub use attacks::*;
pub use bitboard::*;
pub use board::*;
pub use error::{ChessError, ChessResult};
pub use eval::{evaluate, score_move, MATE_SCORE};
pub use executor::apply;
pub use movegen::*;
pub use perft::{divide, perft};
pub use search::{SearchCoordinator, SearchResult, SearchState, MAX_DEPTH};
pub use sorter::StreamSorter;
pub use types::*;
pub use uci::*;
