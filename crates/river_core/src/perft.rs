use crate::{
    board::BoardState,
    executor::play,
    movegen::legal_moves_into,
    types::Move,
    uci::move_to_uci,
};

/// Pure perft node count.
/// Counts all legal positions from the current one down to `depth`.
pub fn perft(board: &BoardState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    fn inner(board: &BoardState, depth: u8, layers: &mut [Vec<Move>]) -> u64 {
        let Some((buf, rest)) = layers.split_first_mut() else {
            return 1;
        };

        legal_moves_into(board, buf);
        if depth == 1 {
            return buf.len() as u64;
        }

        let mut nodes = 0u64;
        for mv in buf.iter().copied() {
            // Generated moves always apply.
            if let Ok(next) = play(board, mv) {
                nodes += inner(&next, depth - 1, rest);
            }
        }
        nodes
    }

    let mut layers = vec![Vec::with_capacity(64); depth as usize];
    inner(board, depth, &mut layers[..])
}

/// Perft split by root move, in generation order.
pub fn divide(board: &BoardState, depth: u8) -> Vec<(String, u64)> {
    let mut moves = Vec::with_capacity(64);
    legal_moves_into(board, &mut moves);
    moves
        .into_iter()
        .filter_map(|mv| {
            let next = play(board, mv).ok()?;
            Some((move_to_uci(mv), perft(&next, depth.saturating_sub(1))))
        })
        .collect()
}
