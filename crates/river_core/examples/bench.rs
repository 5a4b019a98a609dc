//! Perft and search timing over a fixed position set, for profiling with
//! cargo-flamegraph.
//!
//! Usage:
//!   cargo run --release --example bench -p river_core -- perft [depth] [fen]
//!   cargo run --release --example bench -p river_core -- search [depth] [fen]
//!   cargo run --release --example bench -p river_core -- divide [depth] [fen]
//!
//! Without a FEN every position in `POSITIONS` is run.

use std::env;
use std::time::{Duration, Instant};

use river_core::{divide, move_to_uci, perft, BoardState, SearchCoordinator};

const POSITIONS: &[(&str, &str)] = &[
    (
        "Starting position",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ),
    (
        "Kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    ("Rook endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
    (
        "Promotions",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    ),
];

enum Mode {
    Perft,
    Search,
    Divide,
}

fn rate(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { count as f64 / secs } else { 0.0 }
}

fn run(mode: &Mode, name: &str, board: &BoardState, depth: u8) -> u64 {
    let start = Instant::now();
    let (count, summary) = match mode {
        Mode::Perft => {
            let nodes = perft(board, depth);
            (nodes, String::new())
        }
        Mode::Divide => {
            let split = divide(board, depth);
            for (mv, nodes) in &split {
                println!("  {mv}: {nodes}");
            }
            (split.iter().map(|(_, n)| n).sum(), String::new())
        }
        Mode::Search => match SearchCoordinator::new().search(*board, depth) {
            Ok(result) => {
                let best = result.best_move.map_or_else(|| "0000".to_string(), move_to_uci);
                (result.nodes, format!(" best {best} score {}", result.score))
            }
            Err(err) => {
                println!("{name}: {err}");
                return 0;
            }
        },
    };
    let elapsed = start.elapsed();
    println!(
        "{name:.<30} {count:>12} nodes in {elapsed:>8.3?} ({:>10.0} nps){summary}",
        rate(count, elapsed)
    );
    count
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mode = match args.get(1).map(String::as_str) {
        Some("search") => Mode::Search,
        Some("divide") => Mode::Divide,
        _ => Mode::Perft,
    };
    let depth: u8 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(5);

    let positions: Vec<(&str, &str)> = match args.get(3) {
        Some(fen) => vec![("Custom", fen.as_str())],
        None => POSITIONS.to_vec(),
    };

    let mut total = 0u64;
    let start = Instant::now();
    for (name, fen) in positions {
        match BoardState::from_fen(fen) {
            Ok(board) => total += run(&mode, name, &board, depth),
            Err(err) => println!("{name}: {err}"),
        }
    }
    let elapsed = start.elapsed();
    println!("{:=<70}", "");
    println!("TOTAL: {total} nodes in {elapsed:.3?} ({:.0} nps)", rate(total, elapsed));
}
