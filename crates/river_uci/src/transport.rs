//! Byte transport between a stream pair and the protocol handler.
//!
//! A reader thread pushes inbound bytes through a bounded channel; the
//! handler, the board and the search stay on the calling thread, which runs
//! one fixed cycle: take at most one byte, tick the search, flush output.

use std::io::{BufReader, Read, Write};
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError};
use std::thread;

use anyhow::Context;
use tracing::{debug, warn};

use crate::protocol::ProtocolHandler;

/// Bytes buffered between the reader thread and the protocol loop.
pub const INBOUND_CAPACITY: usize = 4096;

fn pump(input: impl Read, tx: SyncSender<u8>) {
    for byte in BufReader::new(input).bytes() {
        match byte {
            Ok(b) => {
                if tx.send(b).is_err() {
                    break;
                }
            }
            Err(err) => {
                warn!(%err, "input read failed");
                break;
            }
        }
    }
}

/// Next byte for the loop: blocks only when no search needs ticking.
/// `None` with `*closed` set means the input is finished.
fn next_byte(rx: &Receiver<u8>, block: bool, closed: &mut bool) -> Option<u8> {
    if block {
        match rx.recv() {
            Ok(b) => Some(b),
            Err(_) => {
                *closed = true;
                None
            }
        }
    } else {
        match rx.try_recv() {
            Ok(b) => Some(b),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                *closed = true;
                None
            }
        }
    }
}

/// Run `handler` over `input`/`output` until `quit` arrives or the input
/// ends. A search still running when the input ends is finished and
/// reported first.
pub fn serve<R, W>(handler: &mut ProtocolHandler, input: R, output: &mut W) -> anyhow::Result<()>
where
    R: Read + Send + 'static,
    W: Write,
{
    let (tx, rx) = mpsc::sync_channel(INBOUND_CAPACITY);
    // Not joined: the thread may sit in a blocking read after `quit`.
    thread::Builder::new()
        .name("river-input".to_string())
        .spawn(move || pump(input, tx))
        .context("spawning input reader")?;

    let mut pending: Option<u8> = None;
    let mut closed = false;
    loop {
        if pending.is_none() && !closed {
            pending = next_byte(&rx, !handler.is_searching(), &mut closed);
        }
        if let Some(byte) = pending {
            if handler.receive(byte) {
                pending = None;
            }
        }
        handler.tick();
        handler.write_output(output).context("writing protocol output")?;

        if handler.has_quit() {
            debug!("quit received");
            break;
        }
        if closed && pending.is_none() && !handler.is_searching() {
            debug!("input closed");
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod transport_tests;
