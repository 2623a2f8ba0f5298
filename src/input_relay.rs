//! Per-player input relay.
//!
//! Each player gets a thread blocking on its connection's read half. Every read returns one
//! chunk of at most [`MAX_CHUNK`] bytes. A chunk without a newline is a single move, otherwise
//! each non-blank line in it is one. Moves are parsed as cell indices and handed to the session
//! through a rendezvous channel, so a relay is never more than one move ahead of the session.
//! Malformed moves are logged and dropped. The relay stops on read error or end of stream; the
//! session notices through the closed channel.

use std::io::{ErrorKind, Read};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use anyhow::Context;
use tracing::{debug, instrument, trace, warn};

use crate::board::Side;
use crate::protocol::parse_move;

/// Largest chunk read from a player at once.
pub const MAX_CHUNK: usize = 1024;

/// A move request from one player, consumed by the session as soon as it is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEvent {
    /// Target cell, already checked to be on the board.
    pub index: usize,
    /// Side that sent the move.
    pub side: Side,
}

/// Start a relay thread reading from `reader`.
///
/// Returns the receiving end of the player's move channel and the thread handle.
pub fn spawn_relay<R>(
    reader: R,
    player_id: u32,
    side: Side,
) -> anyhow::Result<(Receiver<MoveEvent>, JoinHandle<()>)>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(0);
    let handle = thread::Builder::new()
        .name(format!("relay-{player_id}"))
        .spawn(move || relay(reader, player_id, side, tx))
        .context("could not spawn input relay thread")?;
    Ok((rx, handle))
}

#[instrument(skip(reader, tx))]
fn relay<R: Read>(mut reader: R, player_id: u32, side: Side, tx: SyncSender<MoveEvent>) {
    let mut buf = [0u8; MAX_CHUNK];
    loop {
        let len = match reader.read(&mut buf) {
            Ok(0) => {
                debug!("connection closed by player");
                break;
            }
            Ok(len) => len,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("error reading: {e}");
                break;
            }
        };

        let chunk = String::from_utf8_lossy(&buf[..len]);
        for payload in payloads(&chunk) {
            let index = match parse_move(payload) {
                Ok(index) => index,
                Err(e) => {
                    warn!("couldn't read input: {e:#}");
                    continue;
                }
            };

            trace!(index, "move received");
            if tx.send(MoveEvent { index, side }).is_err() {
                debug!("session is gone");
                return;
            }
        }
    }
}

/// Split a chunk into move payloads, skipping blank lines.
fn payloads(chunk: &str) -> impl Iterator<Item = &str> {
    chunk.split('\n').filter(|line| !line.trim().is_empty())
}
