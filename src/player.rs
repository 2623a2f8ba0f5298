//! Session participants.

use std::fmt::Display;

use tracing::{debug, warn};

use crate::board::Side;
use crate::transport::Transport;

/// One participant of a session.
#[derive(Debug)]
pub struct Player<T: Transport> {
    /// Id handed out by the matchmaker.
    pub id: u32,
    /// Side the player marks the board with.
    pub side: Side,
    /// Rounds won during this session.
    pub score: u32,
    /// `None` once the connection is known to be unusable.
    conn: Option<T>,
}

impl<T: Transport> Player<T> {
    /// A connected player with no score.
    pub fn new(id: u32, side: Side, conn: T) -> Player<T> {
        Player {
            id,
            side,
            score: 0,
            conn: Some(conn),
        }
    }

    /// False once the connection was dropped.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Write `frame`; on failure the connection is dropped and false is returned.
    pub fn send(&mut self, frame: &[u8]) -> bool {
        let Some(conn) = self.conn.as_mut() else {
            return false;
        };
        match conn.write_all(frame).and_then(|_| conn.flush()) {
            Ok(()) => true,
            Err(e) => {
                warn!(player = %self, "write failed, dropping connection: {e}");
                self.disconnect();
                false
            }
        }
    }

    /// Close and forget the connection, if any.
    pub fn disconnect(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            if let Err(e) = conn.close() {
                debug!(player = %self, "close: {e}");
            }
        }
    }
}

// a relay thread may still be reading from a clone of the connection
impl<T: Transport> Drop for Player<T> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl<T: Transport> Display for Player<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} (side {})", self.id, self.side)
    }
}

#[cfg(test)]
mod player_tests {
    use std::io::{self, Write};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[derive(Default, Clone)]
    struct CountingTransport {
        broken: Arc<AtomicBool>,
        closes: Arc<AtomicUsize>,
    }

    impl Write for CountingTransport {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(io::ErrorKind::ConnectionReset.into());
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Transport for CountingTransport {
        fn close(&mut self) -> io::Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn failed_write_closes_the_connection_once() {
        let transport = CountingTransport::default();
        let mut player = Player::new(1, Side::First, transport.clone());

        assert!(player.send(b"0,0,"));
        transport.broken.store(true, Ordering::SeqCst);
        assert!(!player.send(b"0,0,"));
        assert!(!player.is_connected());
        assert!(!player.send(b"0,0,"));

        drop(player);
        assert_eq!(transport.closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_a_player_closes_its_connection() {
        let transport = CountingTransport::default();
        let player = Player::new(2, Side::Second, transport.clone());

        drop(player);
        assert_eq!(transport.closes.load(Ordering::SeqCst), 1);
    }
}
