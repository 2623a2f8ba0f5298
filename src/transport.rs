//! What a session needs from a player connection.

use std::io::Write;
use std::net::{Shutdown, TcpStream};

/// Write half of a player connection, owned by the session.
///
/// Reading happens on a separate handle owned by the player's input relay.
pub trait Transport: Write + Send {
    /// Close the connection in both directions.
    ///
    /// Also unblocks a relay still waiting on the read handle.
    fn close(&mut self) -> std::io::Result<()>;
}

impl Transport for TcpStream {
    fn close(&mut self) -> std::io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}
