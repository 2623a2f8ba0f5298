//! # Tic-tac-toe Server
//!
//! Matchmaking and a real-time session loop for two-player networked tic-tac-toe.
//!
//! It provides:
//! - A [`Matchmaker`](crate::server::Matchmaker) pairing TCP connections two at a time
//! - A fixed-tick [`Session`](crate::session::Session) per pair, arbitrating turns, detecting
//!   wins and draws, keeping score across rounds, and broadcasting state to both players
//! - The [`Timer`](crate::timer::Timer) and [`SimulationClock`](crate::simulation_clock::SimulationClock)
//!   the session paces itself with, driven by an explicit [`Clock`](crate::clock::Clock)
//!
//! Each session runs on its own thread, with one input relay thread per player blocking on the
//! player's socket. Sessions share no state.
//!
//! # Documentation Overview
//!
//! - For the turn, round, and scoring rules, see the [`session`] module.
//! - For the bytes exchanged with clients, see the [`protocol`] module.
//! - For the connection file and runtime settings, see [`configuration`].
//!
//! # Usage Example
//!
//! ```no_run
//! use tictactoe_server::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Configuration::from_env();
//!     let connection = ConnectionConfig::from_file("config")?;
//!
//!     let matchmaker = Matchmaker::bind(&connection, config)?;
//!     matchmaker.run()
//! }
//! ```
//!
//! # Example Client
//!
//! A client reads its side, then sends one cell index per line and reads updates:
//!
//! ```no_run
//! use std::io::{BufReader, Write};
//! use std::net::TcpStream;
//!
//! use tictactoe_server::protocol::{read_side, read_update};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut stream = TcpStream::connect("127.0.0.1:8080")?;
//!     let mut reader = BufReader::new(stream.try_clone()?);
//!
//!     let side = read_side(&mut reader)?;
//!     println!("playing side {side}");
//!
//!     stream.write_all(b"4\n")?;
//!     let update = read_update(&mut reader)?;
//!     println!("{update}");
//!     Ok(())
//! }
//! ```
#![warn(missing_docs)]

pub use anyhow;
pub mod board;
pub mod clock;
pub mod configuration;
pub mod input_relay;
pub mod logger;
pub mod player;
pub mod protocol;
pub mod rules;
pub mod server;
pub mod session;
pub mod simulation_clock;
pub mod timer;
pub mod transport;

/// Commonly used types and traits for quick access.
///
/// ```rust
/// use tictactoe_server::prelude::*;
/// ```
pub mod prelude {
    pub use crate::board::{Board, Cell, Side};
    pub use crate::clock::{Clock, ManualClock, MonotonicClock};
    pub use crate::configuration::{Configuration, ConnectionConfig};
    pub use crate::protocol::{Outcome, StateUpdate};
    pub use crate::server::Matchmaker;
    pub use crate::session::Session;
    pub use crate::timer::{Timer, TimerMode, TimerState};
    pub use crate::transport::Transport;
}
