//! Matchmaking over TCP.
//!
//! The [`Matchmaker`] accepts connections two at a time. The first connection of a pair plays
//! [`Side::First`] and is told so with the byte `"0"` as soon as it is accepted, the second gets
//! `"1"`. Each pair then gets:
//!
//! - one input relay thread per player, reading moves from a clone of the player's socket;
//! - one session thread running [`Session::run`], which owns the write half of both sockets.
//!
//! Sessions share nothing, so a broken session never affects another one or the listener.
//!
//! # Errors
//!
//! Failing to bind or to accept is fatal: [`Matchmaker::run`] returns the error and the caller
//! is expected to exit. Failing to start a session only loses that pair, whose connections are
//! closed before the next pair is accepted.

use std::io::Write;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::mpsc::Receiver;
use std::thread;

use anyhow::{bail, Context};
use tracing::{info, instrument, warn};

use crate::board::Side;
use crate::clock::MonotonicClock;
use crate::configuration::{Configuration, ConnectionConfig};
use crate::input_relay::{spawn_relay, MoveEvent};
use crate::player::Player;
use crate::protocol::side_assignment;
use crate::session::Session;

/// Pairs incoming connections and starts a session per pair.
pub struct Matchmaker {
    listener: TcpListener,
    config: Configuration,
    next_id: u32,
    next_session: u32,
}

impl Matchmaker {
    /// Bind the listener described by `connection`.
    ///
    /// # Errors
    /// When the address cannot be resolved for the requested protocol or cannot be bound.
    pub fn bind(connection: &ConnectionConfig, config: Configuration) -> anyhow::Result<Self> {
        let address = connection.address();
        let candidates = address
            .to_socket_addrs()
            .with_context(|| format!("could not resolve '{address}'"))?
            .filter(|addr| match connection.protocol.as_str() {
                "tcp4" => addr.is_ipv4(),
                "tcp6" => addr.is_ipv6(),
                _ => true,
            })
            .collect::<Vec<_>>();
        if candidates.is_empty() {
            bail!(
                "'{address}' has no address usable with protocol '{}'",
                connection.protocol
            );
        }

        let listener = TcpListener::bind(&candidates[..])
            .with_context(|| format!("error listening on '{address}'"))?;
        info!("listening on {}", listener.local_addr()?);

        Ok(Self::from_listener(listener, config))
    }

    /// Use an already bound listener.
    pub fn from_listener(listener: TcpListener, config: Configuration) -> Self {
        Matchmaker {
            listener,
            config,
            next_id: 0,
            next_session: 0,
        }
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("could not get listener address")
    }

    /// Accept connections forever, starting a session for every pair.
    ///
    /// # Errors
    /// When accepting a connection fails.
    pub fn run(mut self) -> anyhow::Result<()> {
        loop {
            let (first, second) = self.accept_pair()?;
            // both connections are closed when the pair is dropped
            if let Err(e) = self.start_session(first, second) {
                warn!("could not start session, dropping pair: {e:#}");
            }
            info!("waiting for next pair");
        }
    }

    /// Accept the next two connections and tell each its side.
    #[instrument(skip(self))]
    pub fn accept_pair(&mut self) -> anyhow::Result<(TcpStream, TcpStream)> {
        let first = self.accept_one(Side::First)?;
        let second = self.accept_one(Side::Second)?;
        Ok((first, second))
    }

    fn accept_one(&mut self, side: Side) -> anyhow::Result<TcpStream> {
        let (mut stream, peer) = self
            .listener
            .accept()
            .with_context(|| format!("error accepting player {}", side.index() + 1))?;
        info!(%peer, %side, "player connected");

        // updates are tiny and latency matters more than throughput
        if let Err(e) = stream.set_nodelay(true) {
            warn!(%peer, "could not disable Nagle's algorithm: {e}");
        }

        if let Err(e) = stream.write_all(side_assignment(side).as_bytes()) {
            warn!(%peer, "could not send side assignment: {e}");
        }
        Ok(stream)
    }

    /// Start relays and a session thread for an accepted pair.
    ///
    /// # Errors
    /// When a relay or the session thread cannot be started. Already seated players are
    /// disconnected before returning.
    pub fn start_session(&mut self, first: TcpStream, second: TcpStream) -> anyhow::Result<()> {
        let session_id = self.next_session;
        self.next_session = self.next_session.wrapping_add(1);

        let (first, first_input) = self.seat(Side::First, first)?;
        let (second, second_input) = self.seat(Side::Second, second)?;

        let session = Session::new(
            session_id,
            [first, second],
            [first_input, second_input],
            MonotonicClock::new(),
            &self.config,
        );
        thread::Builder::new()
            .name(format!("session-{session_id}"))
            .spawn(move || session.run())
            .context("could not spawn session thread")?;
        Ok(())
    }

    /// Give the connection a player id and an input relay reading from a clone of it.
    fn seat(
        &mut self,
        side: Side,
        stream: TcpStream,
    ) -> anyhow::Result<(Player<TcpStream>, Receiver<MoveEvent>)> {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        let reader = stream
            .try_clone()
            .context("could not clone player stream for reading")?;
        let (input, _relay) = spawn_relay(reader, id, side)?;
        Ok((Player::new(id, side, stream), input))
    }
}
