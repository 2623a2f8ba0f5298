//! The per-match game loop.
//!
//! A [`Session`] owns both players, the board, and two timers. Each tick it:
//!
//! 1. advances the win-pause timer;
//! 2. while that timer is `Elapsed` (play is on, starting the tick after it elapsed), polls the
//!    players' move channels without blocking and takes at most one move, which is applied only
//!    if it is that player's turn and the cell is free. The side polled first alternates every
//!    tick, so neither player can starve the other;
//! 3. when a move was applied, or the pause just ended, evaluates the board, settles the round
//!    if it is over, and broadcasts scores, board, and outcome to both players;
//! 4. advances the simulation clock and the status timer.
//!
//! A finished round (win or full board) clears the board, re-arms the win-pause timer, and hands
//! the opening move of the next round to the side that did not open the previous one. The win
//! is credited only if the pause timer was `Elapsed` when the win was seen, so a round is
//! scored exactly once.
//!
//! The loop runs until either player's connection is gone, either because a write failed or
//! because its input relay stopped.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, trace};

use crate::board::{Board, Side};
use crate::clock::Clock;
use crate::configuration::Configuration;
use crate::input_relay::MoveEvent;
use crate::player::Player;
use crate::protocol::{encode_update, round_body, Outcome};
use crate::rules;
use crate::simulation_clock::SimulationClock;
use crate::timer::{Timer, TimerMode, TimerState};
use crate::transport::Transport;

/// One match between two players. See module documentation.
pub struct Session<T: Transport, C: Clock> {
    id: u32,
    players: [Player<T>; 2],
    inputs: [Receiver<MoveEvent>; 2],
    board: Board,
    turn: Side,
    opener: Side,
    polled_first: Side,
    win_pause: Timer,
    status: Timer,
    sim: SimulationClock,
    clock: C,
    tick_interval: Duration,
}

impl<T: Transport, C: Clock> Session<T, C> {
    /// Create a session. `players[i]` and `inputs[i]` belong to side `i`.
    pub fn new(
        id: u32,
        players: [Player<T>; 2],
        inputs: [Receiver<MoveEvent>; 2],
        clock: C,
        config: &Configuration,
    ) -> Self {
        debug_assert!(
            Side::BOTH.iter().all(|s| players[s.index()].side == *s),
            "players must be ordered by side"
        );
        Session {
            id,
            players,
            inputs,
            board: Board::new(),
            turn: Side::First,
            opener: Side::First,
            polled_first: Side::First,
            win_pause: Timer::with_state(
                TimerMode::OneShot,
                config.win_pause,
                TimerState::Elapsed,
            ),
            status: Timer::new(TimerMode::Looping, config.status_interval),
            sim: SimulationClock::new(&clock),
            clock,
            tick_interval: config.tick_interval,
        }
    }

    /// Run ticks at the configured cadence until a player is gone, then close both
    /// connections.
    #[instrument(skip_all, fields(session = self.id))]
    pub fn run(mut self) {
        info!(
            first = %self.players[0],
            second = %self.players[1],
            "session started"
        );

        while self.is_live() {
            let started = Instant::now();
            self.tick();
            if let Some(rest) = self.tick_interval.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }

        self.close();
        info!(
            frames = self.sim.frames(),
            score_first = self.players[0].score,
            score_second = self.players[1].score,
            "session ended"
        );
    }

    /// One iteration of the loop, without pacing.
    pub fn tick(&mut self) {
        self.win_pause.update(&self.clock);

        // play resumes on the tick after the pause ends
        let mut changed = false;
        if self.win_pause.is_elapsed() && !self.win_pause.just_transitioned() {
            changed = self.poll_inputs();
        }

        if changed || self.win_pause.just_elapsed() {
            self.settle();
        }

        self.sim.update(&self.clock);
        self.status.update(&self.clock);
        if self.status.just_elapsed() {
            debug!(
                session = self.id,
                frames = self.sim.frames(),
                rate = self.sim.rate(),
                score_first = self.players[0].score,
                score_second = self.players[1].score,
                "status"
            );
        }
    }

    /// True while both players are connected.
    pub fn is_live(&self) -> bool {
        self.players.iter().all(Player::is_connected)
    }

    /// Close every remaining connection.
    pub fn close(&mut self) {
        for player in &mut self.players {
            player.disconnect();
        }
    }

    /// Take at most one move from the channels. Returns true if it was applied.
    fn poll_inputs(&mut self) -> bool {
        let order = [self.polled_first, self.polled_first.opponent()];
        self.polled_first = self.polled_first.opponent();

        for side in order {
            match self.inputs[side.index()].try_recv() {
                Ok(event) => return self.apply(event),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    let player = &mut self.players[side.index()];
                    if player.is_connected() {
                        info!(%player, "input closed, player disconnected");
                        player.disconnect();
                    }
                }
            }
        }
        false
    }

    /// Apply `event` if it is the mover's turn and the cell is free.
    fn apply(&mut self, event: MoveEvent) -> bool {
        if event.side != self.turn {
            trace!(?event, turn = ?self.turn, "rejected: not this side's turn");
            return false;
        }
        if !self.board.place(event.index, event.side) {
            trace!(?event, "rejected: cell taken");
            return false;
        }
        self.turn = self.turn.opponent();
        true
    }

    /// Evaluate the board, end the round if it is over, and broadcast the result.
    fn settle(&mut self) {
        let winner = rules::winner(&self.board);
        let outcome = winner.map_or(Outcome::Ongoing, Outcome::Won);
        let body = round_body(&self.board, outcome);

        if winner.is_some() || self.board.is_full() {
            self.board.clear();

            if self.win_pause.is_elapsed() {
                match winner {
                    Some(side) => {
                        self.players[side.index()].score += 1;
                        let winner = &self.players[side.index()];
                        info!(session = self.id, %winner, score = winner.score, "round won");
                    }
                    None => info!(session = self.id, "round drawn"),
                }
                self.start_next_round();
            }
        }

        self.broadcast(&body);
    }

    fn start_next_round(&mut self) {
        self.win_pause.set(TimerState::Idle, &self.clock);
        self.opener = self.opener.opponent();
        self.turn = self.opener;
    }

    fn broadcast(&mut self, body: &str) {
        let scores = [self.players[0].score, self.players[1].score];
        for side in Side::BOTH {
            let me = side.index();
            let frame = encode_update(scores[me], scores[side.opponent().index()], body);
            self.players[me].send(frame.as_bytes());
        }
    }

    /// Session id handed out by the matchmaker.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side allowed to move next.
    pub fn turn(&self) -> Side {
        self.turn
    }

    /// Player on `side`.
    pub fn player(&self, side: Side) -> &Player<T> {
        &self.players[side.index()]
    }

    /// True while play is paused after a round ended.
    pub fn is_paused(&self) -> bool {
        !self.win_pause.is_elapsed()
    }

    /// Frame accounting of the loop.
    pub fn simulation_clock(&self) -> &SimulationClock {
        &self.sim
    }
}
