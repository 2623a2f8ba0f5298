//! Text wire format shared by the server and clients.
//!
//! - Server -> client, once on pairing: a single byte, `"0"` or `"1"`, the client's [`Side`].
//! - Client -> server, per move: one line holding a cell index `0..=8`.
//! - Server -> client, per state change:
//!   `"{my_score},{opponent_score},{cell0},...,{cell8},{outcome},"`
//!   where cells and outcome are `"0"`, `"1"`, or `"-1"`.
//!
//! Updates carry no terminator beyond their trailing comma; a reader splits the stream by
//! counting [`UPDATE_TOKENS`] comma-terminated tokens (see [`read_update`]).

use std::fmt::Display;
use std::io::{BufRead, Read};
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};

use crate::board::{Board, Cell, Side, CELL_COUNT};

/// Comma-terminated tokens in one state update: two scores, nine cells, one outcome.
pub const UPDATE_TOKENS: usize = 2 + CELL_COUNT + 1;

/// Result of evaluating the board after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No line completed (game in progress, or a draw).
    Ongoing,
    /// The side completed a line.
    Won(Side),
}

impl Outcome {
    /// Wire token of the outcome.
    pub fn token(self) -> &'static str {
        match self {
            Outcome::Ongoing => "-1",
            Outcome::Won(Side::First) => "0",
            Outcome::Won(Side::Second) => "1",
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

/// Bytes sent to a freshly paired connection.
pub fn side_assignment(side: Side) -> String {
    side.to_string()
}

/// Parse a move payload into a cell index.
///
/// Surrounding whitespace (including the line terminator) is ignored.
///
/// # Errors
/// When the payload is not an integer or is not a cell of the board.
pub fn parse_move(payload: &str) -> anyhow::Result<usize> {
    let trimmed = payload.trim();
    let index: i64 = trimmed
        .parse()
        .with_context(|| format!("'{trimmed}' is not a cell index"))?;
    if !(0..CELL_COUNT as i64).contains(&index) {
        bail!("cell index {index} is out of range 0..{CELL_COUNT}");
    }
    Ok(index as usize)
}

/// The board and outcome part of an update, identical for both recipients.
pub fn round_body(board: &Board, outcome: Outcome) -> String {
    format!("{}{outcome},", board.to_tokens())
}

/// Prefix `body` with the recipient's score, then the opponent's.
pub fn encode_update(my_score: u32, opponent_score: u32, body: &str) -> String {
    format!("{my_score},{opponent_score},{body}")
}

/// A decoded state update, as seen by one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateUpdate {
    /// Recipient's cumulative score.
    pub my_score: u32,
    /// Opponent's cumulative score.
    pub opponent_score: u32,
    /// Board, row-major.
    pub cells: [Cell; CELL_COUNT],
    /// Outcome marker.
    pub outcome: Outcome,
}

impl StateUpdate {
    /// The board carried by the update.
    pub fn board(&self) -> Board {
        let mut board = Board::new();
        for (i, cell) in self.cells.iter().enumerate() {
            if let Cell::Marked(side) = cell {
                board.place(i, *side);
            }
        }
        board
    }
}

impl Display for StateUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},", self.my_score, self.opponent_score)?;
        for cell in &self.cells {
            write!(f, "{},", cell.token())?;
        }
        write!(f, "{},", self.outcome)
    }
}

fn parse_side_token(token: &str) -> anyhow::Result<Option<Side>> {
    match token {
        "-1" => Ok(None),
        "0" => Ok(Some(Side::First)),
        "1" => Ok(Some(Side::Second)),
        other => bail!("unexpected token '{other}'"),
    }
}

impl FromStr for StateUpdate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_suffix(',')
            .ok_or_else(|| anyhow!("update must end with ','"))?;
        let tokens = body.split(',').collect::<Vec<_>>();
        if tokens.len() != UPDATE_TOKENS {
            bail!(
                "expected {UPDATE_TOKENS} tokens in update, got {}",
                tokens.len()
            );
        }

        let my_score = tokens[0].parse().context("invalid score")?;
        let opponent_score = tokens[1].parse().context("invalid opponent score")?;

        let mut cells = [Cell::Empty; CELL_COUNT];
        for (cell, token) in cells.iter_mut().zip(&tokens[2..2 + CELL_COUNT]) {
            if let Some(side) = parse_side_token(token).context("invalid cell")? {
                *cell = Cell::Marked(side);
            }
        }

        let outcome = match parse_side_token(tokens[UPDATE_TOKENS - 1]).context("invalid outcome")? {
            Some(side) => Outcome::Won(side),
            None => Outcome::Ongoing,
        };

        Ok(StateUpdate {
            my_score,
            opponent_score,
            cells,
            outcome,
        })
    }
}

/// Read the side assignment byte sent right after pairing.
pub fn read_side(reader: &mut impl Read) -> anyhow::Result<Side> {
    let mut buf = [0u8; 1];
    reader
        .read_exact(&mut buf)
        .context("connection closed before side assignment")?;
    match buf[0] {
        b'0' => Ok(Side::First),
        b'1' => Ok(Side::Second),
        other => bail!("invalid side assignment byte {other:#04x}"),
    }
}

/// Read the next state update from an update stream.
///
/// # Errors
/// On I/O failure, end of stream, or a malformed update.
pub fn read_update(reader: &mut impl BufRead) -> anyhow::Result<StateUpdate> {
    let mut raw = Vec::new();
    for _ in 0..UPDATE_TOKENS {
        let before = raw.len();
        reader
            .read_until(b',', &mut raw)
            .context("error while reading update")?;
        if raw.len() == before || raw.last() != Some(&b',') {
            bail!("stream ended in the middle of an update");
        }
    }
    let text = std::str::from_utf8(&raw).context("update is not valid utf-8")?;
    text.parse()
}
