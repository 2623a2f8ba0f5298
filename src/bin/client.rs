use std::{
    env,
    io::{BufReader, Write},
    net::TcpStream,
    thread,
    time::Duration,
};

use anyhow::Context;

use tictactoe_server::board::{Board, Cell, Side, CELL_COUNT};
use tictactoe_server::protocol::{read_side, read_update, Outcome};

/// Demo client: always plays the first free cell.
///
/// Usage: `client [HOST:PORT]` (default `127.0.0.1:8080`).
fn main() -> anyhow::Result<()> {
    let address = env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:8080".to_owned());
    let mut stream =
        TcpStream::connect(&address).with_context(|| format!("could not connect to {address}"))?;
    let mut reader = BufReader::new(stream.try_clone()?);

    let side = read_side(&mut reader)?;
    println!("connected as side {side}, waiting for an opponent...");

    let mut opener = Side::First;
    if side == opener {
        play(&mut stream, &Board::new())?;
    }

    loop {
        let update = read_update(&mut reader)?;
        println!("GOT '{update}'");
        let board = update.board();

        if update.outcome != Outcome::Ongoing || board.is_full() {
            let result = match update.outcome {
                Outcome::Won(winner) if winner == side => "won",
                Outcome::Won(_) => "lost",
                Outcome::Ongoing => "draw",
            };
            println!("{result}! {}-{}", update.my_score, update.opponent_score);
            opener = opener.opponent();
            continue;
        }

        if is_my_turn(&board, side, opener) {
            thread::sleep(Duration::from_millis(300)); // let humans follow along
            play(&mut stream, &board)?;
        }
    }
}

fn is_my_turn(board: &Board, side: Side, opener: Side) -> bool {
    let count = |s: Side| board.cells().iter().filter(|c| **c == Cell::Marked(s)).count();
    let mine = count(side);
    let theirs = count(side.opponent());
    theirs > mine || (theirs == mine && opener == side)
}

fn play(stream: &mut TcpStream, board: &Board) -> anyhow::Result<()> {
    if let Some(index) = (0..CELL_COUNT).find(|&i| board.is_free(i)) {
        stream
            .write_all(format!("{index}\n").as_bytes())
            .context("could not send move")?;
    }
    Ok(())
}
