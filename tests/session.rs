use std::{
    io::{BufReader, Write},
    net::{TcpListener, TcpStream},
    thread,
    time::Duration,
};

use tictactoe_server::prelude::*;
use tictactoe_server::protocol::{read_side, read_update};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const WIN_PAUSE: Duration = Duration::from_millis(200);
const EMPTY_BOARD: &str = "-1,-1,-1,-1,-1,-1,-1,-1,-1,";

fn init_test_logger() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

struct TestClient {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
    side: Side,
}

impl TestClient {
    fn connect(port: u16) -> TestClient {
        let stream = TcpStream::connect(("127.0.0.1", port)).expect("could not connect");
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let side = read_side(&mut reader).expect("no side assignment");
        TestClient {
            stream,
            reader,
            side,
        }
    }

    fn send(&mut self, line: &str) {
        self.stream.write_all(line.as_bytes()).unwrap();
    }

    fn next_update(&mut self) -> String {
        read_update(&mut self.reader)
            .expect("no update received")
            .to_string()
    }
}

/// Start a matchmaker on a free port and pair two clients.
fn start_match() -> (TestClient, TestClient) {
    init_test_logger();

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = Configuration::new()
        .with_tick_interval(Duration::from_millis(5))
        .with_win_pause(WIN_PAUSE);
    let matchmaker = Matchmaker::from_listener(listener, config);
    thread::spawn(move || matchmaker.run());

    // the first client reads its side before the second one connects, so accept order is fixed
    let first = TestClient::connect(port);
    let second = TestClient::connect(port);
    (first, second)
}

#[test]
fn pairing_assigns_sides_in_accept_order() {
    let (first, second) = start_match();
    assert_eq!(first.side, Side::First);
    assert_eq!(second.side, Side::Second);
}

#[test]
fn full_round_is_scored_and_next_round_opens_with_other_side() {
    let (mut first, mut second) = start_match();

    let moves = [
        (Side::First, "0"),
        (Side::Second, "3"),
        (Side::First, "1"),
        (Side::Second, "4"),
    ];
    for (side, cell) in moves {
        let mover = if side == Side::First {
            &mut first
        } else {
            &mut second
        };
        mover.send(&format!("{cell}\n"));
        first.next_update();
        second.next_update();
    }

    first.send("2\n");
    assert_eq!(first.next_update(), "1,0,0,0,0,1,1,-1,-1,-1,-1,0,");
    assert_eq!(second.next_update(), "0,1,0,0,0,1,1,-1,-1,-1,-1,0,");

    // board cleared once the pause is over
    assert_eq!(first.next_update(), format!("1,0,{EMPTY_BOARD}-1,"));
    assert_eq!(second.next_update(), format!("0,1,{EMPTY_BOARD}-1,"));

    // second side opens round two
    second.send("8\n");
    assert_eq!(
        first.next_update(),
        "1,0,-1,-1,-1,-1,-1,-1,-1,-1,1,-1,"
    );
    second.next_update();
}

#[test]
fn malformed_moves_are_ignored() {
    let (mut first, mut second) = start_match();

    first.send("hello\n");
    first.send("42\n");
    first.send("4\n");

    let update = first.next_update().parse::<StateUpdate>().unwrap();
    assert_eq!(update.cells[4], Cell::Marked(Side::First));
    assert_eq!(
        update.cells.iter().filter(|c| **c != Cell::Empty).count(),
        1
    );
    second.next_update();
}

#[test]
fn move_without_newline_is_applied() {
    let (mut first, mut second) = start_match();

    first.send("4");

    assert_eq!(
        first.next_update(),
        "0,0,-1,-1,-1,-1,0,-1,-1,-1,-1,-1,"
    );
    second.next_update();
}

#[test]
fn session_closes_survivor_when_a_player_leaves() {
    let (mut first, second) = start_match();

    drop(second);

    // the server shuts the surviving connection down instead of leaving it hanging
    assert!(read_update(&mut first.reader).is_err());
}
