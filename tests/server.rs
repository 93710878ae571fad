//! TCP-level round trip tests: these drive `server::serve` over a real
//! `TcpStream`, additive to the core protocol tests in `board::mod`'s own test
//! module, since this crate's own network surface isn't exercised there.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use lib_scramble::prelude::*;

fn spawn_server(board_src: &str) -> std::net::SocketAddr {
    let board = Arc::new(parse_board(board_src.as_bytes()).unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let options = ServerOptions { bind: addr.to_string(), board: "unused".into(), log_level: None, player_name_prefix: "p".into() };

    std::thread::spawn(move || {
        serve(listener, board, options).unwrap();
    });
    // Give the acceptor a moment to start listening for the first connect.
    std::thread::sleep(Duration::from_millis(20));
    addr
}

fn send(stream: &mut TcpStream, line: &str) -> String {
    writeln!(stream, "{line}").unwrap();
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut reply = String::new();
    loop {
        let mut buf = String::new();
        reader.read_line(&mut buf).unwrap();
        if buf == "\n" || buf.is_empty() {
            break;
        }
        reply.push_str(&buf);
    }
    reply
}

#[test]
fn look_flip_register_round_trip() {
    let addr = spawn_server("1x3\nA\nA\nB\n");
    let mut client = TcpStream::connect(addr).unwrap();

    let looked = send(&mut client, "look");
    assert!(looked.starts_with("1x3\n"));
    assert!(looked.contains("down\n"));

    let registered = send(&mut client, "register Alice");
    assert!(registered.starts_with("1x3\n"));

    let flipped = send(&mut client, "flip 0 0");
    assert!(flipped.contains("my A"));
}

#[test]
fn flip_out_of_bounds_reports_an_error_line() {
    let addr = spawn_server("1x1\nA\n");
    let mut client = TcpStream::connect(addr).unwrap();

    let reply = send(&mut client, "flip 5 5");
    assert!(reply.starts_with("err:"));
    assert!(reply.contains("out of bounds"));
}

#[test]
fn two_connections_contend_for_the_same_cell() {
    let addr = spawn_server("1x2\nA\nB\n");
    let mut c1 = TcpStream::connect(addr).unwrap();
    let mut c2 = TcpStream::connect(addr).unwrap();

    let r1 = send(&mut c1, "flip 0 0");
    assert!(r1.contains("my A"));

    let waiter = std::thread::spawn(move || send(&mut c2, "flip 0 0"));
    std::thread::sleep(Duration::from_millis(50));

    let r1b = send(&mut c1, "flip 0 1"); // mismatch, releases both cards
    assert!(r1b.contains("up A"));
    assert!(r1b.contains("up B"));

    let r2 = waiter.join().unwrap();
    assert!(r2.contains("my A"));
}
