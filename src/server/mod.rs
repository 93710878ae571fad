mod options;

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub use options::ServerOptions;

use crate::board::{render, Board, BoardError, PlayerId};
use crate::utils::prelude::{Context, Result};

/// Runs the line-oriented TCP front end: one thread per connection, a shared
/// `Board` guarded entirely by its own internal mutex. Grounded in the teacher's
/// `LTPServer::run`/`apply` dispatch loop, re-targeted from a single stdin command
/// loop onto `TcpListener::incoming` since the whole point of this board is
/// concurrent *remote* players contending for the same cells.
pub fn run(options: ServerOptions, board: Arc<Board>) -> Result<()> {
    let listener = TcpListener::bind(&options.bind).with_context(|| format!("binding to {}", options.bind))?;
    log::info!("listening on {}", options.bind);
    serve(listener, board, options)
}

/// As `run`, but against an already-bound listener (tests bind to `127.0.0.1:0`
/// and read back the OS-assigned port via `TcpListener::local_addr` before
/// connecting clients, since `run` itself never hands the bound address back).
pub fn serve(listener: TcpListener, board: Arc<Board>, options: ServerOptions) -> Result<()> {
    let next_connection_id = AtomicUsize::new(1);

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                log::warn!("failed to accept connection: {e}");
                continue;
            }
        };

        let board = Arc::clone(&board);
        let options = options.clone();
        let conn_id = next_connection_id.fetch_add(1, Ordering::Relaxed);

        std::thread::spawn(move || {
            let peer = stream.peer_addr().map(|a| a.to_string()).unwrap_or_else(|_| "<unknown>".into());
            log::debug!("connection {conn_id} opened ({peer})");
            match handle_connection(stream, &board, &options, conn_id) {
                Ok(()) => log::debug!("connection {conn_id} closed ({peer})"),
                Err(e) => log::warn!("connection {conn_id} ended with error: {e}"),
            }
        });
    }

    Ok(())
}

/// Reads one command per line until `bye` or EOF, writing back either the
/// requested `render()` text or a single `err: <message>` line, each reply
/// terminated by a blank line. Mirrors the teacher's `apply`/`ok`/`err`
/// footer convention, adapted from a one-shot CLI footer into a per-line reply.
fn handle_connection(stream: TcpStream, board: &Board, options: &ServerOptions, conn_id: usize) -> Result<()> {
    let id: PlayerId = format!("conn{conn_id}").into();
    let reader = BufReader::new(stream.try_clone().context("cloning connection handle")?);
    let mut writer = stream;

    for line in reader.lines() {
        let line = line.context("reading command line")?;
        let args: Vec<&str> = line.split_whitespace().collect();
        let Some(&cmd) = args.first() else { continue };
        if cmd == "bye" {
            break;
        }

        match apply(board, &id, options, cmd, &args[1..]) {
            Ok(text) => {
                log::debug!("connection {conn_id}: {cmd} {} -> ok", args[1..].join(" "));
                write!(writer, "{text}")?;
            }
            Err(e) => {
                log::warn!("connection {conn_id}: {cmd} {} -> err: {e}", args[1..].join(" "));
                writeln!(writer, "err: {e}")?;
            }
        }
        writeln!(writer)?;
        writer.flush()?;
    }
    Ok(())
}

/// The command table: `look`, `flip <row> <col>`, `register <displayName>`. `bye`
/// is handled by the caller before reaching here. Both `look` and `flip`
/// auto-register the connection's player-id on first use, with a default
/// display name derived from `options.player_name_prefix`; an explicit `register`
/// only has an effect the first time it runs for this id, since registration is
/// idempotent.
fn apply(board: &Board, id: &PlayerId, options: &ServerOptions, cmd: &str, args: &[&str]) -> std::result::Result<String, BoardError> {
    match cmd {
        "look" => {
            board.register_player(id.clone(), Some(default_display_name(options, id)))?;
            Ok(render(board, id.clone()))
        }
        "flip" => {
            board.register_player(id.clone(), Some(default_display_name(options, id)))?;
            let (row, col) = parse_coords(args)?;
            board.flip_up(id.clone(), row, col)?;
            Ok(render(board, id.clone()))
        }
        "register" => {
            let name = if args.is_empty() { id.as_str().to_owned() } else { args.join(" ") };
            board.register_player(id.clone(), Some(name))?;
            Ok(render(board, id.clone()))
        }
        _ => Err(BoardError::BadRequest(format!("unrecognized command {cmd:?}"))),
    }
}

fn parse_coords(args: &[&str]) -> std::result::Result<(usize, usize), BoardError> {
    let row = args.first().and_then(|s| s.parse::<usize>().ok());
    let col = args.get(1).and_then(|s| s.parse::<usize>().ok());
    match (row, col) {
        (Some(row), Some(col)) => Ok((row, col)),
        _ => Err(BoardError::BadRequest("flip requires <row> <col>".into())),
    }
}

fn default_display_name(options: &ServerOptions, id: &PlayerId) -> String {
    format!("{}-{}", options.player_name_prefix, id.as_str())
}
