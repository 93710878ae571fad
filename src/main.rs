use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use lib_scramble::prelude::*;

fn main() -> Result<()> {
    // Initialize program options and environment.
    dotenvy::dotenv().ok();
    let options = ServerOptions::parse();
    let _logger = Logger::try_with_env_or_str(options.log_level.clone().unwrap_or("info".into()).as_str())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(match cfg!(debug_assertions) {
            true => AdaptiveFormat::WithThread,
            _ => AdaptiveFormat::Default,
        })
        .set_palette("b196;208;195;111;67".to_owned())
        .start()?;

    // Load the board and serve it to concurrent players.
    let file = File::open(&options.board).with_context(|| format!("opening board file {}", options.board.display()))?;
    let board = Arc::new(parse_board(file).with_context(|| format!("parsing board file {}", options.board.display()))?);

    if let Err(e) = run(options, board) {
        log::error!("fatal error: {}", e);
        return Err(e);
    }
    Ok(())
}
