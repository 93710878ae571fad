use std::path::PathBuf;

use clap::Parser;

/// CLI configuration for the scramble server, following `LTPServerOptions`'s
/// field style (plain `clap::Parser` derive, `Option<T>` for anything with a
/// sensible runtime default).
#[derive(Clone, Debug, Parser)]
pub struct ServerOptions {
    /// Address to bind the TCP listener to.
    #[arg(short, long, default_value = "127.0.0.1:4242")]
    pub bind: String,

    /// Path to the board file to load at startup (see the parser's `<rows>x<cols>`
    /// header format).
    #[arg(short = 'f', long)]
    pub board: PathBuf,

    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Prefix used for the default display name assigned to a connection that
    /// never sends an explicit `register` command.
    #[arg(short = 'p', long, default_value = "player")]
    pub player_name_prefix: String,
}
