pub mod clipboard;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod utils;

use std::io;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::{Cli, CommandContext};
use config::AppConfig;
use db::Database;
use error::AppResult;
use services::session::EditorSession;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

pub fn run() -> AppResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::resolve(cli.db.clone());
    let db = Arc::new(Database::new(&config.db_path)?);
    let mut session = EditorSession::new(db);
    let clipboard = clipboard::default_service();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut ctx = CommandContext {
        session: &mut session,
        clipboard: clipboard.as_ref(),
        input: &mut input,
        out: &mut out,
        json: cli.json,
    };
    commands::execute(cli.command, &mut ctx)
}
