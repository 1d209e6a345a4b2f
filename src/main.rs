mod api;
mod audio;
mod cli;
mod config;
mod data;
mod db;
mod models;
mod prayer_times;
mod reminders;
mod tui;
mod utils;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::warn;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;
use db::repository::MetaRepo;
use prayer_times::TimingsProvider;

/// Days of offline timings kept ahead when the TUI starts.
const STARTUP_CACHE_DAYS: u32 = 7;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    // WAL lets `tilawah watch` and the TUI share the database
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    run_migrations(&conn)?;

    match cli.command {
        Some(Commands::Setup { reset }) => {
            handlers::handle_setup(&conn, &mut config, reset)?;
        }

        Some(cmd) => {
            ensure_setup(&conn, &mut config)?;
            match cmd {
                Commands::Times(args) => handlers::handle_times(&conn, &config, &args)?,
                Commands::Surah { action } => handlers::handle_surah(&conn, &config, &action)?,
                Commands::Dua { action } => handlers::handle_dua(&conn, &action)?,
                Commands::Reminder { action } => handlers::handle_reminder(&conn, &action)?,
                Commands::Alarm { action } => handlers::handle_alarm(&conn, &action)?,
                Commands::Watch => handlers::handle_watch(&conn, &config)?,
                Commands::Radio { action } => handlers::handle_radio(&config, &action)?,
                Commands::Location { action } => {
                    handlers::handle_location(&conn, &mut config, &action)?
                }
                Commands::History { clear } => handlers::handle_history(&conn, clear)?,
                Commands::Theme { mode } => handlers::handle_theme(&mut config, mode.as_deref())?,
                Commands::Bookmark => handlers::handle_bookmark(&conn)?,
                Commands::Reciters => handlers::handle_reciters(&config)?,
                Commands::Setup { .. } => unreachable!(),
            }
        }

        None => {
            ensure_setup(&conn, &mut config)?;
            let warm = TimingsProvider::offline(config.location.clone()).and_then(|provider| {
                provider.ensure_cached(&conn, Local::now().date_naive(), STARTUP_CACHE_DAYS)
            });
            if let Err(e) = warm {
                warn!("Could not precompute prayer times: {:#}", e);
            }
            tui::app::run(conn, config)?;
        }
    }

    Ok(())
}

/// Run the wizard on first launch.
fn ensure_setup(conn: &Connection, config: &mut AppConfig) -> Result<()> {
    let done = MetaRepo::get(conn, "setup_done")?;
    if done.as_deref() != Some("1") {
        eprintln!("No configuration found. Running setup...");
        eprintln!();
        handlers::handle_setup(conn, config, false)?;
    }
    Ok(())
}
