use std::fs::File;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::Parser;
use clk_core::{RecordStore, Tracker};
use clk_db::{Database, JsonStore};
use tracing_subscriber::EnvFilter;

use clk_cli::commands::{holidays, notify, remove, report, settings, show, start, stop, track};
use clk_cli::{Cli, Commands, Config, Storage};

/// Opens the configured record store, ensuring its location exists.
fn open_store(config: &Config) -> Result<Box<dyn RecordStore>> {
    let path = &config.database_path;
    match config.storage {
        Storage::Sqlite => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .context("failed to create database directory")?;
            }
            let db = Database::open(path).context("failed to open database")?;
            Ok(Box::new(db))
        }
        Storage::Json => {
            let store = JsonStore::open(path).context("failed to open json store")?;
            Ok(Box::new(store))
        }
    }
}

fn open_tracker(config: &Config) -> Result<Tracker<Box<dyn RecordStore>>> {
    Ok(Tracker::new(config.settings(), open_store(config)?))
}

fn run(cli: &Cli) -> Result<()> {
    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let today = Local::now().date_naive();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Start => start::run(&mut out, &mut open_tracker(&config)?)?,
        Commands::Stop => stop::run(&mut out, &mut open_tracker(&config)?)?,
        Commands::Track {
            date,
            begin,
            end,
            pause,
        } => {
            let input = track::TrackInput {
                date: date.as_deref(),
                begin: begin.as_deref(),
                end: end.as_deref(),
                pause: pause.as_deref(),
            };
            track::run(&mut out, &mut open_tracker(&config)?, input, today)?;
        }
        Commands::Remove { start, end } => {
            let mut tracker = open_tracker(&config)?;
            remove::run(&mut out, &mut tracker, start, end.as_deref())?;
        }
        Commands::Show { month, year } => {
            let store = open_store(&config)?;
            show::run(
                &mut out,
                &store,
                &config.settings(),
                month.unwrap_or_else(|| today.month()),
                year.unwrap_or_else(|| today.year()),
                today,
            )?;
        }
        Commands::Report {
            month,
            year,
            json,
            output,
        } => {
            let month = month.unwrap_or_else(|| today.month());
            let year = year.unwrap_or_else(|| today.year());
            let store = open_store(&config)?;
            let settings = config.settings();
            if let Some(path) = output {
                let mut file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                report::run(&mut file, &store, &settings, month, year, *json)?;
                file.flush()?;
                tracing::info!(path = %path.display(), "report written");
            } else {
                report::run(&mut out, &store, &settings, month, year, *json)?;
            }
        }
        Commands::Notify {
            start,
            end,
            absence,
        } => {
            let mut tracker = open_tracker(&config)?;
            notify::run(&mut out, &mut tracker, start, end.as_deref(), absence)?;
        }
        Commands::Holidays { year } => {
            let year = year.unwrap_or_else(|| today.year());
            holidays::run(&mut out, &mut open_tracker(&config)?, year)?;
        }
        Commands::Settings { key } => {
            settings::run(&mut out, &config.settings(), key.as_deref())?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so report output on stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Err(err) = run(&cli) else {
        return ExitCode::SUCCESS;
    };

    // Policy refusals are expected outcomes, everything else fails the process
    match err.downcast_ref::<clk_core::Error>() {
        Some(refusal) if refusal.is_warning() => {
            tracing::warn!(%refusal, "command refused");
            println!("[Warning] {refusal}");
            ExitCode::SUCCESS
        }
        _ => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            eprintln!("[Error] {err:#}");
            ExitCode::FAILURE
        }
    }
}
