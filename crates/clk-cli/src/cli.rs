//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Personal work-hour tracker.
///
/// Records start and end of the working day, absences and public holidays,
/// and keeps track of flextime and vacation days.
#[derive(Debug, Parser)]
#[command(name = "clk", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start time tracking for the current day.
    Start,

    /// Stop time tracking for the current day.
    Stop,

    /// Manually track a workday; given values replace stored ones.
    Track {
        /// Date of the workday (dd.mm.yyyy), defaults to today.
        #[arg(short, long)]
        date: Option<String>,

        /// Start time (hh:mm[:ss]).
        #[arg(short, long)]
        begin: Option<String>,

        /// End time (hh:mm[:ss]).
        #[arg(short, long)]
        end: Option<String>,

        /// Pause duration (h:mm[:ss]).
        #[arg(short, long)]
        pause: Option<String>,
    },

    /// Remove one or multiple days.
    Remove {
        /// First day to remove (dd.mm.yyyy).
        #[arg(short, long)]
        start: String,

        /// Last day to remove, defaults to the first day.
        #[arg(short, long)]
        end: Option<String>,
    },

    /// Show all days of a month with statistics.
    Show {
        /// Month to show, defaults to the current month.
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Year to show, defaults to the current year.
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Generate a monthly report.
    Report {
        /// Month of the report, defaults to the current month.
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Year of the report, defaults to the current year.
        #[arg(short, long)]
        year: Option<i32>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,

        /// Write the report to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Record an absence day or period.
    Notify {
        /// First day of the absence (dd.mm.yyyy).
        #[arg(short, long)]
        start: String,

        /// Last day of the absence, defaults to the first day.
        #[arg(short, long)]
        end: Option<String>,

        /// Absence type: W=Workday, V=Vacation, F=Flexday, S=Sickness, H=Holiday.
        #[arg(short, long)]
        absence: String,
    },

    /// Record the public holidays of a year.
    Holidays {
        /// Year of the holidays, defaults to the current year.
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Print the effective settings.
    Settings {
        /// A single setting as `section.key`, e.g. `work.pause_time`.
        key: Option<String>,
    },
}
