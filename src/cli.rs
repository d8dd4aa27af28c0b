//! Command line definitions.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lightning talk scheduler: keeps a roster and rotates presenters over recurring sessions
#[derive(Parser, Debug)]
#[command(name = "lt-scheduler")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Web {
        #[arg(short, long, env = "LT_PORT", default_value_t = 8080)]
        port: u16,

        /// JSON file holding participants, config and saved schedules
        #[arg(long, env = "LT_DATA_FILE", default_value = "lt-scheduler.json")]
        data_file: PathBuf,

        /// Directory with a frontend to serve at /
        #[arg(long, env = "LT_STATIC_DIR", default_value = "static")]
        static_dir: PathBuf,
    },

    /// Generate a schedule from a roster CSV and print it
    Generate {
        /// Roster CSV with a name column and an optional slack column
        #[arg(long)]
        participants: PathBuf,

        /// First candidate date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Session weekday, 0 = Sunday .. 6 = Saturday
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=6))]
        day_of_week: u8,

        /// Weeks between sessions
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        frequency: u32,

        /// Presenters per session
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
        presenters: u32,

        /// Write the schedule as CSV to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for a reproducible presenter order
        #[arg(long)]
        seed: Option<u64>,
    },
}
