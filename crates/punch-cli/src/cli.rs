//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Personal timer tracker.
///
/// Tracks named timers through an append-only start/stop log and rebuilds
/// elapsed durations per timer, day, or date range.
#[derive(Debug, Parser)]
#[command(name = "punch", version, about, long_about = None)]
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
    /// Create a timer (or refresh an existing one).
    Create {
        /// The timer name.
        title: String,
    },

    /// Start a timer, stopping the currently running one.
    Start {
        /// The timer name.
        title: String,
    },

    /// Record a stop mark for a timer.
    Stop {
        /// The timer name.
        title: String,
    },

    /// List timers, most recently used first.
    List,

    /// Show the active timer and its tracked time.
    Status,

    /// Show one timer's tracked time and mark count.
    Show {
        /// The timer name.
        title: String,
    },

    /// Rebuild tracked time per timer for a day or date range.
    Report {
        /// Report a single day.
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,

        /// First day of a range (inclusive).
        #[arg(long, value_name = "YYYY-MM-DD", requires = "to", conflicts_with = "date")]
        from: Option<NaiveDate>,

        /// Last day of a range (exclusive, like the upper bound of a week).
        #[arg(long, value_name = "YYYY-MM-DD", requires = "from", conflicts_with = "date")]
        to: Option<NaiveDate>,

        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}
