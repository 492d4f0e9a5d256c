//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Stint tracker.
///
/// Records discrete units of focused work and derives weekly statistics
/// and treat rewards from the accumulated history.
#[derive(Debug, Parser)]
#[command(name = "stint", version, about, long_about = None)]
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
    /// Start a stint.
    Start {
        /// Task to track, skipping the interactive selection.
        #[arg(long)]
        task: Option<String>,

        /// Details recorded alongside the stint.
        #[arg(long)]
        notes: Option<String>,
    },

    /// Show weekly statistics and high scores.
    Stats {
        /// Also list totals for the most recent N weeks.
        #[arg(long)]
        weeks: Option<usize>,

        /// Show per-weekday averages across all recorded weeks.
        #[arg(long)]
        averages: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the treat bank.
    Treats {
        /// Redeem a treat interactively.
        #[arg(long)]
        redeem: bool,
    },

    /// Look up stints for a date or date range.
    Log {
        /// A single date (YYYY-MM-DD).
        #[arg(long, conflicts_with_all = ["from", "to"])]
        date: Option<String>,

        /// Range start date (YYYY-MM-DD).
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Range end date (YYYY-MM-DD), inclusive.
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
