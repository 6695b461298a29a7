//! CLI command definitions and subcommands

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Wayfarer - conversational travel itinerary planner
#[derive(Parser)]
#[command(
    name = "wf",
    about = "Plan trips in conversation: generate an itinerary, then talk it into shape",
    version,
    after_help = "Logs are written to: ~/.local/share/wayfarer/logs/wayfarer.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Create a trip and generate its starting itinerary
    New {
        /// Destination, e.g. "Paris, France"
        destination: String,

        /// First day of the trip (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Last day of the trip, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Trip title (defaults to "Trip to <destination>")
        #[arg(long)]
        title: Option<String>,

        /// What kind of trip this is; every generated activity must serve it
        #[arg(long)]
        describe: Option<String>,
    },

    /// Chat about a trip's itinerary
    Chat {
        /// Trip name or id
        #[arg(short, long)]
        trip: String,
    },

    /// Print a trip's itinerary
    Show {
        /// Trip name or id
        #[arg(short, long)]
        trip: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// List known trips
    Trips,
}

/// Output format for the show command
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "text" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: table or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}
