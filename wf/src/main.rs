//! Wayfarer - conversational travel itinerary planner
//!
//! CLI entry point for creating trips and talking their itineraries into
//! shape.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{info, warn};

use itinstore::{ItineraryStore, NewTrip, SqliteDb, Trip};
use wayfarer::cli::{Cli, Command, OutputFormat};
use wayfarer::config::Config;
use wayfarer::llm::create_client;
use wayfarer::planner::{BulkItineraryGenerator, ItineraryPlanner, TripPlanRequest};
use wayfarer::prompts::PromptLoader;
use wayfarer::protocol::PromptComposer;
use wayfarer::repl::ChatSession;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wayfarer")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file =
        fs::File::create(log_dir.join("wayfarer.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        "Wayfarer loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Some(Command::New { destination, start, end, title, describe }) => {
            cmd_new(&config, destination, start, end, title, describe).await
        }
        Some(Command::Chat { trip }) => cmd_chat(&config, &trip).await,
        Some(Command::Show { trip, format }) => cmd_show(&config, &trip, format),
        Some(Command::Trips) => cmd_trips(&config),
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Open the trip database, creating the data directory if needed
fn open_db(config: &Config) -> Result<SqliteDb> {
    let db_path = config.storage.db_path();
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("Failed to create data directory")?;
    }
    Ok(SqliteDb::open(&db_path)?)
}

fn require_trip(db: &SqliteDb, name_or_id: &str) -> Result<Trip> {
    db.find_trip(name_or_id)?.ok_or_else(|| {
        eyre::eyre!("No trip named '{}'. Run `wf trips` to list trips.", name_or_id)
    })
}

/// Create a trip and generate its starting itinerary
async fn cmd_new(
    config: &Config,
    destination: String,
    start: NaiveDate,
    end: NaiveDate,
    title: Option<String>,
    describe: Option<String>,
) -> Result<()> {
    if end < start {
        return Err(eyre::eyre!("End date {} is before start date {}", end, start));
    }

    // Validate API key early, before any trip record exists
    config.validate()?;

    let db = open_db(config)?;
    let trip = db.create_trip(NewTrip {
        destination: destination.clone(),
        start_date: start,
        end_date: end,
        name: None,
        title,
    })?;

    println!("Created trip {} ({})", trip.name.bright_cyan(), trip.title);

    let client = create_client(&config.llm)?;
    let composer = PromptComposer::new(PromptLoader::new(&config.prompts));
    let generator = BulkItineraryGenerator::new(client, composer, config.llm.bulk_budget());
    let store = db.trip(&trip.id)?;

    let request = TripPlanRequest {
        destination,
        title: trip.title.clone(),
        start_date: start,
        end_date: end,
        description: describe,
    };

    println!("Generating itinerary for {} to {}...", start, end);
    match generator.generate(&request, &store).await {
        Ok(items) => {
            println!("{} Generated {} itinerary items", "✓".green(), items.len());
            println!(
                "Next: {}",
                format!("wf chat --trip {}", trip.name).yellow()
            );
        }
        Err(err) => {
            // The trip record stands; the itinerary just starts empty
            warn!(error = %err, "itinerary generation failed");
            println!("{} Itinerary generation failed: {}", "⚠".yellow(), err);
            println!(
                "The trip was created with an empty itinerary. Add items in chat: {}",
                format!("wf chat --trip {}", trip.name).yellow()
            );
        }
    }

    Ok(())
}

/// Start an interactive chat session for a trip
async fn cmd_chat(config: &Config, trip: &str) -> Result<()> {
    config.validate()?;

    let db = open_db(config)?;
    let trip = require_trip(&db, trip)?;
    let store = db.trip(&trip.id)?;

    let client = create_client(&config.llm)?;
    let composer = PromptComposer::new(PromptLoader::new(&config.prompts));
    let planner = ItineraryPlanner::new(client, composer, config.llm.chat_budget());

    let mut session = ChatSession::new(planner, Arc::new(store), trip);
    session.run().await
}

/// Print a trip's itinerary
fn cmd_show(config: &Config, trip: &str, format: OutputFormat) -> Result<()> {
    let db = open_db(config)?;
    let trip = require_trip(&db, trip)?;
    let store = db.trip(&trip.id)?;
    let items = store.current()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Table => {
            println!("{} ({} to {})", trip.title, trip.start_date, trip.end_date);
            if items.is_empty() {
                println!("No itinerary items.");
                return Ok(());
            }

            println!();
            println!(
                "{:<5} {:<11} {:<6} {:<10} {:<14} {:<28} {}",
                "ID", "DATE", "TIME", "DURATION", "TYPE", "LOCATION", "ACTIVITY"
            );
            for item in &items {
                println!(
                    "{:<5} {:<11} {:<6} {:<10} {:<14} {:<28} {}",
                    item.id,
                    item.date.to_string(),
                    item.time.format("%H:%M").to_string(),
                    item.duration.to_string(),
                    item.kind.to_string(),
                    item.location,
                    item.activity
                );
            }
        }
    }

    Ok(())
}

/// List known trips
fn cmd_trips(config: &Config) -> Result<()> {
    let db = open_db(config)?;
    let trips = db.list_trips()?;

    if trips.is_empty() {
        println!("No trips yet. Create one:");
        println!("  wf new \"Paris, France\" --start 2024-06-01 --end 2024-06-03");
        return Ok(());
    }

    println!("Trips:");
    println!();

    for trip in &trips {
        let count = db.item_count(&trip.id)?;
        println!("  {}", trip.name.bright_cyan());
        println!(
            "    {} - {} to {} ({} items)",
            trip.destination, trip.start_date, trip.end_date, count
        );
    }

    Ok(())
}
