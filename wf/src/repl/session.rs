//! Chat session management
//!
//! The interactive loop around the planner: read a message, run the
//! turn, print the reply with any conflict warnings, apply the mutation,
//! remember the exchange. The store is re-read at the top of every turn
//! so manual edits from another session are always visible.

use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::domain::{ConversationTurn, ItineraryItem, ItineraryStore, TripPreferences};
use crate::planner::ItineraryPlanner;
use crate::protocol::{apply, MutationOutcome};
use itinstore::Trip;

/// Interactive chat session bound to one trip
pub struct ChatSession {
    planner: ItineraryPlanner,
    store: Arc<dyn ItineraryStore>,
    trip: Trip,
    history: Vec<ConversationTurn>,
    preferences: TripPreferences,
}

impl ChatSession {
    pub fn new(planner: ItineraryPlanner, store: Arc<dyn ItineraryStore>, trip: Trip) -> Self {
        Self {
            planner,
            store,
            trip,
            history: Vec::new(),
            preferences: TripPreferences::default(),
        }
    }

    /// Run the chat main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new()
            .map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.process_message(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show a new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Safe travels!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", self.trip.title.bright_cyan().bold());
        println!(
            "{} to {}, {} to {}",
            "Trip".dimmed(),
            self.trip.destination,
            self.trip.start_date,
            self.trip.end_date
        );
        println!(
            "Type {} for help, {} to quit",
            "/help".yellow(),
            "/quit".yellow()
        );
        println!();
    }

    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/show" | "/s" => {
                self.print_itinerary();
                SlashResult::Continue
            }
            "/clear" | "/c" => {
                self.history.clear();
                println!("{}", "Conversation cleared.".dimmed());
                SlashResult::Continue
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Show the current itinerary", "/show".yellow());
        println!("  {:14} Clear conversation history", "/clear".yellow());
        println!("  {:14} Exit the chat", "/quit".yellow());
        println!();
        println!("Anything else is sent to the planner, for example:");
        println!("  {}", "add the Bronx Zoo on the first afternoon".dimmed());
        println!("  {}", "move dinner on the 2nd to 19:30".dimmed());
        println!("  {}", "drop the museum visit".dimmed());
        println!();
    }

    fn print_itinerary(&self) {
        let items = match self.store.current() {
            Ok(items) => items,
            Err(err) => {
                println!("{} {}", "Error:".red(), err);
                return;
            }
        };

        if items.is_empty() {
            println!("{}", "No itinerary items yet, ask for some.".dimmed());
            return;
        }

        println!();
        print!("{}", format_items(&items));
        println!();
    }

    /// One conversational turn: snapshot, plan, print, apply, remember
    async fn process_message(&mut self, input: &str) {
        let snapshot = match self.store.current() {
            Ok(items) => items,
            Err(err) => {
                println!("{} {}", "Error:".red(), err);
                return;
            }
        };

        let turn = self
            .planner
            .converse_or_fallback(input, &snapshot, &self.history, &self.preferences)
            .await;

        println!();
        println!("{}", turn.envelope.text);

        for conflict in &turn.conflicts {
            println!(
                "{} overlaps {} at {} ({})",
                "Warning:".yellow(),
                conflict.location,
                conflict.time.format("%H:%M"),
                conflict.duration
            );
        }

        match apply(&turn.envelope, self.store.as_ref()) {
            Ok(MutationOutcome::TextOnly) => {}
            Ok(outcome) => println!("{}", format!("[{}]", outcome).dimmed()),
            Err(err) => println!("{} {}", "Error:".red(), err),
        }

        self.history.push(ConversationTurn::user(input));
        self.history.push(ConversationTurn::assistant(turn.envelope.text.clone()));
        println!();
    }
}

/// Render items as an indented schedule with one header per date
fn format_items(items: &[ItineraryItem]) -> String {
    let mut out = String::new();
    let mut last_date = None;

    for item in items {
        if last_date != Some(item.date) {
            out.push_str(&format!("{}\n", item.date.to_string().bright_cyan()));
            last_date = Some(item.date);
        }
        out.push_str(&format!(
            "  {}  {} ({}) - {} {}\n",
            item.time.format("%H:%M"),
            item.location,
            item.duration,
            item.activity,
            format!("[{} #{}]", item.kind, item.id).dimmed()
        ));
    }

    out
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, DurationHours, ItemKind};
    use chrono::{NaiveDate, NaiveTime};

    fn item(id: i64, date: &str, time: &str) -> ItineraryItem {
        ItineraryItem {
            id,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            duration: DurationHours::new(1.0).unwrap(),
            location: "Louvre Museum".to_string(),
            address: "Rue de Rivoli".to_string(),
            activity: "See the collection".to_string(),
            kind: ItemKind::Museum,
            rating: 4.7,
            coordinates: Coordinates { lat: 48.8606, lng: 2.3376 },
        }
    }

    #[test]
    fn test_format_items_groups_by_date() {
        colored::control::set_override(false);
        let rendered = format_items(&[
            item(1, "2024-06-01", "09:00"),
            item(2, "2024-06-01", "14:00"),
            item(3, "2024-06-02", "10:00"),
        ]);
        colored::control::unset_override();

        assert_eq!(rendered.matches("2024-06-01").count(), 1);
        assert_eq!(rendered.matches("2024-06-02").count(), 1);
        assert!(rendered.contains("09:00  Louvre Museum (1 hour) - See the collection [museum #1]"));
    }
}
