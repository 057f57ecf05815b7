//! `rummage chat` — the interactive session loop.
//!
//! Reads one question at a time, runs a full turn for it, prints the answer
//! and its source label, and repeats until an exit command. Empty input is
//! re-prompted without starting a turn; a failed turn prints an error line
//! and the session keeps accepting questions.

use std::sync::Arc;

use rummage_agent::TurnRunner;
use rummage_core::event::{EventBus, TurnEvent};
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

/// What one line of user input asks for.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SessionInput {
    /// Blank or whitespace-only: re-prompt, no turn starts.
    Empty,
    /// An exit token: end the session.
    Quit,
    /// A question to research.
    Question(String),
}

/// Classify a raw input line.
pub(crate) fn parse_input(line: &str) -> SessionInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return SessionInput::Empty;
    }
    if matches!(trimmed.to_lowercase().as_str(), "quit" | "exit" | "q") {
        return SessionInput::Quit;
    }
    SessionInput::Question(trimmed.to_string())
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (runner, events) = super::setup()?;

    println!();
    println!("  Welcome to rummage — a research agent.");
    println!("  Ask me anything and I'll search Wikipedia and the web for answers.");
    println!("{}", "=".repeat(60));

    spawn_step_printer(events);

    let mut lines = BufReader::new(stdin()).lines();

    loop {
        println!();
        println!("Enter your question (or 'quit' to exit):");

        let Some(line) = lines.next_line().await? else {
            break; // EOF (Ctrl+D)
        };

        match parse_input(&line) {
            SessionInput::Empty => {
                println!("Please enter a question!");
            }
            SessionInput::Quit => break,
            SessionInput::Question(question) => {
                run_turn(&runner, &question).await;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Run one turn and print its result. Turn errors never end the session.
pub(crate) async fn run_turn(runner: &TurnRunner, question: &str) {
    println!();
    println!("Question: {question}");
    println!("{}", "=".repeat(50));

    match runner.run(question).await {
        Ok(outcome) => {
            println!("{}", "=".repeat(50));
            println!("Answer: {}", outcome.answer);
            println!("Source: {}", outcome.source_label());
        }
        Err(e) => {
            println!("{}", "=".repeat(50));
            println!("Sorry, something went wrong with that question: {e}");
            println!("Please try again.");
        }
    }
}

/// Print step markers as the turn progresses.
fn spawn_step_printer(events: Arc<EventBus>) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        while let Some(event) = next_event(&mut rx).await {
            match event.as_ref() {
                TurnEvent::ModelCalled { step, .. } => {
                    println!("Step {step}: analyzing your question...");
                }
                TurnEvent::ToolStarted { tool_name, query, .. } => match tool_name.as_str() {
                    "wikipedia" => println!("   Searching Wikipedia for: {query}"),
                    "web_search" => println!("   Searching the web for: {query}"),
                    other => println!("   Using tool: {other}"),
                },
                TurnEvent::ToolFinished { tool_name, success, .. } => {
                    if !success {
                        println!("   {tool_name} failed, letting the model know...");
                    }
                }
            }
        }
    });
}

/// Receive the next event, skipping over lag; `None` means the bus closed.
/// A slow printer must only drop markers, never stop printing for good.
async fn next_event(
    rx: &mut broadcast::Receiver<Arc<TurnEvent>>,
) -> Option<Arc<TurnEvent>> {
    loop {
        match rx.recv().await {
            Ok(event) => return Some(event),
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}
