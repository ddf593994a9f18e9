//! Interactive console front end for the SAGE assistant.
//!
//! Drives the full pipeline from a terminal: user lines go to the dialogue
//! agent, decoded replies land in the transcript, and highlight transitions
//! are rendered as console markers on the three tracked printer controls.

use std::env;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;
use tokio::time::timeout;
use tracing_subscriber::EnvFilter;

use sage_application::{AssistantUsecase, TranscriptLog, TranscriptRole};
use sage_core::MessageSurface;
use sage_core::TargetId;
use sage_core::highlight::{Color, HighlightConfig, HighlightController, Vec3, VisualTarget};
use sage_interaction::{DialogueAgent, DialogueClient, DialogueConfig, MockDialogueAgent};

const TURN_TIMEOUT: Duration = Duration::from_secs(30);

/// Console rendering of one tracked control: color transitions print a
/// marker line, scale writes from the pulse stay silent.
struct ConsoleTarget {
    name: &'static str,
    highlighted: bool,
    scale: Vec3,
}

impl ConsoleTarget {
    fn shared(name: &'static str) -> Arc<Mutex<dyn VisualTarget>> {
        Arc::new(Mutex::new(Self {
            name,
            highlighted: false,
            scale: Vec3::splat(1.0),
        }))
    }
}

impl VisualTarget for ConsoleTarget {
    fn set_color(&mut self, color: Color) {
        let lit = color.a > 0.5;
        if lit && !self.highlighted {
            println!("{}", format!("  ● {} is highlighted", self.name).bright_green());
        } else if !lit && self.highlighted {
            println!("{}", format!("  ○ {} highlight cleared", self.name).bright_black());
        }
        self.highlighted = lit;
    }

    fn scale(&self) -> Vec3 {
        self.scale
    }

    fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }
}

/// Prints conversation lines as they happen and mirrors them into a
/// transcript log for the `/history` command.
struct ReplSurface {
    log: Arc<TranscriptLog>,
}

impl MessageSurface for ReplSurface {
    fn append(&self, text: &str, from_assistant: bool) {
        if from_assistant {
            for line in text.lines() {
                println!("{}", format!("Assistant: {line}").bright_blue());
            }
        } else {
            println!("{}", format!("You: {text}").green());
        }
        self.log.append(text, from_assistant);
    }

    fn clear_all(&self) {
        self.log.clear_all();
        println!("{}", "-- transcript cleared --".bright_black());
    }
}

fn build_agent() -> Arc<dyn DialogueAgent> {
    let use_mock = env::var("SAGE_USE_MOCK")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_mock {
        println!("{}", "Using offline mock agent (SAGE_USE_MOCK).".yellow());
        return Arc::new(MockDialogueAgent::new());
    }

    match DialogueConfig::try_from_env() {
        Ok(config) => Arc::new(DialogueClient::from_config(config)),
        Err(err) => {
            println!(
                "{}",
                format!("{err}; falling back to the offline mock agent.").yellow()
            );
            Arc::new(MockDialogueAgent::new())
        }
    }
}

fn print_history(log: &TranscriptLog) {
    let entries = log.entries();
    if entries.is_empty() {
        println!("{}", "History is empty.".bright_black());
        return;
    }
    for entry in entries {
        let speaker = match entry.role {
            TranscriptRole::User => "You".green(),
            TranscriptRole::Assistant => "Assistant".bright_blue(),
        };
        println!(
            "{} {}: {}",
            format!("[{}]", entry.timestamp).bright_black(),
            speaker,
            entry.content
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut controller = HighlightController::new(HighlightConfig::default());
    controller.register(TargetId::PowerButton, ConsoleTarget::shared("Power button"));
    controller.register(TargetId::CancelButton, ConsoleTarget::shared("Cancel button"));
    controller.register(
        TargetId::RestartButton,
        ConsoleTarget::shared("Restart button"),
    );

    let log = Arc::new(TranscriptLog::new());
    let surface = Arc::new(ReplSurface { log: log.clone() });
    let usecase = AssistantUsecase::new(build_agent(), controller, surface);

    println!("{}", "=== SAGE printer assistant ===".bright_magenta().bold());
    println!(
        "{}",
        "Ask about the printer. '/reset' starts over, '/history' replays, 'quit' exits."
            .bright_black()
    );
    println!();

    if let Err(err) = usecase.launch().await {
        tracing::debug!("launch failed: {err}");
    }

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match trimmed {
                    "quit" | "exit" => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    "/reset" => {
                        usecase.reset_conversation(None).await;
                        if let Err(err) = usecase.launch().await {
                            tracing::debug!("relaunch failed: {err}");
                        }
                    }
                    "/history" => print_history(&log),
                    _ => match timeout(TURN_TIMEOUT, usecase.send_message(trimmed)).await {
                        Ok(Ok(())) => {}
                        Ok(Err(err)) => tracing::debug!("turn failed: {err}"),
                        Err(_) => {
                            println!("{}", "Error: request timed out.".red());
                        }
                    },
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}
