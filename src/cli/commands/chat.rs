//! Interactive chat command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(video: &str, settings: Settings) -> Result<()> {
    let mut orchestrator = Orchestrator::new(&settings)?;

    Output::info(&format!("Chatting about {}", video));
    Output::info("Type your question, or 'exit' to quit.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("\n> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        let spinner = Output::spinner("Thinking...");
        let turn = orchestrator.ask_question(video, question).await;
        spinner.finish_and_clear();

        match turn {
            Ok(turn) => println!("\n{}", turn.content),
            Err(e) => Output::error(&format!("{}", e)),
        }
    }

    Ok(())
}
