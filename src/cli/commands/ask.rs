//! Ask command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(video: &str, question: &str, settings: Settings) -> Result<()> {
    let mut orchestrator = Orchestrator::new(&settings)?;

    let spinner = Output::spinner("Searching the video...");
    let turn = orchestrator.ask_question(video, question).await;
    spinner.finish_and_clear();

    match turn {
        Ok(turn) => {
            println!("\n{}\n", turn.content);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("{}", e));
            Err(e.into())
        }
    }
}
