//! Ingest command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::ingest::{IngestionProgress, IngestionStatus};
use crate::orchestrator::Orchestrator;
use anyhow::Result;
use indicatif::ProgressBar;

/// Run the ingest command.
pub async fn run_ingest(input: &str, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(&settings)?;

    Output::info(&format!("Ingesting {}", input));

    let spinner = Output::spinner("Fetching transcript...");
    let mut bar: Option<ProgressBar> = None;

    let mut on_progress = |progress: IngestionProgress| match progress.status {
        IngestionStatus::Segmenting => {
            spinner.set_message("Segmenting transcript...");
        }
        IngestionStatus::Embedding => {
            let pb = bar.get_or_insert_with(|| {
                spinner.finish_and_clear();
                Output::progress_bar(progress.total_chunks as u64, "Embedding chunks")
            });
            pb.set_position(progress.processed_chunks as u64);
        }
        IngestionStatus::Upserting => {
            if let Some(pb) = &bar {
                pb.finish_and_clear();
            }
            Output::info("Writing vectors to the index...");
        }
        IngestionStatus::Completed | IngestionStatus::Failed => {}
    };

    match orchestrator.start_ingestion(input, &mut on_progress).await {
        Ok(report) => {
            spinner.finish_and_clear();
            Output::success(&format!(
                "Indexed {} chunks for {} ({} upsert batches)",
                report.chunks_indexed, report.video_id, report.upsert_batches
            ));
            Ok(())
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Ingestion failed: {}", e));
            Err(e.into())
        }
    }
}
