//! Vidask - Video Question Answering
//!
//! A CLI tool and library for ingesting video transcripts into a vector index
//! and answering natural-language questions about them.
//!
//! # Overview
//!
//! Vidask allows you to:
//! - Fetch a video's transcript and split it into overlapping chunks
//! - Embed the chunks and store them in a remote vector index
//! - Ask questions and get structured, AI-synthesized answers grounded in the
//!   transcript
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `video` - Video reference parsing
//! - `transcript` - Transcript retrieval
//! - `segmenter` - Transcript chunking
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector index abstraction
//! - `ingest` - Ingestion pipeline
//! - `rag` - Retrieval and answer synthesis
//! - `completion` - LLM answer formatting
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use vidask::config::Settings;
//! use vidask::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let mut orchestrator = Orchestrator::new(&settings)?;
//!
//!     let mut on_progress = |_p: vidask::ingest::IngestionProgress| {};
//!     let report = orchestrator
//!         .start_ingestion("dQw4w9WgXcQ", &mut on_progress)
//!         .await?;
//!     println!("Indexed {} chunks", report.chunks_indexed);
//!
//!     let turn = orchestrator
//!         .ask_question("dQw4w9WgXcQ", "What is the video about?")
//!         .await?;
//!     println!("{}", turn.content);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod segmenter;
pub mod transcript;
pub mod vector_store;
pub mod video;

pub use error::{Result, VidaskError};
