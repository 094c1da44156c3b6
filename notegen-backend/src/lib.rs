//! notegen turns a short subject into an Obsidian-compatible markdown note.
//!
//! Two sequential calls go to a text-generation endpoint: the first extracts
//! metadata (title, one-word topic, taxonomy topics, extra tags), the second
//! writes the body prose. The result is rendered with YAML frontmatter and
//! written atomically into the notes directory.

pub mod batch;
pub mod config;
pub mod delay;
pub mod error;
pub mod inference_client;
pub mod notes;
pub mod pipeline;

pub use config::NoteGenConfig;
pub use error::{InferenceError, NoteGenError};
pub use pipeline::{BatchFailure, BatchReport, NotePipeline};
