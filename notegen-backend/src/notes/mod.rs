//! Notes system: Obsidian-compatible markdown notes generated from a subject
//!
//! Produces markdown files with YAML frontmatter (title, created, topic,
//! topics, tags) followed by model-written body prose.

pub mod file_ops;
pub mod frontmatter;
pub mod metadata;
pub mod prompts;
pub mod taxonomy;
