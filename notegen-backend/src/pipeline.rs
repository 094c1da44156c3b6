//! Two-call note pipeline: metadata call, pause, body call, render, persist.
//!
//! Calls are strictly sequential; batches process one subject at a time with
//! a pause between subjects (never before the first).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::batch::parse_subjects;
use crate::config::{Delays, NoteGenConfig};
use crate::delay::{Delay, TokioDelay};
use crate::error::NoteGenError;
use crate::inference_client::{HttpInferenceClient, InferenceClient};
use crate::notes::{file_ops, frontmatter, metadata, prompts};

/// Substituted when the body call returns nothing
pub const EMPTY_BODY_PLACEHOLDER: &str = "(Model returned no body text.)";

/// A subject that could not be turned into a note
#[derive(Debug)]
pub struct BatchFailure {
    pub subject: String,
    pub error: NoteGenError,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub created: Vec<PathBuf>,
    pub failures: Vec<BatchFailure>,
    /// True when a failure stopped the batch before every subject was tried
    pub aborted: bool,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct NotePipeline {
    client: Arc<dyn InferenceClient>,
    delay: Arc<dyn Delay>,
    notes_dir: PathBuf,
    delays: Delays,
    continue_on_error: bool,
}

impl NotePipeline {
    pub fn new(
        config: &NoteGenConfig,
        client: Arc<dyn InferenceClient>,
        delay: Arc<dyn Delay>,
    ) -> Self {
        Self {
            client,
            delay,
            notes_dir: config.notes_path(),
            delays: config.delays(),
            continue_on_error: config.continue_on_error,
        }
    }

    /// Pipeline talking HTTP to `config.api_url` and sleeping on the tokio timer
    pub fn from_config(config: &NoteGenConfig) -> Result<Self, NoteGenError> {
        let client = HttpInferenceClient::from_config(config)
            .map_err(|e| NoteGenError::Config(e.to_string()))?;
        log::info!(
            "Inference endpoint {} (timeout {}s), notes dir {:?}",
            client.endpoint(),
            config.request_timeout_secs,
            config.notes_path()
        );
        Ok(Self::new(config, Arc::new(client), Arc::new(TokioDelay)))
    }

    /// Generate and write the note for one subject.
    ///
    /// Returns `Ok(None)` for a blank subject. A network failure in either
    /// call aborts the subject before anything is written.
    pub async fn process_subject(&self, subject: &str) -> Result<Option<PathBuf>, NoteGenError> {
        let subject = subject.trim();
        if subject.is_empty() {
            log::debug!("Blank subject, nothing to do");
            return Ok(None);
        }

        // Metadata call
        let meta_raw = self.infer(subject, &prompts::build_meta_prompt(subject)).await?;
        let record = metadata::parse_meta(&meta_raw);
        if record.validity.is_unusable() {
            log::warn!(
                "Metadata response for '{}' was unusable ({} chars), falling back to subject-derived values",
                subject,
                meta_raw.len()
            );
        }
        let meta = metadata::resolve_metadata(subject, record);

        self.delay.wait(self.delays.meta_to_content_secs).await;

        // Body call
        let body_prompt =
            prompts::build_body_prompt(subject, &meta.topic, &meta.topics, &meta.tags);
        let mut body = self.infer(subject, &body_prompt).await?;
        if body.is_empty() {
            log::warn!("Empty body for '{}', using placeholder", subject);
            body = EMPTY_BODY_PLACEHOLDER.to_string();
        }

        let tag_slugs = metadata::build_tag_slugs(&meta.topics, &meta.tags, &meta.topic);
        let document = frontmatter::render_note(
            subject,
            &meta.title,
            &meta.topic,
            &meta.topics,
            &tag_slugs,
            &body,
            &frontmatter::created_now(),
        );

        let path = file_ops::write_note(&self.notes_dir, subject, &document).map_err(|source| {
            NoteGenError::Io {
                path: file_ops::note_path(&self.notes_dir, subject),
                source,
            }
        })?;
        log::info!("Created note {:?} for '{}'", path, subject);
        Ok(Some(path))
    }

    /// Process subjects in order, pausing between them.
    ///
    /// On failure the batch stops unless `continue_on_error` is set; either
    /// way the failure is recorded in the report.
    pub async fn process_batch(&self, subjects: &[String]) -> BatchReport {
        let mut report = BatchReport::default();
        let mut first = true;

        for subject in subjects {
            let subject = subject.trim();
            if subject.is_empty() || subject.starts_with('#') {
                continue;
            }
            if !first {
                self.delay.wait(self.delays.between_rows_secs).await;
            }
            first = false;

            match self.process_subject(subject).await {
                Ok(Some(path)) => report.created.push(path),
                Ok(None) => {}
                Err(error) => {
                    log::error!("Failed to generate note for '{}': {}", subject, error);
                    report.failures.push(BatchFailure {
                        subject: subject.to_string(),
                        error,
                    });
                    if !self.continue_on_error {
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        log::info!(
            "Batch finished: {} created, {} failed{}",
            report.created.len(),
            report.failures.len(),
            if report.aborted { " (aborted)" } else { "" }
        );
        report
    }

    /// Process subjects from text in the batch input format
    pub async fn process_batch_text(&self, input: &str) -> BatchReport {
        let subjects = parse_subjects(input);
        log::info!("Batch of {} subjects", subjects.len());
        self.process_batch(&subjects).await
    }

    /// Process subjects read from a line/CSV file
    pub async fn process_batch_file(&self, path: &Path) -> Result<BatchReport, NoteGenError> {
        let input = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| NoteGenError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(self.process_batch_text(&input).await)
    }

    async fn infer(&self, subject: &str, prompt: &str) -> Result<String, NoteGenError> {
        let output = self
            .client
            .infer(prompt)
            .await
            .map_err(|source| NoteGenError::Network {
                subject: subject.to_string(),
                source,
            })?;
        log::debug!("Inference for '{}' returned {} chars", subject, output.len());
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InferenceError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Replays canned responses in order and records every prompt
    #[derive(Default)]
    struct ScriptedClient {
        responses: Mutex<VecDeque<Result<String, InferenceError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<String, InferenceError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InferenceClient for ScriptedClient {
        async fn infer(&self, prompt: &str) -> Result<String, InferenceError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(InferenceError::Transport("script exhausted".to_string())))
        }
    }

    #[derive(Default)]
    struct RecordingDelay {
        waits: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl Delay for RecordingDelay {
        async fn wait(&self, secs: u64) {
            self.waits.lock().unwrap().push(secs);
        }
    }

    const BRIDGES_META: &str = r#"{"title":"Ancient Bridges","topic":"bridges","topics":["History & Geography","Engineering & Technology"],"tags":["architecture","stone"]}"#;

    fn config(notes_dir: &Path, continue_on_error: bool) -> NoteGenConfig {
        NoteGenConfig {
            notes_dir: notes_dir.to_string_lossy().to_string(),
            delay_meta_content_secs: 30,
            delay_between_rows_secs: 120,
            continue_on_error,
            ..NoteGenConfig::default()
        }
    }

    fn ok(s: &str) -> Result<String, InferenceError> {
        Ok(s.to_string())
    }

    fn network_down() -> Result<String, InferenceError> {
        Err(InferenceError::Transport("connection refused".to_string()))
    }

    #[tokio::test]
    async fn test_ancient_bridges_note() {
        let dir = tempdir().unwrap();
        let body = format!("Body text {}", "x".repeat(1200));
        let client = ScriptedClient::new(vec![ok(BRIDGES_META), ok(&body)]);
        let delay = Arc::new(RecordingDelay::default());
        let pipeline = NotePipeline::new(&config(dir.path(), false), client.clone(), delay.clone());

        let path = pipeline.process_subject("  Ancient Bridges ").await.unwrap().unwrap();
        assert_eq!(path, dir.path().join("ancient-bridges.md"));

        let data = std::fs::read_to_string(&path).unwrap();
        assert!(data.starts_with("---\ntitle: \"Ancient Bridges\"\ncreated: \""));
        assert!(data.contains("\ntopic: \"bridges\"\n"));
        assert!(data.contains(
            "\ntopics: [\"History & Geography\", \"Engineering & Technology\"]\n"
        ));
        assert!(data.contains(
            "\ntags: [history-and-geography, engineering-and-technology, architecture, stone]\n"
        ));
        assert!(data.ends_with(&format!("---\n\n{}\n", body)));

        let prompts = client.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Subject: Ancient Bridges\n"));
        assert!(prompts[1].contains("One-word topic: bridges\n"));
        assert!(prompts[1].contains("Extra tags: [\"architecture\", \"stone\"]"));
        assert_eq!(*delay.waits.lock().unwrap(), vec![30]);
    }

    #[tokio::test]
    async fn test_unparsable_metadata_falls_back_to_subject() {
        let dir = tempdir().unwrap();
        let client =
            ScriptedClient::new(vec![ok("I cannot produce JSON today."), ok("Some prose.")]);
        let pipeline = NotePipeline::new(
            &config(dir.path(), false),
            client.clone(),
            Arc::new(RecordingDelay::default()),
        );

        let path = pipeline.process_subject("Quantum Computing Basics").await.unwrap().unwrap();
        let data = std::fs::read_to_string(&path).unwrap();
        assert!(data.contains("title: \"Quantum Computing Basics\"\n"));
        assert!(data.contains("topic: \"quantum\"\n"));
        assert!(data.contains("topics: [\"Computers & Information\"]\n"));
        assert!(data.contains("tags: [computers-and-information]\n"));
        assert!(client.prompts()[1].contains("Chosen broad topics: [\"Computers & Information\"]"));
    }

    #[tokio::test]
    async fn test_empty_body_gets_placeholder() {
        let dir = tempdir().unwrap();
        let client = ScriptedClient::new(vec![ok(BRIDGES_META), ok("")]);
        let pipeline = NotePipeline::new(
            &config(dir.path(), false),
            client,
            Arc::new(RecordingDelay::default()),
        );

        let path = pipeline.process_subject("Ancient Bridges").await.unwrap().unwrap();
        let data = std::fs::read_to_string(path).unwrap();
        assert!(data.ends_with("---\n\n(Model returned no body text.)\n"));
    }

    #[tokio::test]
    async fn test_blank_subject_is_a_no_op() {
        let dir = tempdir().unwrap();
        let client = ScriptedClient::new(vec![]);
        let delay = Arc::new(RecordingDelay::default());
        let pipeline = NotePipeline::new(&config(dir.path(), false), client.clone(), delay.clone());

        assert!(pipeline.process_subject("   \t").await.unwrap().is_none());
        assert!(client.prompts().is_empty());
        assert!(delay.waits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_network_error_on_meta_call_aborts_subject() {
        let dir = tempdir().unwrap();
        let client = ScriptedClient::new(vec![network_down()]);
        let delay = Arc::new(RecordingDelay::default());
        let pipeline = NotePipeline::new(&config(dir.path(), false), client.clone(), delay.clone());

        let err = pipeline.process_subject("Ancient Bridges").await.unwrap_err();
        match err {
            NoteGenError::Network { subject, .. } => assert_eq!(subject, "Ancient Bridges"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(client.prompts().len(), 1);
        assert!(delay.waits.lock().unwrap().is_empty());
        assert!(!dir.path().join("ancient-bridges.md").exists());
    }

    #[tokio::test]
    async fn test_network_error_on_body_call_writes_nothing() {
        let dir = tempdir().unwrap();
        let client = ScriptedClient::new(vec![ok(BRIDGES_META), network_down()]);
        let pipeline = NotePipeline::new(
            &config(dir.path(), false),
            client,
            Arc::new(RecordingDelay::default()),
        );

        let err = pipeline.process_subject("Ancient Bridges").await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_batch_pauses_between_subjects_only() {
        let dir = tempdir().unwrap();
        let client = ScriptedClient::new(vec![ok("{}"), ok("one"), ok("{}"), ok("two")]);
        let delay = Arc::new(RecordingDelay::default());
        let pipeline = NotePipeline::new(&config(dir.path(), false), client, delay.clone());

        let report = pipeline
            .process_batch_text("# header\nFirst Subject\n\nSecond Subject,extra\n")
            .await;
        assert!(report.is_success());
        assert!(!report.aborted);
        assert_eq!(
            report.created,
            vec![dir.path().join("first-subject.md"), dir.path().join("second-subject.md")]
        );
        // meta->body for the first, between-rows, meta->body for the second
        assert_eq!(*delay.waits.lock().unwrap(), vec![30, 120, 30]);
    }

    #[tokio::test]
    async fn test_batch_aborts_on_first_failure_by_default() {
        let dir = tempdir().unwrap();
        let client = ScriptedClient::new(vec![network_down(), ok("{}"), ok("body")]);
        let pipeline = NotePipeline::new(
            &config(dir.path(), false),
            client.clone(),
            Arc::new(RecordingDelay::default()),
        );

        let subjects = vec!["Broken".to_string(), "Fine".to_string()];
        let report = pipeline.process_batch(&subjects).await;
        assert!(report.aborted);
        assert!(report.created.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].subject, "Broken");
        assert_eq!(client.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_batch_continues_when_configured() {
        let dir = tempdir().unwrap();
        let client = ScriptedClient::new(vec![network_down(), ok("{}"), ok("body")]);
        let pipeline = NotePipeline::new(
            &config(dir.path(), true),
            client,
            Arc::new(RecordingDelay::default()),
        );

        let subjects = vec!["Broken".to_string(), "Fine".to_string()];
        let report = pipeline.process_batch(&subjects).await;
        assert!(!report.aborted);
        assert!(!report.is_success());
        assert_eq!(report.created, vec![dir.path().join("fine.md")]);
        assert_eq!(report.failures[0].subject, "Broken");
    }

    #[tokio::test]
    async fn test_batch_file_missing_is_io_error() {
        let dir = tempdir().unwrap();
        let pipeline = NotePipeline::new(
            &config(dir.path(), false),
            ScriptedClient::new(vec![]),
            Arc::new(RecordingDelay::default()),
        );

        let err = pipeline
            .process_batch_file(&dir.path().join("missing.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, NoteGenError::Io { .. }));
    }
}
