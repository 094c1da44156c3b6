//! `notegen` CLI: generate one note from a subject, or a batch from a file.
//!
//!   notegen "Ancient Bridges"
//!   notegen --file subjects.csv      # one subject per line; CSV uses the first column
//!
//! Settings come from the config file and environment (`NoteGenConfig::from_env`);
//! flags given on the command line override both.

use clap::{CommandFactory, Parser};
use dotenv::dotenv;
use std::path::PathBuf;
use std::process::ExitCode;

use notegen_backend::{NoteGenConfig, NotePipeline};

#[derive(Parser, Debug)]
#[command(name = "notegen", version, about = "Two-call Obsidian note generator")]
struct Cli {
    /// Subject words, joined with spaces
    subject: Vec<String>,

    /// CSV/text file of subjects (first column used)
    #[arg(long, short = 'f')]
    file: Option<PathBuf>,

    /// Inference endpoint URL
    #[arg(long)]
    api_url: Option<String>,

    /// Directory notes are written to
    #[arg(long)]
    notes_dir: Option<String>,

    /// Seconds between the metadata call and the body call
    #[arg(long)]
    delay_meta: Option<u64>,

    /// Seconds between subjects in a batch
    #[arg(long)]
    delay_rows: Option<u64>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Keep going after a subject fails in batch mode
    #[arg(long)]
    continue_on_error: bool,

    /// Persist the effective settings to the config file
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    fn apply(&self, mut config: NoteGenConfig) -> NoteGenConfig {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(dir) = &self.notes_dir {
            config.notes_dir = dir.clone();
        }
        if let Some(secs) = self.delay_meta {
            config.delay_meta_content_secs = secs;
        }
        if let Some(secs) = self.delay_rows {
            config.delay_between_rows_secs = secs;
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = secs;
        }
        if self.continue_on_error {
            config.continue_on_error = true;
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.apply(NoteGenConfig::from_env());

    if cli.save_config {
        if let Err(e) = config.save() {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    }

    let pipeline = match NotePipeline::from_config(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Some(file) = &cli.file {
        let report = match pipeline.process_batch_file(file).await {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(1);
            }
        };
        for path in &report.created {
            println!("Created → {}", path.display());
        }
        for failure in &report.failures {
            eprintln!("Failed '{}': {}", failure.subject, failure.error);
        }
        return if report.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        };
    }

    let subject = cli.subject.join(" ");
    if subject.trim().is_empty() {
        let _ = Cli::command().print_help();
        return ExitCode::from(2);
    }

    match pipeline.process_subject(&subject).await {
        Ok(Some(path)) => println!("Created → {}", path.display()),
        Ok(None) => println!("No output"),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from([
            "notegen",
            "--api-url",
            "http://localhost:1/infer",
            "--delay-meta",
            "0",
            "--continue-on-error",
            "Ancient",
            "Bridges",
        ]);
        assert_eq!(cli.subject, vec!["Ancient", "Bridges"]);

        let config = cli.apply(NoteGenConfig::default());
        assert_eq!(config.api_url, "http://localhost:1/infer");
        assert_eq!(config.delay_meta_content_secs, 0);
        assert!(config.continue_on_error);
    }

    #[test]
    fn test_unset_flags_keep_config_values() {
        let base = NoteGenConfig::default().apply_overrides(|key| match key {
            "DELAY_BETWEEN_CALLS_SECONDS" => Some("7".to_string()),
            "REQUEST_TIMEOUT_SECONDS" => Some("soon".to_string()),
            _ => None,
        });
        let cli = Cli::parse_from(["notegen", "Ancient Bridges"]);
        assert!(cli.delay_meta.is_none() && cli.timeout.is_none());

        let config = cli.apply(base);
        assert_eq!(config.delay_meta_content_secs, 7);
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
