//! Generate YAML frontmatter for notes.
//!
//! Hand-rolled YAML (no serde_yaml). Only the fixed header fields below are
//! emitted; the title is the only value that gets quote-escaped.

use chrono::{DateTime, Local};

use super::file_ops::first_token_word;

/// `created:` timestamp format: local time with numeric UTC offset
pub const CREATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Current local time formatted for the `created:` field
pub fn created_now() -> String {
    let now: DateTime<Local> = Local::now();
    now.format(CREATED_FORMAT).to_string()
}

/// Escape double quotes for a double-quoted YAML scalar
pub fn escape_yaml(s: &str) -> String {
    s.replace('"', "\\\"")
}

/// Render strings as a JSON array with `", "` separators, e.g. `["A", "B"]`
pub fn json_list<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|item| serde_json::Value::String(item.as_ref().to_string()).to_string())
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Generate the frontmatter block (without trailing newline)
pub fn generate_frontmatter(
    subject: &str,
    title: &str,
    topic_word: &str,
    topics: &[String],
    tag_slugs: &[String],
    created: &str,
) -> String {
    let title = if title.is_empty() { subject } else { title };
    let topic_word = if topic_word.is_empty() {
        first_token_word(subject)
    } else {
        topic_word.to_string()
    };

    let mut lines = Vec::new();
    lines.push("---".to_string());
    lines.push(format!("title: \"{}\"", escape_yaml(title)));
    lines.push(format!("created: \"{}\"", created));
    lines.push(format!("topic: \"{}\"", topic_word));
    lines.push(format!("topics: {}", json_list(topics)));
    lines.push(format!("tags: [{}]", tag_slugs.join(", ")));
    lines.push("---".to_string());

    lines.join("\n")
}

/// Render a full note: frontmatter, blank line, body with exactly one trailing newline
pub fn render_note(
    subject: &str,
    title: &str,
    topic_word: &str,
    topics: &[String],
    tag_slugs: &[String],
    body: &str,
    created: &str,
) -> String {
    let front = generate_frontmatter(subject, title, topic_word, topics, tag_slugs, created);
    format!("{}\n\n{}\n", front, body.trim_end())
}
