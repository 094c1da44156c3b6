//! Metadata response parsing and the fallback chain applied after it.
//!
//! Decoding never fails: malformed or partial model output degrades to empty
//! fields, and `resolve_metadata` fills the gaps from the subject.

use serde_json::{Map, Value};
use std::collections::HashSet;

use super::file_ops::{first_token_word, slug_tag};
use super::taxonomy::{classify_fallback, is_canonical};

/// Maximum number of taxonomy topics kept per note
pub const MAX_TOPICS: usize = 4;

/// Which fields of the metadata response were present with the expected type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldValidity {
    pub title: bool,
    pub topic: bool,
    pub topics: bool,
    pub tags: bool,
}

impl FieldValidity {
    /// True when no field could be read at all (e.g. the response was not JSON)
    pub fn is_unusable(&self) -> bool {
        !(self.title || self.topic || self.topics || self.tags)
    }
}

/// Best-effort decode of the metadata response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    pub title: String,
    /// One-word topic as returned by the model (JSON key `topic`)
    pub topic: String,
    pub topics: Vec<String>,
    pub tags: Vec<String>,
    pub validity: FieldValidity,
}

/// Metadata after every fallback rule has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMetadata {
    pub title: String,
    pub topic: String,
    /// 1..=4 canonical taxonomy labels
    pub topics: Vec<String>,
    /// Extra tags, passed through untouched
    pub tags: Vec<String>,
}

/// Decode the metadata response. Invalid JSON, a non-object value, or
/// absent/wrong-typed fields all yield empty values for the affected fields.
pub fn parse_meta(raw: &str) -> MetadataRecord {
    let obj = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(obj)) => obj,
        _ => return MetadataRecord::default(),
    };

    let (title, title_ok) = string_field(&obj, "title");
    let (topic, topic_ok) = string_field(&obj, "topic");
    let (topics, topics_ok) = string_list_field(&obj, "topics");
    let (tags, tags_ok) = string_list_field(&obj, "tags");

    MetadataRecord {
        title,
        topic,
        topics,
        tags,
        validity: FieldValidity {
            title: title_ok,
            topic: topic_ok,
            topics: topics_ok,
            tags: tags_ok,
        },
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> (String, bool) {
    match obj.get(key) {
        Some(Value::String(s)) => (s.clone(), true),
        _ => (String::new(), false),
    }
}

/// Non-string array items are dropped
fn string_list_field(obj: &Map<String, Value>, key: &str) -> (Vec<String>, bool) {
    match obj.get(key) {
        Some(Value::Array(items)) => (
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            true,
        ),
        _ => (Vec::new(), false),
    }
}

/// Apply the fallback chain: title, then one-word topic, then topics.
pub fn resolve_metadata(subject: &str, record: MetadataRecord) -> ResolvedMetadata {
    ResolvedMetadata {
        title: resolve_title(subject, record.title),
        topic: resolve_topic_word(subject, record.topic),
        topics: resolve_topics(subject, &record.topics),
        tags: record.tags,
    }
}

/// Empty title -> subject verbatim
pub fn resolve_title(subject: &str, title: String) -> String {
    if title.is_empty() { subject.to_string() } else { title }
}

/// Empty topic or one containing a space -> first word of the subject.
/// Only a literal space disqualifies; other punctuation is accepted.
pub fn resolve_topic_word(subject: &str, topic: String) -> String {
    if topic.is_empty() || topic.contains(' ') {
        first_token_word(subject)
    } else {
        topic
    }
}

/// Sanitized topics, or a single keyword-classified label when none survive
pub fn resolve_topics(subject: &str, topics: &[String]) -> Vec<String> {
    let sanitized = sanitize_topics(topics);
    if sanitized.is_empty() {
        vec![classify_fallback(subject).to_string()]
    } else {
        sanitized
    }
}

/// Keep exact taxonomy labels only, first occurrence wins, at most `MAX_TOPICS`
pub fn sanitize_topics(topics: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for topic in topics {
        if out.len() >= MAX_TOPICS {
            break;
        }
        if is_canonical(topic) && seen.insert(topic.as_str()) {
            out.push(topic.clone());
        }
    }
    out
}

/// Tag slugs from topics then extra tags, deduplicated in order. Never empty.
pub fn build_tag_slugs(topics: &[String], extra_tags: &[String], topic_word: &str) -> Vec<String> {
    let mut slugs = Vec::new();
    let mut seen = HashSet::new();
    for value in topics.iter().chain(extra_tags) {
        let slug = slug_tag(value);
        if !slug.is_empty() && seen.insert(slug.clone()) {
            slugs.push(slug);
        }
    }

    if slugs.is_empty() {
        let word = if topic_word.is_empty() { "topic" } else { topic_word };
        slugs.push(slug_tag(word));
    }
    slugs
}
