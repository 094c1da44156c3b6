//! Prompt templates for the two inference calls.

use super::frontmatter::json_list;
use super::taxonomy::TOPIC_LIST;

/// Prompt for the metadata call. The model must answer with a strict JSON
/// object holding `title`, `topic`, `topics` and `tags`.
pub fn build_meta_prompt(subject: &str) -> String {
    format!(
        r#"You will ONLY return strict JSON. No markdown or extra text.

Subject: {subject}

TASK:
1) "title": a concise title.
2) "topic": a ONE-WORD topic (no spaces).
3) "topics": pick 2–4 distinct items from TOPICS (exact string match; avoid near-duplicates).
4) "tags": 1–3 short extra tags (1–2 words each), semantically distinct from "topics".

TOPICS = {topics}

OUTPUT:
{{
  "title": "Concise Title",
  "topic": "OneWordTopic",
  "topics": ["Item from TOPICS", "..."],
  "tags": ["short-tag-1", "short-tag-2"]
}}"#,
        subject = subject,
        topics = json_list(&TOPIC_LIST),
    )
}

/// Prompt for the body call, carrying the resolved metadata as context
pub fn build_body_prompt(
    subject: &str,
    topic_word: &str,
    topics: &[String],
    tags: &[String],
) -> String {
    let mut prompt = String::from("Return ONLY the body text (no JSON/YAML or code fences).\n\n");
    prompt.push_str(&format!("Subject: {}\n", subject));
    prompt.push_str(&format!("One-word topic: {}\n", topic_word));
    prompt.push_str(&format!("Chosen broad topics: {}\n", json_list(topics)));
    prompt.push_str(&format!("Extra tags: {}\n\n", json_list(tags)));
    prompt.push_str("Write ~900–1300 words of cohesive, detailed prose:\n");
    prompt.push_str("- Short paragraphs; light bullets only when helpful.\n");
    prompt.push_str("- Include concrete facts, dates, definitions, trade-offs, practical implications.\n");
    prompt.push_str("- Optional parenthetical source mentions (author/site + year). No URLs.");
    prompt
}
