//! Fixed topic taxonomy (DDC/BISAC-informed) and a keyword fallback classifier.

/// The 20 canonical topic labels, in display order
pub const TOPIC_LIST: [&str; 20] = [
    "Computers & Information",
    "Philosophy",
    "Psychology & Self-Help",
    "Religion & Spirituality",
    "Social Sciences",
    "Politics & Government",
    "Economics & Business",
    "Education & Teaching",
    "Language & Linguistics",
    "Science (General)",
    "Mathematics",
    "Physics & Astronomy",
    "Chemistry",
    "Biology",
    "Medicine & Health",
    "Engineering & Technology",
    "Arts & Design",
    "Literature & Writing",
    "History & Geography",
    "Travel & Recreation",
];

/// Label used when no keyword rule matches
pub const DEFAULT_TOPIC: &str = "Computers & Information";

/// Priority-ordered (keywords, label) rules; the first rule with any keyword
/// substring in the lowercased subject wins.
const FALLBACK_RULES: &[(&[&str], &str)] = &[
    (&["ai", "llm", "data", "internet", "comput", "info"], "Computers & Information"),
    (&["philosophy", "ethic", "logic", "epistem"], "Philosophy"),
    (&["psychology", "adhd", "mental", "therapy", "self-help"], "Psychology & Self-Help"),
    (&["religion", "spiritual", "theolog", "mytholog"], "Religion & Spirituality"),
    (&["sociolog", "anthropolog", "culture", "gender"], "Social Sciences"),
    (&["politic", "policy", "government", "law", "election"], "Politics & Government"),
    (
        &["business", "startup", "market", "econom", "finance", "invest"],
        "Economics & Business",
    ),
    (&["education", "teaching", "curriculum", "pedagog"], "Education & Teaching"),
    (&["linguist", "grammar", "language", "translate"], "Language & Linguistics"),
    (&["science", "scientific method"], "Science (General)"),
    (&["math", "algebra", "calculus", "statistic"], "Mathematics"),
    (&["physics", "astronomy", "cosmo", "quantum"], "Physics & Astronomy"),
    (&["chemistry", "chemical", "compound", "reagent"], "Chemistry"),
    (&["biology", "genetic", "zoolog", "ecolog", "flora", "fauna"], "Biology"),
    (&["medicine", "health", "clinic", "nutrition", "sleep"], "Medicine & Health"),
    (
        &["engineer", "robotic", "civil", "electrical", "mechanical", "technology"],
        "Engineering & Technology",
    ),
    (&["art", "design", "photo", "architec"], "Arts & Design"),
    (&["literature", "writing", "poetry", "novel", "criticism"], "Literature & Writing"),
    (&["history", "geograph", "cartograph", "histor"], "History & Geography"),
    (&["travel", "touris", "hobby", "sport", "recreat"], "Travel & Recreation"),
];

/// Exact-match membership test against the taxonomy
pub fn is_canonical(label: &str) -> bool {
    TOPIC_LIST.contains(&label)
}

/// Pick a taxonomy label for `subject` from keyword substrings alone
pub fn classify_fallback(subject: &str) -> &'static str {
    let lowered = subject.to_lowercase();
    FALLBACK_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, label)| *label)
        .unwrap_or(DEFAULT_TOPIC)
}
