//! Batch input: one subject per line, or CSV rows whose first column is the subject.
//!
//! Records are split with the usual CSV quoting rules: a quoted field may hold
//! commas and newlines, `""` inside quotes is a literal quote, and text after a
//! closing quote is kept as part of the field.

/// Subjects from a line-oriented or CSV source, in order. Blank rows and rows
/// whose subject starts with `#` are skipped.
pub fn parse_subjects(input: &str) -> Vec<String> {
    read_records(input)
        .into_iter()
        .filter_map(|record| record.into_iter().next())
        .map(|subject| subject.trim().to_string())
        .filter(|subject| !subject.is_empty() && !subject.starts_with('#'))
        .collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FieldState {
    Start,
    Unquoted,
    Quoted,
    /// Closing quote seen; anything up to the next separator is appended
    AfterQuote,
}

/// Split CSV text into records of fields. Empty lines produce no record.
fn read_records(input: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut state = FieldState::Start;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if state == FieldState::Quoted {
            if c != '"' {
                field.push(c);
            } else if chars.peek() == Some(&'"') {
                field.push('"');
                chars.next();
            } else {
                state = FieldState::AfterQuote;
            }
            continue;
        }

        match c {
            ',' => {
                record.push(std::mem::take(&mut field));
                state = FieldState::Start;
            }
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                finish_record(&mut records, &mut record, &mut field, state);
                state = FieldState::Start;
            }
            '"' if state == FieldState::Start => state = FieldState::Quoted,
            _ => {
                field.push(c);
                state = FieldState::Unquoted;
            }
        }
    }

    finish_record(&mut records, &mut record, &mut field, state);
    records
}

fn finish_record(
    records: &mut Vec<Vec<String>>,
    record: &mut Vec<String>,
    field: &mut String,
    state: FieldState,
) {
    if state == FieldState::Start && record.is_empty() && field.is_empty() {
        return;
    }
    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
}
