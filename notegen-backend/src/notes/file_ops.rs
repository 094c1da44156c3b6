//! File operations for notes system
//!
//! Handles slugification of subjects and tags, and crash-safe note writes.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Collapse everything outside `[a-z0-9]` into single hyphens, trimmed at both ends.
fn slug_parts(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<&str>>()
        .join("-")
}

/// Slugify a subject for use as a filename (e.g. "Ancient Bridges" -> "ancient-bridges").
/// Never empty: input without any ASCII alphanumerics becomes "note".
pub fn slug_file(subject: &str) -> String {
    let slug = slug_parts(subject);
    if slug.is_empty() {
        "note".to_string()
    } else {
        slug
    }
}

/// Slugify a tag, spelling out `&` and `+` (e.g. "Arts & Design" -> "arts-and-design").
/// May be empty.
pub fn slug_tag(tag: &str) -> String {
    slug_parts(&tag.replace('&', " and ").replace('+', " and "))
}

/// First ASCII-alphanumeric word of `text`, lowercased; "topic" if there is none.
pub fn first_token_word(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .find(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "topic".to_string())
}

/// Final location of the note for `subject` inside `notes_dir`
pub fn note_path(notes_dir: &Path, subject: &str) -> PathBuf {
    notes_dir.join(format!("{}.md", slug_file(subject)))
}

/// Write a note for `subject` into `notes_dir`, returning the final path
pub fn write_note(notes_dir: &Path, subject: &str, content: &str) -> io::Result<PathBuf> {
    let path = note_path(notes_dir, subject);
    atomic_write(&path, content)?;
    Ok(path)
}

/// Write `content` to a temp file next to `path`, then rename it over `path`.
///
/// The temp file lives in the same directory so the rename never crosses
/// filesystems. If writing fails the temp file is dropped (and removed) and
/// `path` is left untouched.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    atomic_write_with(path, |file| file.write_all(content.as_bytes()))
}

fn atomic_write_with<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut fs::File) -> io::Result<()>,
{
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let prefix = format!(
        "{}.",
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    );
    let mut tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .tempfile_in(parent)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
