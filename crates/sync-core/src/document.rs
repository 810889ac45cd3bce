//! Sectioned sync document parsing and rendering.
//!
//! The document is a flat markdown file with one section per issue:
//!
//! ```text
//! # [ENG-123] Fix the widget
//! > Created: 2024-01-15
//! > Completed: 2024-01-20
//!
//! freeform notes for this issue
//! ```
//!
//! Parsing goes through a line classifier rather than regexes, which
//! keeps the section accumulator explicit and means keys never need
//! escaping when matched. Lines that fail to classify as a heading or
//! metadata are plain body text, never an error.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::issue::Issue;

const CREATED_PREFIX: &str = "> Created:";
const COMPLETED_PREFIX: &str = "> Completed:";

/// One parsed section of the sync document.
///
/// Sections are an in-memory view over the document text for a single
/// parse/format cycle; nothing persists them independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Issue identifier taken verbatim from the bracketed part of the
    /// heading. Never empty.
    pub key: String,
    /// Heading text after the closing bracket.
    pub title: String,
    /// Trimmed text between this heading and the next, with metadata
    /// lines excluded. Never contains the heading line itself.
    pub body: String,
}

/// A classified document line.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Heading { key: &'a str, title: &'a str },
    Metadata,
    Plain(&'a str),
}

/// Classify one line: `#`, whitespace, `[key]`, whitespace, title is a
/// heading; a `> Created:`/`> Completed:` prefix is metadata; anything
/// else is plain text.
fn classify_line(line: &str) -> Line<'_> {
    if line.starts_with(CREATED_PREFIX) || line.starts_with(COMPLETED_PREFIX) {
        return Line::Metadata;
    }

    let Some(rest) = line.strip_prefix('#') else {
        return Line::Plain(line);
    };

    let after_hash = rest.trim_start();
    if after_hash.len() == rest.len() {
        // "#[KEY]" without a space is not a recognized heading.
        return Line::Plain(line);
    }

    let Some(bracketed) = after_hash.strip_prefix('[') else {
        return Line::Plain(line);
    };
    let Some(close) = bracketed.find(']') else {
        return Line::Plain(line);
    };

    let key = &bracketed[..close];
    if key.is_empty() {
        return Line::Plain(line);
    }

    let after_bracket = &bracketed[close + 1..];
    let title = after_bracket.trim_start();
    if title.len() == after_bracket.len() || title.is_empty() {
        return Line::Plain(line);
    }

    Line::Heading { key, title }
}

/// Split a document into sections.
///
/// Lines before the first heading belong to no section and are not
/// returned; callers that need them still hold the original text.
pub fn parse(content: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<(String, String)> = None;
    let mut body_lines: Vec<&str> = Vec::new();

    for line in content.split('\n') {
        match classify_line(line) {
            Line::Heading { key, title } => {
                if let Some((key, title)) = current.take() {
                    sections.push(Section {
                        key,
                        title,
                        body: body_lines.join("\n").trim().to_string(),
                    });
                }
                current = Some((key.to_string(), title.to_string()));
                body_lines.clear();
            }
            Line::Metadata => {
                // Regenerated by update_metadata, never carried in bodies.
            }
            Line::Plain(text) => {
                if current.is_some() {
                    body_lines.push(text);
                }
            }
        }
    }

    if let Some((key, title)) = current {
        sections.push(Section {
            key,
            title,
            body: body_lines.join("\n").trim().to_string(),
        });
    }

    sections
}

/// All issue keys appearing in heading lines. Duplicate headings
/// collapse; the first occurrence is authoritative.
pub fn extract_keys(content: &str) -> HashSet<String> {
    content
        .split('\n')
        .filter_map(|line| match classify_line(line) {
            Line::Heading { key, .. } => Some(key.to_string()),
            _ => None,
        })
        .collect()
}

fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

/// Metadata lines for an issue, without a trailing newline.
fn format_metadata(issue: &Issue) -> String {
    let mut meta = format!("{CREATED_PREFIX} {}", format_date(&issue.created_at));
    if let Some(completed) = &issue.completed_at {
        meta.push('\n');
        meta.push_str(&format!("{COMPLETED_PREFIX} {}", format_date(completed)));
    }
    meta
}

/// Render a fresh section for an issue: heading, metadata, and a blank
/// line for notes to be written under.
pub fn format_new_section(issue: &Issue) -> String {
    format!(
        "# [{}] {}\n{}\n\n",
        issue.identifier,
        issue.title,
        format_metadata(issue)
    )
}

/// Prepend one new section per issue, in the order supplied (callers
/// pass newest first). Returns the text unchanged for an empty list.
pub fn prepend_sections(content: &str, issues: &[Issue]) -> String {
    if issues.is_empty() {
        return content.to_string();
    }

    let mut out = String::new();
    for issue in issues {
        out.push_str(&format_new_section(issue));
    }
    out.push_str(content);
    out
}

/// Rewrite the metadata run under each matching heading to reflect the
/// issue's current timestamps.
///
/// The run is the contiguous stretch of metadata lines immediately
/// after the heading, possibly empty. Body lines after the run are
/// left untouched, and headings are matched by exact key equality, so
/// "ENG-1" never rewrites "ENG-12".
pub fn update_metadata(content: &str, issues: &[Issue]) -> String {
    if issues.is_empty() {
        return content.to_string();
    }

    let lines: Vec<&str> = content.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        out.push(line.to_string());
        i += 1;

        let Line::Heading { key, .. } = classify_line(line) else {
            continue;
        };
        let Some(issue) = issues.iter().find(|issue| issue.identifier == key) else {
            continue;
        };

        // Drop the existing run, then splice in the regenerated lines.
        while i < lines.len() && matches!(classify_line(lines[i]), Line::Metadata) {
            i += 1;
        }
        for meta_line in format_metadata(issue).split('\n') {
            out.push(meta_line.to_string());
        }
    }

    out.join("\n")
}
