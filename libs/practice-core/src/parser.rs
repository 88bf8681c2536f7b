//! Parser for starter problem lists.
//!
//! # Format
//! ```text
//! Arrays & Hashing
//! Contains Duplicate
//! Valid Anagram
//!
//! Two Pointers
//! Valid Palindrome
//! ```
//!
//! Known section headings (or any line starting with `#`) open a section;
//! every other non-blank line is a problem title belonging to the most recent
//! section. Titles repeated later in the list are ignored.

use crate::error::ParseError;
use std::collections::HashSet;

/// Longest title accepted from a list.
pub const MAX_TITLE_LEN: usize = 200;

/// Section headings of the bundled starter list.
pub const SECTION_HEADINGS: &[&str] = &[
    "Arrays & Hashing",
    "Two Pointers",
    "Sliding Window",
    "Stack",
    "Binary Search",
    "Linked List",
    "Trees",
    "Tries",
    "Heap / Priority Queue",
    "Backtracking",
    "Graphs",
    "Advanced Graphs",
    "Dynamic Programming I (1D DP)",
    "Dynamic Programming II (2D DP)",
    "Greedy",
    "Intervals",
    "Math & Geometry",
    "Bit Manipulation",
    "Advanced Topics",
];

/// A problem title read from a starter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedProblem {
    pub title: String,
    pub section: Option<String>,
    pub line_number: usize,
}

impl SeedProblem {
    /// Tag derived from the section heading, if any.
    pub fn tag(&self) -> Option<String> {
        self.section.as_deref().map(section_tag).filter(|t| !t.is_empty())
    }
}

/// Parse a starter list into titled problems.
pub fn parse_problem_list(content: &str) -> Result<Vec<SeedProblem>, ParseError> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();
    let mut section: Option<String> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        match parse_line(line) {
            LineType::Empty => {}
            LineType::Heading(name) => section = Some(name.to_string()),
            LineType::Title(title) => {
                let len = title.chars().count();
                if len > MAX_TITLE_LEN {
                    return Err(ParseError::TitleTooLong { line: line_num, len });
                }
                if seen.insert(title.to_string()) {
                    problems.push(SeedProblem {
                        title: title.to_string(),
                        section: section.clone(),
                        line_number: line_num,
                    });
                }
            }
        }
    }

    if problems.is_empty() {
        return Err(ParseError::EmptyList);
    }
    Ok(problems)
}

/// Lower-kebab tag for a section heading: `"Heap / Priority Queue"` → `"heap-priority-queue"`.
pub fn section_tag(section: &str) -> String {
    let mut tag = String::with_capacity(section.len());
    for word in section
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if !tag.is_empty() {
            tag.push('-');
        }
        tag.push_str(&word.to_lowercase());
    }
    tag
}

enum LineType<'a> {
    Heading(&'a str),
    Title(&'a str),
    Empty,
}

fn parse_line(line: &str) -> LineType<'_> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        LineType::Empty
    } else if let Some(rest) = trimmed.strip_prefix('#') {
        LineType::Heading(rest.trim_start_matches('#').trim())
    } else if SECTION_HEADINGS.contains(&trimmed) {
        LineType::Heading(trimmed)
    } else {
        LineType::Title(trimmed)
    }
}
