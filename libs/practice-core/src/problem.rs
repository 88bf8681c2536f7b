//! Problem catalog payloads and their normalization rules.

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::error::{Result, ValidationError};
use crate::types::Difficulty;

/// Platform assumed when a new problem does not name one.
pub const DEFAULT_PLATFORM: &str = "leetcode";

/// Editable fields of a problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemDraft {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default = "default_platform")]
    pub platform: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub algorithm_steps: Option<String>,
    #[serde(default)]
    pub time_complexity: Option<String>,
    #[serde(default)]
    pub space_complexity: Option<String>,
    #[serde(default)]
    pub code_snippet: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

fn default_platform() -> Option<String> {
    Some(DEFAULT_PLATFORM.to_string())
}

impl ProblemDraft {
    /// Draft with only a title, as produced by catalog seeding.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            platform: default_platform(),
            ..Default::default()
        }
    }

    /// Validate and canonicalize the draft.
    pub fn normalize(mut self) -> Result<Self> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        self.title = title.to_string();

        self.url = blank_to_none(self.url);
        if let Some(url) = &self.url {
            validate_url(url)?;
        }
        self.platform = blank_to_none(self.platform);
        self.tags = normalize_tags(self.tags);
        Ok(self)
    }
}

/// Partial update of a problem.
///
/// A field missing from the JSON body is left alone; an explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProblemPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub difficulty: Option<Option<Difficulty>>,
    #[serde(default, deserialize_with = "present")]
    pub platform: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub algorithm_steps: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub time_complexity: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub space_complexity: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub code_snippet: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub tags: Option<Option<Vec<String>>>,
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ProblemPatch {
    /// Apply the patch on top of `current` and normalize the result.
    pub fn apply(self, mut current: ProblemDraft) -> Result<ProblemDraft> {
        if let Some(title) = self.title {
            current.title = title;
        }
        if let Some(url) = self.url {
            current.url = url;
        }
        if let Some(difficulty) = self.difficulty {
            current.difficulty = difficulty;
        }
        if let Some(platform) = self.platform {
            current.platform = platform;
        }
        if let Some(notes) = self.notes {
            current.notes = notes;
        }
        if let Some(steps) = self.algorithm_steps {
            current.algorithm_steps = steps;
        }
        if let Some(time) = self.time_complexity {
            current.time_complexity = time;
        }
        if let Some(space) = self.space_complexity {
            current.space_complexity = space;
        }
        if let Some(code) = self.code_snippet {
            current.code_snippet = code;
        }
        if let Some(tags) = self.tags {
            current.tags = tags;
        }
        current.normalize()
    }
}

/// Trim, drop blanks, dedupe and sort. An empty set becomes `None`.
pub fn normalize_tags(tags: Option<Vec<String>>) -> Option<Vec<String>> {
    let mut tags: Vec<String> = tags?
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    tags.sort();
    tags.dedup();
    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

/// Accept only absolute http(s) URLs with a host.
pub fn validate_url(url: &str) -> Result<()> {
    let invalid = || ValidationError::InvalidUrl(url.to_string());
    if url.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let parsed = Url::parse(url).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
