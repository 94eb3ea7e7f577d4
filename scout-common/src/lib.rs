//! Common types and utilities shared across Scout crates.
//!
//! This crate defines the records produced by a scrape, the shared error
//! taxonomy, and observability helpers. It is intentionally lightweight so
//! that every crate in the workspace can depend on it without pulling in
//! the HTTP or parsing stack.
//!
//! # Overview
//!
//! - [`ProblemRecord`]: normalized output of one scrape call
//! - [`CommentRecord`]: a single discussion comment
//! - [`CommentFormat`]: whether a comment body is markup or plain text
//! - [`ExtractionTier`]: which extraction tier produced the statement
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`ScoutError`] and [`Result`]: call-failing conditions
//!
//! # Examples
//!
//! ```rust
//! use scout_common::{CommentRecord, ProblemRecord};
//!
//! let mut record = ProblemRecord::new("https://www.geeksforgeeks.org/problems/sample/1");
//! assert!(!record.has_content());
//!
//! record.title = Some("Sample".into());
//! record.comments.push(CommentRecord::new("c1", "looks good"));
//! assert!(record.has_content());
//! assert_eq!(record.top_comments(5).len(), 1);
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// Author name used when a comment source does not provide one.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Which extraction tier produced the statement of a [`ProblemRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionTier {
    /// The embedded JSON payload.
    Structured,
    /// The CSS selector / heuristic cascade.
    Markup,
    /// Nothing usable was found; the statement is a synthesized diagnostic.
    #[default]
    Diagnostic,
}

/// Normalized result of scraping one problem page.
///
/// Constructed fresh per scrape and handed back by value. Any caching or
/// session persistence belongs to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemRecord {
    /// The URL that was scraped.
    pub url: String,
    pub title: Option<String>,
    /// Statement markup fragment (or the diagnostic fragment on total failure).
    pub statement_html: Option<String>,
    /// Deterministic plain-text rendering of the statement.
    pub statement_text: Option<String>,
    /// Opaque platform-internal identifier used for the comment endpoint.
    pub problem_id: Option<String>,
    pub comments: Vec<CommentRecord>,
    pub extraction: ExtractionTier,
}

impl ProblemRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            statement_html: None,
            statement_text: None,
            problem_id: None,
            comments: Vec::new(),
            extraction: ExtractionTier::default(),
        }
    }

    /// True when at least one of title or statement is populated.
    pub fn has_content(&self) -> bool {
        fn filled(v: &Option<String>) -> bool {
            v.as_deref().is_some_and(|s| !s.trim().is_empty())
        }
        filled(&self.title) || filled(&self.statement_text) || filled(&self.statement_html)
    }

    /// Best available statement for display: the text form with non-breaking
    /// spaces flattened, else the raw markup.
    pub fn display_statement(&self) -> Option<String> {
        match (&self.statement_text, &self.statement_html) {
            (Some(text), _) if !text.is_empty() => Some(text.replace('\u{a0}', " ")),
            (_, Some(html)) => Some(html.clone()),
            _ => None,
        }
    }

    pub fn top_comments(&self, limit: usize) -> &[CommentRecord] {
        &self.comments[..self.comments.len().min(limit)]
    }
}

/// How the `text` of a [`CommentRecord`] is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CommentFormat {
    /// Sanitized markup from the comments API.
    #[default]
    Html,
    /// Plain text lifted from the page; must be shown verbatim.
    Text,
}

/// A single discussion comment. Immutable once built; it carries no
/// reference back to its problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    pub user_name: String,
    /// Comment body, encoded as `format` says.
    pub text: String,
    #[serde(default)]
    pub format: CommentFormat,
    /// Opaque creation timestamp as reported upstream.
    pub created_at: String,
    pub votes: i64,
}

impl CommentRecord {
    /// Plain-text comment with an anonymous author, no timestamp and no votes.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_name: ANONYMOUS_AUTHOR.to_string(),
            text: text.into(),
            format: CommentFormat::Text,
            created_at: String::new(),
            votes: 0,
        }
    }

    /// One-line header for display, `index` is 1-based.
    ///
    /// ```
    /// use scout_common::CommentRecord;
    ///
    /// let mut c = CommentRecord::new("1", "hi");
    /// assert_eq!(c.header(1), "Comment 1 by Anonymous");
    /// c.votes = 3;
    /// c.created_at = "2024-01-01".into();
    /// assert_eq!(c.header(2), "Comment 2 by Anonymous • 2024-01-01 • 3 votes");
    /// ```
    pub fn header(&self, index: usize) -> String {
        let author = if self.user_name.trim().is_empty() {
            ANONYMOUS_AUTHOR
        } else {
            self.user_name.as_str()
        };
        let mut header = format!("Comment {index} by {author}");
        if !self.created_at.is_empty() {
            header.push_str(&format!(" • {}", self.created_at));
        }
        if self.votes != 0 {
            header.push_str(&format!(" • {} votes", self.votes));
        }
        header
    }
}

/// Conditions that fail a scrape call. Everything else degrades to a
/// partial record.
#[derive(thiserror::Error, Debug)]
pub enum ScoutError {
    /// The URL was rejected before any network I/O.
    #[error("Invalid problem URL: {0}")]
    InvalidUrl(String),

    /// The page could not be fetched after exhausting retries.
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// No scraper is registered under the requested name.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`ScoutError`].
pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_content_ignores_blank_fields() {
        let mut record = ProblemRecord::new("u");
        record.title = Some("   ".into());
        assert!(!record.has_content());
        record.statement_text = Some("Do X".into());
        assert!(record.has_content());
    }

    #[test]
    fn display_statement_prefers_text() {
        let mut record = ProblemRecord::new("u");
        record.statement_html = Some("<p>a</p>".into());
        assert_eq!(record.display_statement().as_deref(), Some("<p>a</p>"));
        record.statement_text = Some("a\u{a0}b".into());
        assert_eq!(record.display_statement().as_deref(), Some("a b"));
    }

    #[test]
    fn top_comments_is_bounded() {
        let mut record = ProblemRecord::new("u");
        for i in 0..3 {
            record.comments.push(CommentRecord::new(i.to_string(), "x"));
        }
        assert_eq!(record.top_comments(2).len(), 2);
        assert_eq!(record.top_comments(10).len(), 3);
    }

    #[test]
    fn comment_format_defaults_to_html_when_absent() {
        let comment: CommentRecord = serde_json::from_value(serde_json::json!({
            "id": "1",
            "user_name": "coder",
            "text": "<p>hi</p>",
            "created_at": "",
            "votes": 0
        }))
        .unwrap();
        assert_eq!(comment.format, CommentFormat::Html);

        let plain = serde_json::to_value(CommentRecord::new("2", "a<b")).unwrap();
        assert_eq!(plain["format"], "text");
    }

    #[test]
    fn serializes_tier_lowercase() {
        let record = ProblemRecord::new("u");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["extraction"], "diagnostic");
    }
}
