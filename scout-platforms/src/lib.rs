//! Problem-page scrapers and the registry that selects between them.
//!
//! Each platform implements [`ProblemScraper`]; callers pick one through
//! [`PlatformRegistry`] by name or by URL. Only GeeksforGeeks is implemented.
use async_trait::async_trait;
use scout_common::{CommentRecord, ProblemRecord, Result};

pub mod geeksforgeeks;
pub mod registry;

pub use geeksforgeeks::GeeksforGeeksScraper;
pub use registry::PlatformRegistry;

/// Capabilities every platform scraper provides.
///
/// Implementations hold configuration and an HTTP session only; they keep no
/// per-scrape state, so sequential calls on one instance are independent.
#[async_trait]
pub trait ProblemScraper: Send + Sync {
    /// Registry name of the platform.
    fn platform(&self) -> &'static str;

    /// Admission check. Never performs I/O and never fails.
    fn validate(&self, url: &str) -> bool;

    /// Fetch and extract one problem page.
    ///
    /// Fails only for rejected URLs and exhausted page fetches; every
    /// extraction or comment problem degrades to a partial record.
    async fn scrape(&self, url: &str) -> Result<ProblemRecord>;

    /// Most recent comments for a problem id, at most `limit`. Failures yield
    /// an empty list.
    async fn fetch_comments(&self, problem_id: &str, limit: usize) -> Vec<CommentRecord>;
}
