//! GeeksforGeeks scraper: admission, page fetch and the tiered extraction run.
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use scout_common::{CommentRecord, ExtractionTier, ProblemRecord, Result, ScoutError};
use scout_config::{GeeksforGeeksSettings, ScoutConfig};
use scout_http::{HttpClient, HttpError, RequestOpts, RetryPolicy};
use scraper::Html;
use tracing::{Instrument, Span};

use super::comments;
use super::diagnostic::{EXTRACTION_EMPTY_TEXT, STRUCTURED_MISS_TEXT, diagnostic_fragment};
use super::extract::{self, ProblemDetails};
use super::fallback::{self, MarkupExtraction};
use crate::ProblemScraper;

pub const PLATFORM: &str = "geeksforgeeks";

/// Pipeline position of one scrape, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidatingUrl,
    FetchingPage,
    ExtractingStructured,
    FetchingComments,
    ExtractingFallback,
    Assembled,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ValidatingUrl => "validating_url",
            Stage::FetchingPage => "fetching_page",
            Stage::ExtractingStructured => "extracting_structured",
            Stage::FetchingComments => "fetching_comments",
            Stage::ExtractingFallback => "extracting_fallback",
            Stage::Assembled => "assembled",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage, url: &str) {
    tracing::debug!(stage = %stage, url, "scrape.stage");
}

/// What one parse of the primary page produced.
#[derive(Debug)]
enum PageAnalysis {
    Structured(ProblemDetails),
    /// Structured payload present but without a usable statement.
    Markup {
        structured_title: Option<String>,
        markup: MarkupExtraction,
    },
    /// No structured payload at all.
    Missing { markup: MarkupExtraction },
}

/// Scraper for `https://www.geeksforgeeks.org/problems/...` pages.
///
/// Holds a pooled HTTP session and configuration only. Calls on one instance
/// are independent of each other.
#[derive(Clone)]
pub struct GeeksforGeeksScraper {
    http: HttpClient,
    settings: GeeksforGeeksSettings,
    comments_limit: usize,
    problem_prefix: String,
    span: Span,
}

impl GeeksforGeeksScraper {
    /// Build from configuration with a span named after the platform.
    ///
    /// ```
    /// use scout_config::ScoutConfig;
    /// use scout_platforms::{GeeksforGeeksScraper, ProblemScraper};
    ///
    /// let scraper = GeeksforGeeksScraper::from_config(&ScoutConfig::default())?;
    /// assert!(scraper.validate("https://www.geeksforgeeks.org/problems/sample-1/1"));
    /// assert!(!scraper.validate("https://www.geeksforgeeks.org/courses/x"));
    /// # Ok::<(), scout_common::ScoutError>(())
    /// ```
    pub fn from_config(config: &ScoutConfig) -> Result<Self> {
        let span = tracing::info_span!("scraper", platform = PLATFORM);
        Self::with_span(config, span)
    }

    /// Build with a caller-supplied span; all pipeline events are recorded in it.
    pub fn with_span(config: &ScoutConfig, span: Span) -> Result<Self> {
        let http = HttpClient::with_connect_timeout(
            &config.http.user_agent,
            config.http.connect_timeout(),
        )
        .map_err(|e| ScoutError::Config(e.to_string()))?
        .with_timeout(config.http.timeout())
        .with_retry_policy(retry_policy(config));

        let site_base = config.geeksforgeeks.site_base.trim_end_matches('/');
        Ok(Self {
            http,
            problem_prefix: format!("{site_base}/problems/"),
            settings: config.geeksforgeeks.clone(),
            comments_limit: config.comments_limit,
            span,
        })
    }

    pub fn comments_limit(&self) -> usize {
        self.comments_limit
    }

    /// Accepted URL prefix, e.g. `https://www.geeksforgeeks.org/problems/`.
    pub fn problem_prefix(&self) -> &str {
        &self.problem_prefix
    }

    async fn fetch_page(&self, url: &str) -> std::result::Result<String, HttpError> {
        self.http.get_text(url, RequestOpts::default()).await
    }

    async fn run(&self, url: &str) -> Result<ProblemRecord> {
        enter(Stage::ValidatingUrl, url);
        if !self.validate(url) {
            enter(Stage::Failed, url);
            tracing::warn!(url, "scrape.invalid_url");
            return Err(ScoutError::InvalidUrl(url.to_string()));
        }
        let url = url.trim();

        enter(Stage::FetchingPage, url);
        let page = match self.fetch_page(url).await {
            Ok(page) => page,
            Err(err) => {
                enter(Stage::Failed, url);
                tracing::error!(url, error = %err, "scrape.fetch.failed");
                return Err(ScoutError::Network {
                    url: url.to_string(),
                    message: err.to_string(),
                });
            }
        };

        enter(Stage::ExtractingStructured, url);
        let analysis = analyze_page(&page, url, self.comments_limit);

        let mut record = ProblemRecord::new(url);
        match analysis {
            PageAnalysis::Structured(details) => {
                record.title = details.title;
                record.statement_html = details.statement_html;
                record.statement_text = details.statement_text;
                record.problem_id = details.problem_id;
                record.extraction = ExtractionTier::Structured;

                if let Some(id) = record.problem_id.clone() {
                    enter(Stage::FetchingComments, url);
                    record.comments = self.fetch_comments(&id, self.comments_limit).await;
                } else {
                    tracing::warn!(url, "scrape.comments.no_problem_id");
                }
            }
            PageAnalysis::Markup {
                structured_title,
                markup,
            } => {
                enter(Stage::ExtractingFallback, url);
                self.apply_markup(&mut record, markup, structured_title, EXTRACTION_EMPTY_TEXT)
                    .await;
            }
            PageAnalysis::Missing { markup } => {
                enter(Stage::ExtractingFallback, url);
                self.apply_markup(&mut record, markup, None, STRUCTURED_MISS_TEXT)
                    .await;
            }
        }

        record.comments.truncate(self.comments_limit);
        enter(Stage::Assembled, url);
        tracing::info!(
            url,
            tier = ?record.extraction,
            has_title = record.title.is_some(),
            comments = record.comments.len(),
            "scrape.assembled"
        );
        Ok(record)
    }

    /// Fill `record` from the markup tier. `known_title` only labels the
    /// diagnostic fragment when the markup has no title of its own.
    async fn apply_markup(
        &self,
        record: &mut ProblemRecord,
        markup: MarkupExtraction,
        known_title: Option<String>,
        miss_text: &str,
    ) {
        let limit = self.comments_limit;
        record.title = markup.title;

        match markup.statement {
            Some(statement) => {
                record.statement_html = Some(statement.html);
                record.statement_text = Some(statement.text);
                record.extraction = ExtractionTier::Markup;
            }
            None => {
                tracing::warn!(url = %record.url, "scrape.extraction.empty");
                let label = record.title.as_deref().or(known_title.as_deref());
                record.statement_html = Some(diagnostic_fragment(&record.url, label));
                record.statement_text = Some(miss_text.to_string());
                record.extraction = ExtractionTier::Diagnostic;
                // Diagnostic records never carry comments.
                return;
            }
        }

        let mut texts = markup.inline_comments;
        if texts.is_empty() {
            if let Some(link) = markup.comments_link {
                texts = self.secondary_comments(&link, limit).await;
            }
        }
        if texts.is_empty() {
            texts = markup.scanned_comments;
        }
        record.comments = fallback::comment_records(texts, limit);
    }

    async fn secondary_comments(&self, link: &str, limit: usize) -> Vec<String> {
        tracing::debug!(link, "markup.comments.secondary_fetch");
        match self.fetch_page(link).await {
            Ok(body) => fallback::comments_from_page(&body, limit),
            Err(err) => {
                tracing::debug!(link, error = %err, "markup.comments.secondary_failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ProblemScraper for GeeksforGeeksScraper {
    fn platform(&self) -> &'static str {
        PLATFORM
    }

    fn validate(&self, url: &str) -> bool {
        let url = url.trim();
        match url.strip_prefix(self.problem_prefix.as_str()) {
            Some(rest) => !rest.trim_matches('/').is_empty(),
            None => false,
        }
    }

    async fn scrape(&self, url: &str) -> Result<ProblemRecord> {
        self.run(url).instrument(self.span.clone()).await
    }

    async fn fetch_comments(&self, problem_id: &str, limit: usize) -> Vec<CommentRecord> {
        comments::fetch_comments(&self.http, &self.settings.comments_api, problem_id, limit)
            .instrument(self.span.clone())
            .await
    }
}

/// Parse the page once and pull everything each tier needs. The document is
/// dropped before returning so no parse tree is held across an await.
fn analyze_page(page: &str, url: &str, limit: usize) -> PageAnalysis {
    let doc = Html::parse_document(page);
    match extract::extract_structured(&doc) {
        Some(details) if details.has_statement() => PageAnalysis::Structured(details),
        Some(details) => {
            tracing::warn!(url, "scrape.structured.no_statement");
            PageAnalysis::Markup {
                structured_title: details.title,
                markup: fallback::extract_markup(&doc, url, limit),
            }
        }
        None => PageAnalysis::Missing {
            markup: fallback::extract_markup(&doc, url, limit),
        },
    }
}

fn retry_policy(config: &ScoutConfig) -> RetryPolicy {
    RetryPolicy {
        max_attempts: config.retry.max_attempts,
        multiplier: Duration::from_millis(config.retry.multiplier_ms),
        min_backoff: Duration::from_millis(config.retry.min_backoff_ms),
        max_backoff: Duration::from_millis(config.retry.max_backoff_ms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraper() -> GeeksforGeeksScraper {
        GeeksforGeeksScraper::from_config(&ScoutConfig::default()).unwrap()
    }

    #[test]
    fn accepts_problem_pages() {
        let s = scraper();
        assert!(s.validate("https://www.geeksforgeeks.org/problems/sample-1/1"));
        assert!(s.validate("  https://www.geeksforgeeks.org/problems/kadanes-algorithm/0 \n"));
    }

    #[test]
    fn rejects_everything_else() {
        let s = scraper();
        for url in [
            "",
            "   ",
            "https://www.geeksforgeeks.org/problems/",
            "https://www.geeksforgeeks.org/problems//",
            "https://www.geeksforgeeks.org/courses/dsa",
            "http://www.geeksforgeeks.org/problems/sample-1/1",
            "https://geeksforgeeks.org/problems/sample-1/1",
            "https://www.geeksforgeeks.org.evil.com/problems/sample-1/1",
            "https://leetcode.com/problems/two-sum/",
            "not a url at all",
        ] {
            assert!(!s.validate(url), "{url:?} should be rejected");
        }
    }

    #[test]
    fn prefix_follows_site_base() {
        let mut config = ScoutConfig::default();
        config.geeksforgeeks.site_base = "http://127.0.0.1:8080/".into();
        let s = GeeksforGeeksScraper::from_config(&config).unwrap();
        assert_eq!(s.problem_prefix(), "http://127.0.0.1:8080/problems/");
        assert!(s.validate("http://127.0.0.1:8080/problems/x/1"));
    }

    #[test]
    fn retry_policy_mirrors_config() {
        let policy = retry_policy(&ScoutConfig::default());
        assert_eq!(policy, RetryPolicy::default());
    }

    #[test]
    fn structured_page_without_statement_falls_through() {
        let page = r#"<html><head><script id="__NEXT_DATA__">{"props":{"pageProps":{"initialState":{"problemData":{"allData":{"probData":{"problem_name":"T"}}}}}}}</script></head>
            <body><div class="problems_problem_content__Xm_eO">Input: 1</div></body></html>"#;
        match analyze_page(page, "https://www.geeksforgeeks.org/problems/x/1", 5) {
            PageAnalysis::Markup {
                structured_title,
                markup,
            } => {
                assert_eq!(structured_title.as_deref(), Some("T"));
                assert_eq!(markup.statement.unwrap().text, "Input: 1");
            }
            other => panic!("expected markup analysis, got {other:?}"),
        }
    }

    #[test]
    fn stage_names_are_snake_case() {
        assert_eq!(Stage::ValidatingUrl.to_string(), "validating_url");
        assert_eq!(Stage::Assembled.to_string(), "assembled");
    }
}
