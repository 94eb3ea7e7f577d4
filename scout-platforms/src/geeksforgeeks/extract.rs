//! Structured tier: the `__NEXT_DATA__` JSON payload.
use scout_web::render_statement;
use scraper::Html;
use serde_json::Value;

use super::patterns;
use super::types::{NextData, scalar_to_string};

/// Problem fields read from the structured payload. All fields are optional;
/// a payload that does not follow the expected shape yields all `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProblemDetails {
    pub title: Option<String>,
    pub statement_html: Option<String>,
    pub statement_text: Option<String>,
    pub problem_id: Option<String>,
}

impl ProblemDetails {
    /// Usable only with a non-blank statement.
    pub fn has_statement(&self) -> bool {
        self.statement_html
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}

/// Locate and parse the embedded payload. `None` is a miss, not an error.
pub fn next_data(doc: &Html) -> Option<Value> {
    let sel = patterns::selector(patterns::NEXT_DATA)?;
    let Some(script) = doc.select(&sel).next() else {
        tracing::warn!(reason = "absent", "scrape.structured.miss");
        return None;
    };

    let raw: String = script.text().collect();
    if raw.trim().is_empty() {
        tracing::warn!(reason = "empty", "scrape.structured.miss");
        return None;
    }

    match serde_json::from_str::<Value>(&raw) {
        Ok(value) => {
            tracing::debug!(bytes = raw.len(), "scrape.structured.payload");
            Some(value)
        }
        Err(err) => {
            tracing::warn!(reason = "malformed", error = %err, "scrape.structured.miss");
            None
        }
    }
}

/// Walk `props.pageProps.initialState.problemData.allData.probData`.
pub fn problem_details(payload: Value) -> ProblemDetails {
    let data = match serde_json::from_value::<NextData>(payload) {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!(error = %err, "scrape.structured.shape_mismatch");
            return ProblemDetails::default();
        }
    };

    let prob = data.props.page_props.initial_state.problem_data.all_data.prob_data;
    let statement_text = prob.problem_question.as_deref().map(render_statement);
    let details = ProblemDetails {
        title: prob.problem_name.map(|t| t.trim().to_string()),
        statement_html: prob.problem_question,
        statement_text,
        problem_id: prob.id.as_ref().and_then(scalar_to_string),
    };

    tracing::info!(
        title = details.title.as_deref().unwrap_or("-"),
        has_statement = details.has_statement(),
        problem_id = details.problem_id.as_deref().unwrap_or("-"),
        "scrape.structured.details"
    );
    details
}

/// Both steps together. `None` when the payload is missing or unparsable.
pub fn extract_structured(doc: &Html) -> Option<ProblemDetails> {
    next_data(doc).map(problem_details)
}
