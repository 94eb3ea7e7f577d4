//! Comment endpoint client.
use std::borrow::Cow;

use scout_common::{ANONYMOUS_AUTHOR, CommentFormat, CommentRecord};
use scout_http::{HttpClient, RequestOpts, RetryPolicy};
use scout_web::sanitize_comment_html;

use super::types::{CommentsResponse, RawComment, scalar_to_string, votes_of};

/// `{api_base}/prob{problem_id}`.
pub fn comments_url(api_base: &str, problem_id: &str) -> String {
    format!("{}/prob{}", api_base.trim_end_matches('/'), problem_id)
}

/// Fixed query: newest first, first page, one post's thread.
pub fn comments_query() -> Vec<(&'static str, Cow<'static, str>)> {
    vec![
        ("sort_by", "time".into()),
        ("ancestry", "".into()),
        ("order_by", "dsc".into()),
        ("page", "1".into()),
        ("fetch_by", "post_id".into()),
    ]
}

/// Fetch up to `limit` comments. Any failure is logged and yields an empty list.
pub async fn fetch_comments(
    http: &HttpClient,
    api_base: &str,
    problem_id: &str,
    limit: usize,
) -> Vec<CommentRecord> {
    let problem_id = problem_id.trim();
    if problem_id.is_empty() {
        tracing::warn!("comments.fetch.skipped_no_id");
        return Vec::new();
    }

    let url = comments_url(api_base, problem_id);
    let opts = RequestOpts {
        retry: Some(RetryPolicy::none()),
        query: Some(comments_query()),
        ..Default::default()
    };

    match http.get_json::<CommentsResponse>(&url, opts).await {
        Ok(page) => {
            let total = page.results.len();
            let comments: Vec<CommentRecord> = page
                .results
                .into_iter()
                .take(limit)
                .enumerate()
                .map(|(i, raw)| to_record(i, raw))
                .collect();
            tracing::info!(problem_id, total, kept = comments.len(), "comments.fetch.ok");
            comments
        }
        Err(err) => {
            tracing::warn!(problem_id, error = %err, "comments.fetch.error");
            Vec::new()
        }
    }
}

fn to_record(index: usize, raw: RawComment) -> CommentRecord {
    CommentRecord {
        id: raw
            .id
            .as_ref()
            .and_then(scalar_to_string)
            .unwrap_or_else(|| format!("comment_{index}")),
        user_name: raw
            .user_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
        text: sanitize_comment_html(raw.text.as_deref().unwrap_or_default()),
        format: CommentFormat::Html,
        created_at: raw
            .created_at
            .as_ref()
            .and_then(scalar_to_string)
            .unwrap_or_default(),
        votes: votes_of(raw.votes.as_ref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_interpolates_id() {
        assert_eq!(
            comments_url("https://commentapi.geeksforgeeks.org/api/vr/1/comment/", "42"),
            "https://commentapi.geeksforgeeks.org/api/vr/1/comment/prob42"
        );
    }

    #[test]
    fn record_defaults_for_missing_fields() {
        let raw: RawComment = serde_json::from_value(json!({"text": null})).unwrap();
        let record = to_record(3, raw);
        assert_eq!(record.id, "comment_3");
        assert_eq!(record.user_name, "Anonymous");
        assert_eq!(record.text, "");
        assert_eq!(record.created_at, "");
        assert_eq!(record.votes, 0);
    }

    #[test]
    fn record_keeps_upstream_fields_and_sanitizes_text() {
        let raw: RawComment = serde_json::from_value(json!({
            "id": 991,
            "text": "<p>use\\tdp</p>",
            "user_name": "coder",
            "created_at": "2024-03-01 10:00:00",
            "votes": 4
        }))
        .unwrap();
        let record = to_record(0, raw);
        assert_eq!(record.id, "991");
        assert_eq!(record.user_name, "coder");
        assert_eq!(record.text, "<p>use&nbsp;&nbsp;&nbsp;&nbsp;dp</p><br>");
        assert_eq!(record.created_at, "2024-03-01 10:00:00");
        assert_eq!(record.votes, 4);
        assert_eq!(record.format, CommentFormat::Html);
    }
}
