//! Plain-text terminal rendering of a scraped record.
use scout_common::{CommentFormat, ProblemRecord};
use scout_web::render_statement;

const RULE: &str = "========================================";

pub fn record_text(record: &ProblemRecord, comment_limit: usize) -> String {
    let mut out = String::new();
    out.push_str(record.title.as_deref().unwrap_or("(untitled)"));
    out.push('\n');
    out.push_str(&record.url);
    out.push('\n');
    if let Some(id) = &record.problem_id {
        out.push_str(&format!("Problem id: {id}\n"));
    }
    out.push_str(RULE);
    out.push_str("\n\n");

    match record.display_statement() {
        Some(statement) => out.push_str(statement.trim_end()),
        None => out.push_str("(no statement)"),
    }
    out.push_str("\n\n");

    let comments = record.top_comments(comment_limit);
    if comments.is_empty() {
        out.push_str("No comments.\n");
        return out;
    }

    out.push_str(RULE);
    out.push('\n');
    for (i, comment) in comments.iter().enumerate() {
        out.push('\n');
        out.push_str(&comment.header(i + 1));
        out.push('\n');
        match comment.format {
            CommentFormat::Html => {
                out.push_str(&render_statement(&comment.text).replace('\u{a0}', " "));
            }
            CommentFormat::Text => out.push_str(comment.text.trim_end()),
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_common::CommentRecord;

    #[test]
    fn renders_statement_and_limited_comments() {
        let mut record = ProblemRecord::new("https://www.geeksforgeeks.org/problems/x/1");
        record.title = Some("Sample".into());
        record.statement_text = Some("Do X".into());
        let mut first = CommentRecord::new("1", "<p>use&nbsp;dp</p><br>");
        first.format = CommentFormat::Html;
        first.user_name = "coder".into();
        first.votes = 2;
        record.comments = vec![first, CommentRecord::new("2", "second")];

        let text = record_text(&record, 1);
        assert!(text.starts_with("Sample\nhttps://www.geeksforgeeks.org/problems/x/1\n"));
        assert!(text.contains("\n\nDo X\n\n"));
        assert!(text.contains("Comment 1 by coder • 2 votes\nuse dp\n"));
        assert!(!text.contains("second"));
    }

    #[test]
    fn plain_text_comments_are_printed_verbatim() {
        let mut record = ProblemRecord::new("u");
        record.comments = vec![CommentRecord::new("comment_0", "if a<b then <i>swap</i> &amp; go")];

        let text = record_text(&record, 5);
        assert!(text.contains("Comment 1 by Anonymous\nif a<b then <i>swap</i> &amp; go\n"));
    }

    #[test]
    fn marks_missing_pieces() {
        let text = record_text(&ProblemRecord::new("u"), 5);
        assert!(text.starts_with("(untitled)\nu\n"));
        assert!(text.contains("(no statement)"));
        assert!(text.ends_with("No comments.\n"));
    }
}
