//! Visible stand-in for a statement that no extraction tier could recover.

pub const STRUCTURED_MISS_TEXT: &str =
    "Failed to extract __NEXT_DATA__ from the page. The page structure may have changed.";
pub const EXTRACTION_EMPTY_TEXT: &str =
    "Failed to extract the problem statement from the page. The page structure may have changed.";

/// Markup block naming the source URL and, when known, the title.
pub fn diagnostic_fragment(url: &str, title: Option<&str>) -> String {
    let url = escape(url);
    let title_line = title
        .filter(|t| !t.trim().is_empty())
        .map(|t| format!("<p><strong>Title:</strong> {}</p>", escape(t)))
        .unwrap_or_default();

    format!(
        concat!(
            "<div class=\"extraction-error\" style=\"background-color: #fff3cd; border: 1px solid #ffeaa7; ",
            "border-radius: 8px; padding: 20px; margin: 10px 0; font-family: Arial, sans-serif;\">",
            "<h3 style=\"color: #856404; margin-top: 0;\">Content Extraction Failed</h3>",
            "<p><strong>URL:</strong> <a href=\"{url}\" target=\"_blank\">{url}</a></p>",
            "{title_line}",
            "<p><strong>Issue:</strong> Unable to extract the problem statement. This may be due to:</p>",
            "<ul style=\"color: #856404;\">",
            "<li>Changes in the page's embedded data</li>",
            "<li>A different problem page layout</li>",
            "<li>Missing or malformed __NEXT_DATA__ content</li>",
            "</ul>",
            "<p><strong>Recommendation:</strong> Visit the URL directly in your browser to view the content.</p>",
            "</div>"
        ),
        url = url,
        title_line = title_line,
    )
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_url_and_title() {
        let html = diagnostic_fragment("https://www.geeksforgeeks.org/problems/x/1", Some("Two Sum"));
        assert!(html.contains("href=\"https://www.geeksforgeeks.org/problems/x/1\""));
        assert!(html.contains("<strong>Title:</strong> Two Sum"));
    }

    #[test]
    fn omits_missing_title_and_escapes() {
        let html = diagnostic_fragment("https://h/problems/a?x=1&y=\"2\"", None);
        assert!(!html.contains("Title:"));
        assert!(html.contains("a?x=1&amp;y=&quot;2&quot;"));
    }
}
