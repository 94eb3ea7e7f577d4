//! Markup tier: selector and heuristic cascades run against the page itself.
//!
//! Each cascade tries its strategies in a fixed order and stops at the first
//! one that produces non-blank text. Everything here is synchronous and works
//! on a borrowed [`Html`]; results are owned so the document can be dropped
//! before the next network call.
use scout_common::CommentRecord;
use scout_web::clean_text;
use scraper::{ElementRef, Html};
use url::Url;

use super::patterns::{self, COMMENT_CLASS, CONTENT_CLASS, HEADER_CLASS};

/// Statement recovered from markup: outer markup plus whitespace-collapsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupStatement {
    pub html: String,
    pub text: String,
}

/// Everything the markup tier can take from one page without further I/O.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupExtraction {
    pub title: Option<String>,
    pub statement: Option<MarkupStatement>,
    /// Comments found in the page's own comment container.
    pub inline_comments: Vec<String>,
    /// Absolute URL of the comments tab, looked up only when there were no
    /// inline comments.
    pub comments_link: Option<String>,
    /// Last-resort scan over `single_comment` elements.
    pub scanned_comments: Vec<String>,
}

/// Run all three cascades over `doc`. The secondary comments page is left to
/// the caller; see [`comments_from_page`].
pub fn extract_markup(doc: &Html, page_url: &str, limit: usize) -> MarkupExtraction {
    let inline_comments = container_comments(doc, limit);
    let comments_link = if inline_comments.is_empty() {
        comments_link(doc, page_url)
    } else {
        None
    };
    let scanned_comments = if inline_comments.is_empty() {
        scan_comments(doc, limit)
    } else {
        Vec::new()
    };

    MarkupExtraction {
        title: title(doc),
        statement: statement(doc),
        inline_comments,
        comments_link,
        scanned_comments,
    }
}

/// Parse a secondary page and read its comment container.
pub fn comments_from_page(html: &str, limit: usize) -> Vec<String> {
    let doc = Html::parse_document(html);
    container_comments(&doc, limit)
}

/// Number comment texts into anonymous records, capped at `limit`.
pub fn comment_records(texts: Vec<String>, limit: usize) -> Vec<CommentRecord> {
    texts
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, text)| CommentRecord::new(format!("comment_{i}"), text))
        .collect()
}

// ==============================
// Title
// ==============================

pub fn title(doc: &Html) -> Option<String> {
    if let Some(found) = first_text(doc, patterns::TITLE) {
        tracing::debug!(strategy = "selector", "markup.title");
        return Some(found);
    }

    for container in elements(doc).filter(|el| patterns::class_matches(el.value(), &HEADER_CLASS)) {
        for heading in patterns::TITLE_HEADINGS {
            let Some(sel) = patterns::selector(heading) else {
                continue;
            };
            if let Some(text) = container
                .select(&sel)
                .map(element_text)
                .find(|t| !t.is_empty())
            {
                tracing::debug!(strategy = "header_class", "markup.title");
                return Some(text);
            }
        }
    }

    let sel = patterns::selector(patterns::OG_TITLE)?;
    let found = doc
        .select(&sel)
        .filter_map(|el| el.value().attr("content"))
        .map(clean_text)
        .find(|t| !t.is_empty());
    if found.is_some() {
        tracing::debug!(strategy = "og_title", "markup.title");
    }
    found
}

// ==============================
// Statement
// ==============================

pub fn statement(doc: &Html) -> Option<MarkupStatement> {
    let precise = patterns::selector(patterns::STATEMENT)
        .and_then(|sel| doc.select(&sel).find_map(as_statement));
    if let Some(found) = precise {
        tracing::debug!(strategy = "selector", "markup.statement");
        return Some(found);
    }

    if let Some(found) = elements(doc)
        .filter(|el| patterns::class_matches(el.value(), &CONTENT_CLASS))
        .find_map(as_statement)
    {
        tracing::debug!(strategy = "content_class", "markup.statement");
        return Some(found);
    }

    let found = keyword_heuristic(doc);
    if found.is_some() {
        tracing::debug!(strategy = "keyword_heuristic", "markup.statement");
    }
    found
}

/// Longest `div` whose text mentions a statement keyword. Ties go to the
/// earliest container in document order.
fn keyword_heuristic(doc: &Html) -> Option<MarkupStatement> {
    let mut best: Option<(usize, ElementRef<'_>, String)> = None;
    for div in elements(doc).filter(|el| el.value().name() == "div") {
        let text = element_text(div);
        if !patterns::STATEMENT_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            continue;
        }
        let len = text.chars().count();
        if best.as_ref().is_none_or(|(best_len, _, _)| len > *best_len) {
            best = Some((len, div, text));
        }
    }
    best.map(|(_, div, text)| MarkupStatement { html: div.html(), text })
}

fn as_statement(el: ElementRef<'_>) -> Option<MarkupStatement> {
    let text = element_text(el);
    (!text.is_empty()).then(|| MarkupStatement {
        html: el.html(),
        text,
    })
}

// ==============================
// Comments
// ==============================

/// Comment texts inside the known comment container.
pub fn container_comments(doc: &Html, limit: usize) -> Vec<String> {
    let (Some(container_sel), Some(text_sel)) = (
        patterns::selector(patterns::COMMENTS_CONTAINER),
        patterns::selector(patterns::COMMENT_TEXT),
    ) else {
        return Vec::new();
    };
    let Some(container) = doc.select(&container_sel).next() else {
        return Vec::new();
    };

    container
        .select(&text_sel)
        .take(limit)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Absolute URL of the first header-menu link mentioning comments.
pub fn comments_link(doc: &Html, page_url: &str) -> Option<String> {
    let menu_sel = patterns::selector(patterns::HEADER_MENU)?;
    let link_sel = patterns::selector("a")?;
    let menu = doc.select(&menu_sel).next()?;
    let base = Url::parse(page_url).ok()?;

    menu.select(&link_sel)
        .filter(|a| element_text(*a).to_lowercase().contains("comments"))
        .filter_map(|a| a.value().attr("href"))
        .find_map(|href| match base.join(href) {
            Ok(url) => Some(url.to_string()),
            Err(err) => {
                tracing::debug!(href, error = %err, "markup.comments_link.unresolvable");
                None
            }
        })
}

/// Every `single_comment` element, reading its nested text block when there
/// is one and its whole text otherwise.
pub fn scan_comments(doc: &Html, limit: usize) -> Vec<String> {
    let nested = patterns::selector(patterns::COMMENT_NESTED_TEXT);
    elements(doc)
        .filter(|el| patterns::class_matches(el.value(), &COMMENT_CLASS))
        .take(limit)
        .map(|el| {
            let target = nested
                .as_ref()
                .and_then(|sel| el.select(sel).next())
                .unwrap_or(el);
            element_text(target)
        })
        .filter(|t| !t.is_empty())
        .collect()
}

// ==============================
// Helpers
// ==============================

fn elements(doc: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    doc.root_element().descendants().filter_map(ElementRef::wrap)
}

fn element_text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<String>())
}

fn first_text(doc: &Html, css: &str) -> Option<String> {
    let sel = patterns::selector(css)?;
    doc.select(&sel).map(element_text).find(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://www.geeksforgeeks.org/problems/sample-1/1";

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><head></head><body>{body}</body></html>"))
    }

    #[test]
    fn title_from_precise_selector() {
        let d = doc(r#"<div class="problems_header_content__o_4YA">
                <div class="problems_header_content__title__L2cB2 g-mb-0"><h3 class="g-m-0">  Two
                Sum </h3></div></div>"#);
        assert_eq!(title(&d).as_deref(), Some("Two Sum"));
    }

    #[test]
    fn title_from_header_class_then_meta() {
        let d = doc(r#"<div class="Problems_Header_Content__new"><span>x</span><h2>Kadane</h2></div>"#);
        assert_eq!(title(&d).as_deref(), Some("Kadane"));

        let d = Html::parse_document(
            r#"<html><head><meta property="og:title" content=" Meta  Title "></head><body></body></html>"#,
        );
        assert_eq!(title(&d).as_deref(), Some("Meta Title"));

        assert_eq!(title(&doc("<p>nothing</p>")), None);
    }

    #[test]
    fn statement_from_precise_selector() {
        let d = doc(r#"<div class="problems_problem_content__Xm_eO"><p>Given  N.</p></div>"#);
        let found = statement(&d).unwrap();
        assert_eq!(found.text, "Given N.");
        assert!(found.html.starts_with("<div class=\"problems_problem_content__Xm_eO\">"));
    }

    #[test]
    fn statement_from_content_class() {
        let d = doc(r#"<section class="PROBLEM_CONTENT_v2">Body text</section>"#);
        assert_eq!(statement(&d).unwrap().text, "Body text");
    }

    #[test]
    fn heuristic_picks_longest_keyword_container() {
        let d = doc(
            r#"<div id="a">Example short</div>
               <div id="b">Nothing relevant here at all, just a long paragraph of words</div>
               <div id="c">Input: 1 2 3 Output: 6 Explanation: sum</div>"#,
        );
        let found = statement(&d).unwrap();
        assert!(found.html.contains("id=\"c\""));
        assert_eq!(found.text, "Input: 1 2 3 Output: 6 Explanation: sum");
    }

    #[test]
    fn heuristic_keywords_are_case_sensitive_and_ties_go_first() {
        let d = doc(r#"<div id="a">example lower</div>"#);
        assert!(statement(&d).is_none());

        let d = doc(r#"<div id="first">Output: 1</div><div id="second">Output: 2</div>"#);
        assert!(statement(&d).unwrap().html.contains("id=\"first\""));
    }

    #[test]
    fn container_comments_are_capped() {
        let items: String = (0..8)
            .map(|i| format!(r#"<div class="single_comment"><div class="items"><div class="right"><div class="text"> c{i} </div></div></div></div>"#))
            .collect();
        let d = doc(&format!(
            r#"<div class="bottom_container"><div class="bottom_contents">{items}</div></div>"#
        ));
        assert_eq!(container_comments(&d, 5), vec!["c0", "c1", "c2", "c3", "c4"]);

        let extraction = extract_markup(&d, PAGE_URL, 5);
        assert_eq!(extraction.inline_comments.len(), 5);
        assert!(extraction.comments_link.is_none());
        assert!(extraction.scanned_comments.is_empty());
    }

    #[test]
    fn comments_link_resolves_relative_href() {
        let d = doc(r#"<div class="problems_header_menu__aKU8f">
                <a href="/problems/sample-1/1?tab=editorial">Editorial</a>
                <a>Comments (no href)</a>
                <a href="?tab=comments"> COMMENTS </a></div>"#);
        assert_eq!(
            comments_link(&d, PAGE_URL).as_deref(),
            Some("https://www.geeksforgeeks.org/problems/sample-1/1?tab=comments")
        );
    }

    #[test]
    fn scan_falls_back_to_whole_comment_text() {
        let d = doc(r#"
            <div class="single_comment"><div class="items"><div class="right"><div class="text">nested</div></div></div><span>meta</span></div>
            <li class="Single_Comment">  whole   text </li>
            <div class="single_comment">   </div>"#);
        assert_eq!(scan_comments(&d, 5), vec!["nested", "whole text"]);
    }

    #[test]
    fn records_are_numbered_and_anonymous() {
        let records = comment_records(vec!["a".into(), "b".into()], 1);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "comment_0");
        assert_eq!(records[0].user_name, "Anonymous");
        assert_eq!(records[0].votes, 0);
        assert_eq!(records[0].format, scout_common::CommentFormat::Text);
    }
}
