//! Statement rendering and comment sanitation.
//!
//! [`render_statement`] turns statement markup into deterministic plain text.
//! [`sanitize_comment_html`] keeps comments as markup but makes them safe and
//! consistently styled for display.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use crate::dom::{DomNode, MarkupNode, NodeKind};

/// Separator emitted after every preformatted block.
pub const PRE_SEPARATOR: &str = "--------------------------------";

pub const PRE_STYLE: &str = "background-color: #f5f5f5; padding: 10px; border-radius: 5px; overflow-x: auto; white-space: pre-wrap; font-family: 'Courier New', monospace; line-height: 1.4;";
pub const CODE_STYLE: &str = "background-color: #f5f5f5; padding: 2px 4px; border-radius: 3px; font-family: 'Courier New', monospace; white-space: pre;";

const TAB_AS_NBSP: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

static SELF_CLOSING_BR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/>").expect("SELF_CLOSING_BR regex"));

static PRE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<pre\b").expect("PRE_OPEN regex"));

static CODE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<code\b").expect("CODE_OPEN regex"));

/// Collapse whitespace runs to single spaces and trim the ends.
///
/// ```
/// assert_eq!(scout_web::clean_text("  Two\n\t Sum  "), "Two Sum");
/// ```
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render a statement markup fragment to plain text.
///
/// ```
/// let text = scout_web::render_statement("<p>Given <strong>N</strong>.</p><pre>1 2\n3</pre>");
/// assert_eq!(text, "Given **N**.\n\n1 2\n3\n\n--------------------------------");
/// ```
pub fn render_statement(html: &str) -> String {
    let nodes = DomNode::parse_fragment(html);
    render_nodes(&nodes).trim().to_string()
}

/// Pending work for [`render_nodes`].
enum Step<'n, N> {
    Visit(&'n N),
    /// Closing emphasis marker.
    Close(&'static str),
    /// End of a `p`/`div`: trim its buffer and append it to the parent.
    CloseBlock,
}

/// Render already-parsed nodes. The result is not trimmed.
///
/// The walk keeps its own stack, so arbitrarily deep markup renders on any
/// thread.
pub fn render_nodes<N: MarkupNode>(nodes: &[N]) -> String {
    let mut out = String::new();
    let mut blocks: Vec<String> = Vec::new();
    let mut steps: Vec<Step<'_, N>> = nodes.iter().rev().map(Step::Visit).collect();

    while let Some(step) = steps.pop() {
        let node = match step {
            Step::Visit(node) => node,
            Step::Close(marker) => {
                current(&mut out, &mut blocks).push_str(marker);
                continue;
            }
            Step::CloseBlock => {
                let inner = blocks.pop().unwrap_or_default();
                let inner = inner.trim();
                if !inner.is_empty() {
                    let parent = current(&mut out, &mut blocks);
                    parent.push_str(inner);
                    parent.push_str("\n\n");
                }
                continue;
            }
        };

        let tag = match node.kind() {
            NodeKind::Text(text) => {
                current(&mut out, &mut blocks).push_str(text);
                continue;
            }
            NodeKind::Element(tag) => tag,
        };

        match tag {
            "br" => current(&mut out, &mut blocks).push('\n'),
            "pre" => {
                let raw = node.text_content();
                let body = raw
                    .trim_matches(|c| c == '\n' || c == '\r')
                    .lines()
                    .map(str::trim_end)
                    .collect::<Vec<_>>()
                    .join("\n");
                let target = current(&mut out, &mut blocks);
                target.push_str(&body);
                target.push_str("\n\n");
                target.push_str(PRE_SEPARATOR);
                target.push_str("\n\n");
            }
            "p" | "div" => {
                blocks.push(String::new());
                steps.push(Step::CloseBlock);
                steps.extend(node.children().iter().rev().map(Step::Visit));
            }
            "strong" | "b" | "em" | "i" => {
                let marker = if matches!(tag, "strong" | "b") { "**" } else { "*" };
                current(&mut out, &mut blocks).push_str(marker);
                steps.push(Step::Close(marker));
                steps.extend(node.children().iter().rev().map(Step::Visit));
            }
            _ => steps.extend(node.children().iter().rev().map(Step::Visit)),
        }
    }
    out
}

fn current<'b>(out: &'b mut String, blocks: &'b mut [String]) -> &'b mut String {
    match blocks.last_mut() {
        Some(block) => block,
        None => out,
    }
}

/// Make raw comment markup display-safe.
///
/// Escaped `\t`/`\n` sequences become real characters, tabs become four
/// `&nbsp;`, `<br/>` is canonicalised, `<pre>`/`<code>` get an inline style,
/// and the result is re-serialized through the HTML parser. Every `</p>` is
/// followed by a `<br>`.
pub fn sanitize_comment_html(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let decoded = raw
        .replace("\\t", "\t")
        .replace("\\n", "\n")
        .replace('\t', TAB_AS_NBSP);
    let decoded = SELF_CLOSING_BR.replace_all(&decoded, "<br>");
    let styled = PRE_OPEN.replace_all(&decoded, format!("<pre style=\"{PRE_STYLE}\""));
    let styled = CODE_OPEN.replace_all(&styled, format!("<code style=\"{CODE_STYLE}\""));

    let reserialized = Html::parse_fragment(&styled).root_element().inner_html();

    reserialized
        .replace('\u{a0}', "&nbsp;")
        .replace("</p>", "</p><br>")
}
