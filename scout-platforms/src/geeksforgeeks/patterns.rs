//! Selectors and class patterns for GeeksforGeeks problem pages.
//!
//! The hashed class suffixes (`__o_4YA`, `__Xm_eO`, ...) change whenever the
//! site is rebuilt, which is why every precise selector has a looser
//! class-substring pattern behind it.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;

pub const NEXT_DATA: &str = "script#__NEXT_DATA__";

pub const TITLE: &str =
    ".problems_header_content__o_4YA .problems_header_content__title__L2cB2.g-mb-0 h3.g-m-0";
pub const TITLE_HEADINGS: [&str; 3] = ["h1", "h2", "h3"];
pub const OG_TITLE: &str = "meta[property=\"og:title\"]";

pub const STATEMENT: &str = ".problems_problem_content__Xm_eO";

pub const COMMENTS_CONTAINER: &str = ".bottom_container .bottom_contents";
pub const COMMENT_TEXT: &str = ".single_comment .items .right .text";
pub const COMMENT_NESTED_TEXT: &str = ".items .right .text";
pub const HEADER_MENU: &str = ".problems_header_menu__aKU8f";

/// Matched case-sensitively against cleaned container text.
pub const STATEMENT_KEYWORDS: [&str; 5] =
    ["Example", "Input", "Output", "Explanation", "Constraints"];

pub static HEADER_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)problems_header_content").expect("HEADER_CLASS regex"));

pub static CONTENT_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)problem_content").expect("CONTENT_CLASS regex"));

pub static COMMENT_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)single_comment").expect("COMMENT_CLASS regex"));

/// Parse a selector, logging and skipping it when invalid.
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(err) => {
            tracing::warn!(selector = css, error = %err, "markup.selector.invalid");
            None
        }
    }
}

/// True when any class on the element matches `pattern`.
pub fn class_matches(el: &scraper::node::Element, pattern: &Regex) -> bool {
    el.attr("class").is_some_and(|class| pattern.is_match(class))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_static_selectors_parse() {
        for css in [
            NEXT_DATA,
            TITLE,
            OG_TITLE,
            STATEMENT,
            COMMENTS_CONTAINER,
            COMMENT_TEXT,
            COMMENT_NESTED_TEXT,
            HEADER_MENU,
        ] {
            assert!(selector(css).is_some(), "{css}");
        }
    }

    #[test]
    fn invalid_selector_is_skipped() {
        assert!(selector("div[").is_none());
    }

    #[test]
    fn class_patterns_ignore_case() {
        assert!(HEADER_CLASS.is_match("Problems_Header_Content__zz"));
        assert!(CONTENT_CLASS.is_match("x problems_problem_content__new"));
        assert!(COMMENT_CLASS.is_match("SINGLE_COMMENT"));
        assert!(!COMMENT_CLASS.is_match("single-comment"));
    }
}
