//! HTML handling shared by the platform scrapers.
//!
//! - Parser-agnostic document tree (`dom`)
//! - Statement rendering and comment sanitation (`normalize`)
//!
//! Scrapers select nodes with `scraper`, convert the pieces they keep into
//! [`dom::DomNode`] trees, and hand those to the normalizer.

pub mod dom;
pub mod normalize;

pub use dom::{DomNode, MarkupNode, NodeKind};
pub use normalize::{clean_text, render_statement, sanitize_comment_html};
