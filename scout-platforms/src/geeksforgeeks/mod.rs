//! GeeksforGeeks problem pages.
//!
//! The structured tier reads the `__NEXT_DATA__` payload and pulls comments
//! from the comment endpoint; the markup tier runs selector cascades against
//! the page when the payload is absent or has no statement.
pub mod client;
pub mod comments;
pub mod diagnostic;
pub mod extract;
pub mod fallback;
pub mod patterns;
pub mod types;

pub use client::{GeeksforGeeksScraper, PLATFORM, Stage};
