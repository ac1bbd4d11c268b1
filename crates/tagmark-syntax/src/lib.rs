//! Tokenizer and canonical renderer for the tagmark markup language.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** - a character-at-a-time state machine that turns
//!   `$name[arg key=value]{body}` source directly into a [`Tree`]
//!   (there is no separate token stream)
//!   - Numeric text such as `$1.00` passes through as literal text
//!   - Truncated argument lists fall back to literal text
//!   - `${` is the single fatal construction error
//!
//! - **Canonical renderer** - [`Tree`] back to markup source, the
//!   left-inverse of the tokenizer up to argument quoting
//!
//! [`Tree`]: tagmark_dom::Tree

/// Canonical (markup source) rendering.
pub mod render;
/// Markup tokenizer state machine.
pub mod tokenizer;

pub use render::{render, render_children};
pub use tokenizer::{ParseError, ParseIssue, ParseIssueKind, Tokenizer, TokenizerState, parse};
