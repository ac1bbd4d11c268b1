//! Markup tokenizer module.
//!
//! The tokenizer reads source text one character at a time and builds the
//! tree as it goes: each `{` opens a new current container and each `}`
//! closes it.

/// Parse errors and recoverable parse issues.
pub mod error;
/// Helper methods for tokenizer state transitions.
pub mod helpers;
/// Tokenizer state machine implementation.
pub mod machine;

pub use error::{ParseError, ParseIssue, ParseIssueKind};
pub use machine::{Tokenizer, TokenizerState, parse};
