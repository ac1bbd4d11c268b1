use strum_macros::Display;
use thiserror::Error;

/// Unrecoverable construction errors. Parsing stops and no tree is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// `${`: a body opened where a function name was expected.
    #[error("expected a function name after '$' at byte {offset}, found '{{'")]
    MissingFunctionName {
        /// Byte offset of the `$`.
        offset: usize,
    },
}

/// Irregular input the tokenizer recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ParseIssueKind {
    /// End of input inside `[...]` or inside a quoted argument.
    /// The source from the `$` onward became literal text.
    #[strum(to_string = "unterminated argument list")]
    UnterminatedAttributes,
    /// A closing brace with no open container. It was dropped.
    #[strum(to_string = "unmatched closing brace")]
    UnmatchedCloseBrace,
    /// End of input with at least one container still open.
    #[strum(to_string = "container still open at end of input")]
    UnclosedContainer,
    /// `$[` with no function name. Kept as literal text.
    #[strum(to_string = "argument list without a function name")]
    DollarBracket,
}

/// A recovered irregularity and where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What went wrong.
    pub kind: ParseIssueKind,
    /// Byte offset into the source.
    pub offset: usize,
}
