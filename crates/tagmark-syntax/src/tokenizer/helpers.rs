//! Helper functions for the markup tokenizer.
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Input/character handling
//! - Tree building (flushing text, attaching elements, closing containers)
//! - Issue reporting

use tagmark_common::warning::warn_once;
use tagmark_dom::{Attribute, NodeId};

use super::error::{ParseIssue, ParseIssueKind};
use super::machine::{Tokenizer, TokenizerState};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl Tokenizer {
    /// Transitions to a new state. The next character will be consumed on the
    /// next iteration of the main loop.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// Transitions to a new state without consuming the current character.
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl Tokenizer {
    /// Returns the character at the current position and advances the position.
    /// Returns None if we've reached the end of input.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// Whitespace separating arguments and ending function names.
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\r' | '\x0C')
    }

    /// Characters that make a preceding `$` plain text rather than an
    /// element start.
    pub(super) const fn is_literal_after_dollar(input_char: char) -> bool {
        input_char.is_ascii_digit()
            || matches!(input_char, '+' | '-' | '.' | ',')
            || Self::is_whitespace_char(input_char)
    }
}

// =============================================================================
// Tree Building Helpers
// =============================================================================

impl Tokenizer {
    /// Turns pending literal text into a text node of the current container.
    pub(super) fn flush_text(&mut self) {
        if self.text_buffer.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text_buffer);
        let node = self.tree.new_text(text);
        self.tree.push_child(self.current, node);
    }

    /// Creates an element named after the function name just read and
    /// appends it to the current container.
    pub(super) fn attach_new_element(&mut self) -> NodeId {
        let element = self.tree.new_element(&self.function_name, &[]);
        self.attach_element(element);
        element
    }

    fn attach_element(&mut self, element: NodeId) {
        self.flush_text();
        self.tree.push_child(self.current, element);
        self.last_element = Some(element);
    }

    /// Adds the argument read so far to the pending element.
    /// Empty arguments (`''`) are skipped.
    pub(super) fn push_argument(&mut self) {
        if self.argument_buffer.is_empty() {
            return;
        }
        let attribute = Attribute::from_arg(&self.argument_buffer);
        self.argument_buffer.clear();
        if let Some(element) = self.pending_element
            && let Some(data) = self.tree.as_element_mut(element)
        {
            data.attrs.push(attribute);
        }
    }

    /// `]` seen: the pending element is complete and joins the tree.
    pub(super) fn finish_attributes(&mut self) {
        if let Some(element) = self.pending_element.take() {
            self.attach_element(element);
        }
        self.switch_to(TokenizerState::AfterAttributes);
    }

    /// `}` seen: the parent of the current container becomes current.
    pub(super) fn close_container(&mut self) {
        match self.tree.parent(self.current) {
            Some(parent) => self.current = parent,
            None => {
                self.record_issue(ParseIssueKind::UnmatchedCloseBrace, self.current_pos - 1);
            }
        }
    }

    /// End of input inside an argument list: everything from the `$` on is
    /// literal text.
    pub(super) fn unterminated_attributes(&mut self) {
        self.record_issue(ParseIssueKind::UnterminatedAttributes, self.element_start);
        self.pending_element = None;
        self.argument_buffer.clear();
        let rest = self.input[self.element_start..].to_string();
        self.text_buffer.push_str(&rest);
        self.reconsume_in(TokenizerState::Text);
    }
}

// =============================================================================
// Error Handling
// =============================================================================

impl Tokenizer {
    /// Records a recovered irregularity and reports it through the
    /// tagmark-common warning system.
    pub(super) fn record_issue(&mut self, kind: ParseIssueKind, offset: usize) {
        let _ = warn_once(
            "Tokenizer",
            &format!("{kind} at byte {offset} (in {} state)", self.state),
        );
        self.issues.push(ParseIssue { kind, offset });
    }
}
