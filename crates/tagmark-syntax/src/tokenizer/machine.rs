use strum_macros::Display;
use tagmark_dom::{NodeId, Tree};

use super::error::{ParseError, ParseIssue, ParseIssueKind};

/// The tokenizer state machine.
///
/// `Text` is both the initial state and the state the machine is in when
/// the input runs out cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Plain content: accumulating literal text.
    Text,
    /// Just read a `$`.
    AfterDollar,
    /// Reading the name after `$`.
    FunctionName,
    /// Inside `[...]`, between arguments.
    BeforeAttributeName,
    /// Inside an unquoted run of an argument.
    AttributeNameUnquoted,
    /// Inside a `'...'` run of an argument.
    AttributeNameQuoteSingle,
    /// Inside a `"..."` run of an argument.
    AttributeNameQuoteDouble,
    /// Just read the `]` closing an argument list.
    AfterAttributes,
}

/// Builds a [`Tree`] from markup source.
///
/// State only lives for one parse: create a tokenizer per input.
pub struct Tokenizer {
    pub(super) state: TokenizerState,
    pub(super) input: String,
    pub(super) current_pos: usize,
    pub(super) current_input_character: Option<char>,
    pub(super) at_eof: bool,
    // When true, the next iteration of the main loop will not consume a new character.
    // "Reconsume in the X state" sets this flag.
    pub(super) reconsume: bool,

    pub(super) tree: Tree,
    /// The container new nodes are appended to.
    pub(super) current: NodeId,
    /// Literal text not yet turned into a text node.
    pub(super) text_buffer: String,
    pub(super) function_name: String,
    pub(super) argument_buffer: String,
    /// Element whose argument list is being read. Attached once `]` is seen.
    pub(super) pending_element: Option<NodeId>,
    /// The most recently attached element; a following `{` opens it.
    pub(super) last_element: Option<NodeId>,
    /// Byte offset of the `$` that started the element being read.
    pub(super) element_start: usize,

    pub(super) issues: Vec<ParseIssue>,
}

impl Tokenizer {
    /// Create a new tokenizer for the given input.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            state: TokenizerState::Text,
            input: input.into(),
            current_pos: 0,
            current_input_character: None,
            at_eof: false,
            reconsume: false,
            tree: Tree::new(),
            current: NodeId::ROOT,
            text_buffer: String::new(),
            function_name: String::new(),
            argument_buffer: String::new(),
            pending_element: None,
            last_element: None,
            element_start: 0,
            issues: Vec::new(),
        }
    }

    /// Issues recovered from so far.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Consume the tokenizer and return the tree.
    /// Call this after [`Tokenizer::run`].
    #[must_use]
    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Content: text, `$` element starts, and `}` closing the current container.
    fn handle_text_state(&mut self) {
        match self.current_input_character {
            Some('$') => {
                self.element_start = self.current_pos - 1;
                self.switch_to(TokenizerState::AfterDollar);
            }
            Some('}') => {
                self.flush_text();
                self.close_container();
            }
            Some(c) => self.text_buffer.push(c),
            None => {
                self.flush_text();
                if self.current != NodeId::ROOT {
                    self.record_issue(ParseIssueKind::UnclosedContainer, self.current_pos);
                }
                self.at_eof = true;
            }
        }
    }

    /// Decides whether the `$` just read starts an element.
    fn handle_after_dollar_state(&mut self) -> Result<(), ParseError> {
        match self.current_input_character {
            // $1.00, $-1, $ 5: currency and numbers stay text.
            Some(c) if Self::is_literal_after_dollar(c) => {
                self.text_buffer.push('$');
                self.text_buffer.push(c);
                self.switch_to(TokenizerState::Text);
            }
            Some('{') => {
                return Err(ParseError::MissingFunctionName {
                    offset: self.element_start,
                });
            }
            Some('[') => {
                self.record_issue(ParseIssueKind::DollarBracket, self.element_start);
                self.text_buffer.push_str("$[");
                self.switch_to(TokenizerState::Text);
            }
            // `$$` and `$}`: this `$` is text, the next character is content.
            Some('$' | '}') | None => {
                self.text_buffer.push('$');
                self.reconsume_in(TokenizerState::Text);
            }
            Some(c) => {
                self.function_name.clear();
                self.function_name.push(c);
                self.switch_to(TokenizerState::FunctionName);
            }
        }
        Ok(())
    }

    fn handle_function_name_state(&mut self) {
        match self.current_input_character {
            Some('[') => {
                let element = self.tree.new_element(&self.function_name, &[]);
                self.pending_element = Some(element);
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('{') => {
                let element = self.attach_new_element();
                self.current = element;
                self.switch_to(TokenizerState::Text);
            }
            // `$foo` followed by whitespace, `$` or the end: an empty element.
            Some('$') | None => {
                let _ = self.attach_new_element();
                self.reconsume_in(TokenizerState::Text);
            }
            Some(c) if Self::is_whitespace_char(c) => {
                let _ = self.attach_new_element();
                self.reconsume_in(TokenizerState::Text);
            }
            Some(c) => self.function_name.push(c),
        }
    }

    fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(']') => self.finish_attributes(),
            Some('\'') => self.switch_to(TokenizerState::AttributeNameQuoteSingle),
            Some('"') => self.switch_to(TokenizerState::AttributeNameQuoteDouble),
            Some(c) => {
                self.argument_buffer.push(c);
                self.switch_to(TokenizerState::AttributeNameUnquoted);
            }
            None => self.unterminated_attributes(),
        }
    }

    fn handle_attribute_name_unquoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.push_argument();
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some(']') => {
                self.push_argument();
                self.finish_attributes();
            }
            Some('\'') => self.switch_to(TokenizerState::AttributeNameQuoteSingle),
            Some('"') => self.switch_to(TokenizerState::AttributeNameQuoteDouble),
            Some(c) => self.argument_buffer.push(c),
            None => self.unterminated_attributes(),
        }
    }

    /// Quoted runs have no escape: the first matching quote ends the run.
    fn handle_attribute_name_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AttributeNameUnquoted),
            Some(c) => self.argument_buffer.push(c),
            None => self.unterminated_attributes(),
        }
    }

    /// Only a `{` directly after `]` opens a body.
    fn handle_after_attributes_state(&mut self) {
        match (self.current_input_character, self.last_element) {
            (Some('{'), Some(element)) => {
                self.current = element;
                self.switch_to(TokenizerState::Text);
            }
            _ => self.reconsume_in(TokenizerState::Text),
        }
    }

    /// Run the state machine over the whole input.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingFunctionName`] on `${`.
    pub fn run(&mut self) -> Result<(), ParseError> {
        while !self.at_eof {
            // Each state begins by consuming the next input character,
            // unless we're reconsuming from a previous state transition.
            if self.reconsume {
                self.reconsume = false;
            } else {
                self.current_input_character = self.consume();
            }

            match self.state {
                TokenizerState::Text => self.handle_text_state(),
                TokenizerState::AfterDollar => self.handle_after_dollar_state()?,
                TokenizerState::FunctionName => self.handle_function_name_state(),
                TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
                TokenizerState::AttributeNameUnquoted => {
                    self.handle_attribute_name_unquoted_state();
                }
                TokenizerState::AttributeNameQuoteSingle => {
                    self.handle_attribute_name_quoted_state('\'');
                }
                TokenizerState::AttributeNameQuoteDouble => {
                    self.handle_attribute_name_quoted_state('"');
                }
                TokenizerState::AfterAttributes => self.handle_after_attributes_state(),
            }
        }
        Ok(())
    }
}

/// Parse markup source into a tree.
///
/// Malformed or truncated input never fails: unconsumed source becomes
/// literal text and the irregularity is reported as a warning.
///
/// # Errors
///
/// Returns [`ParseError::MissingFunctionName`] if the source contains `${`
/// where a function name was expected.
pub fn parse(input: &str) -> Result<Tree, ParseError> {
    let mut tokenizer = Tokenizer::new(input);
    tokenizer.run()?;
    Ok(tokenizer.into_tree())
}
