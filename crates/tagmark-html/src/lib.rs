//! HTML serialization for tagmark trees.
//!
//! By the time a tree reaches this crate every functional tag has been
//! rewritten by the execute engine, so serialization is purely structural:
//! the root and every element become start and end tags with their
//! arguments copied through as attributes, text is escaped, and raw nodes are
//! written verbatim.
//!
//! # Scope
//!
//! - Void elements (`br`, `img`, ...) are written as `<br/>` with no end tag
//! - Tag and attribute names are checked, not escaped; a name holding
//!   whitespace, quotes, `<`, `>`, `/`, `=` or a control character is an error
//! - Text inside raw text elements (`script`, `style`, ...) is not escaped
//! - No validation of HTML content models

use std::str::FromStr;

use strum_macros::{Display, EnumString};
use tagmark_dom::{ElementData, NodeId, NodeType, Tree};
use thiserror::Error;

/// Errors produced while serializing a tree to HTML.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HtmlError {
    /// A void element cannot hold content.
    #[error("void element <{tag}> has child nodes")]
    VoidElementHasChildren {
        /// The offending element's name.
        tag: String,
    },

    /// An element name that cannot be written as an HTML tag.
    #[error("invalid tag name {tag:?}")]
    InvalidTagName {
        /// The offending element's name.
        tag: String,
    },

    /// An argument key that cannot be written as an HTML attribute name.
    #[error("invalid attribute name {key:?} on <{tag}>")]
    InvalidAttributeName {
        /// The element carrying the argument.
        tag: String,
        /// The offending key.
        key: String,
    },
}

/// Elements that never have an end tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum VoidElement {
    /// `<area>`
    Area,
    /// `<base>`
    Base,
    /// `<br>`
    Br,
    /// `<col>`
    Col,
    /// `<embed>`
    Embed,
    /// `<hr>`
    Hr,
    /// `<img>`
    Img,
    /// `<input>`
    Input,
    /// `<keygen>`
    Keygen,
    /// `<link>`
    Link,
    /// `<meta>`
    Meta,
    /// `<param>`
    Param,
    /// `<source>`
    Source,
    /// `<track>`
    Track,
    /// `<wbr>`
    Wbr,
}

/// Elements whose text content is written without escaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RawTextElement {
    /// `<iframe>`
    Iframe,
    /// `<noembed>`
    Noembed,
    /// `<noframes>`
    Noframes,
    /// `<plaintext>`
    Plaintext,
    /// `<script>`
    Script,
    /// `<style>`
    Style,
    /// `<xmp>`
    Xmp,
}

/// Serialize `id` and its subtree to HTML. The root is written as
/// `<root>...</root>`.
///
/// # Errors
///
/// Returns [`HtmlError::VoidElementHasChildren`] if a void element has
/// children, and [`HtmlError::InvalidTagName`] or
/// [`HtmlError::InvalidAttributeName`] for names HTML cannot carry.
pub fn render_html(tree: &Tree, id: NodeId) -> Result<String, HtmlError> {
    let mut out = String::new();
    render_from(tree, vec![Step::Enter(id)], &mut out)?;
    Ok(out)
}

/// Serialize only the children of `id`.
///
/// # Errors
///
/// Same as [`render_html`].
pub fn render_html_children(tree: &Tree, id: NodeId) -> Result<String, HtmlError> {
    let mut out = String::new();
    let steps = tree.children(id).iter().rev().map(|&child| Step::Enter(child)).collect();
    render_from(tree, steps, &mut out)?;
    Ok(out)
}

/// Pending output: a node to open, or the end tag of one already opened.
enum Step<'a> {
    Enter(NodeId),
    Close(&'a str),
}

/// Walks with an explicit stack; nesting depth never reaches the call stack.
fn render_from<'a>(tree: &'a Tree, mut stack: Vec<Step<'a>>, out: &mut String) -> Result<(), HtmlError> {
    while let Some(step) = stack.pop() {
        let id = match step {
            Step::Close(tag) => {
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
                continue;
            }
            Step::Enter(id) => id,
        };
        let Some(node) = tree.get(id) else {
            continue;
        };
        let tag = match &node.node_type {
            NodeType::Text(text) => {
                let raw_parent = node
                    .parent
                    .and_then(|p| tree.tag_name(p))
                    .is_some_and(|tag| RawTextElement::from_str(tag).is_ok());
                if raw_parent {
                    out.push_str(text);
                } else {
                    escape_into(text, out);
                }
                continue;
            }
            NodeType::Raw(fragment) => {
                out.push_str(fragment);
                continue;
            }
            NodeType::Root => {
                out.push_str("<root>");
                "root"
            }
            NodeType::Element(data) => {
                if !open_element(tree, data, &node.children, out)? {
                    continue;
                }
                data.tag_name.as_str()
            }
        };
        stack.push(Step::Close(tag));
        stack.extend(node.children.iter().rev().map(|&child| Step::Enter(child)));
    }
    Ok(())
}

/// Writes the start tag. Returns `false` for a void element, which is
/// already complete.
fn open_element(
    tree: &Tree,
    data: &ElementData,
    children: &[NodeId],
    out: &mut String,
) -> Result<bool, HtmlError> {
    let tag = data.tag_name.as_str();
    if !is_valid_name(tag) {
        return Err(HtmlError::InvalidTagName {
            tag: tag.to_string(),
        });
    }
    out.push('<');
    out.push_str(tag);
    for attr in &data.attrs {
        if !is_valid_name(&attr.key) {
            return Err(HtmlError::InvalidAttributeName {
                tag: tag.to_string(),
                key: attr.key.clone(),
            });
        }
        out.push(' ');
        out.push_str(&attr.key);
        out.push_str("=\"");
        escape_into(&attr.value, out);
        out.push('"');
    }

    if VoidElement::from_str(tag).is_ok() {
        if !children.is_empty() {
            return Err(HtmlError::VoidElementHasChildren {
                tag: tag.to_string(),
            });
        }
        out.push_str("/>");
        return Ok(false);
    }
    out.push('>');

    // Parsers drop a newline directly after these start tags; write an
    // extra one so a leading newline in the content survives.
    if matches!(tag, "pre" | "listing" | "textarea")
        && let Some(&first) = children.first()
        && tree.as_text(first).is_some_and(|t| t.starts_with('\n'))
    {
        out.push('\n');
    }
    Ok(true)
}

/// Whether `name` can stand as a tag or attribute name without ending the
/// tag or the name early.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}

/// Escape text and attribute values: `&'<>"` and carriage return.
fn escape_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
}
