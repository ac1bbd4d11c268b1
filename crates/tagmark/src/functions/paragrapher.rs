//! Paragraph splitting.
//!
//! A splittable container such as `$p{...}` is rewritten into one sibling
//! container per run of content, where runs are separated by a blank line
//! (`"\n\n"`) inside a text child. Block-level children cannot live inside a
//! paragraph, so they are hoisted out and become siblings in their own
//! right, ending the paragraph before them:
//!
//! ```text
//! $p{one\n\ntwo $pre{code} three}
//!   =>  $p{one} $p{two} $pre{code} $p{three}
//! ```
//!
//! Whitespace around each split is trimmed, so any run of blank lines is a
//! single boundary, and a paragraph with nothing but whitespace is never
//! produced.

use std::str::FromStr;

use strum_macros::EnumString;
use tagmark_dom::{Attribute, NodeId, NodeType, Tree};

use crate::engine::{TagError, TagFunction};

/// Whitespace trimmed around a paragraph split.
const SPLIT_WHITESPACE: [char; 4] = [' ', '\t', '\n', '\r'];

/// Decides whether a child of a splittable container is block-level.
pub type BlockClassifier = dyn Fn(&Tree, NodeId) -> bool;

/// Tags that always stay inside a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
enum InlineTag {
    A,
    Abbr,
    B,
    Bdi,
    Bdo,
    Br,
    Cite,
    Code,
    Data,
    Dfn,
    Em,
    I,
    Img,
    Kbd,
    Mark,
    Q,
    S,
    Samp,
    Small,
    Span,
    Strong,
    Sub,
    Sup,
    Time,
    U,
    Var,
    Wbr,
}

/// Tags that are always hoisted out of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
enum BlockTag {
    Article,
    Aside,
    Blockquote,
    Dd,
    Div,
    Dl,
    Dt,
    Figure,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Hr,
    Li,
    Ol,
    P,
    Pre,
    Root,
    Section,
    Table,
    Tbody,
    Td,
    Tfoot,
    Th,
    Thead,
    Tr,
    Ul,
}

/// The default block/inline classification.
///
/// Known inline tags (`a`, `b`, `em`, `span`, ...) are inline and known
/// block tags (headings, lists, tables, `pre`, `blockquote`, `div`, `p`)
/// are block. An unknown element is inline if it has no children or a
/// single text child, and block otherwise. Text and raw nodes are inline.
#[must_use]
pub fn is_block_default(tree: &Tree, id: NodeId) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };
    let tag = match &node.node_type {
        NodeType::Root => return true,
        NodeType::Text(_) | NodeType::Raw(_) => return false,
        NodeType::Element(data) => data.tag_name.as_str(),
    };
    if InlineTag::from_str(tag).is_ok() {
        return false;
    }
    if BlockTag::from_str(tag).is_ok() {
        return true;
    }
    match node.children.as_slice() {
        [] => false,
        [only] => tree.as_text(*only).is_none(),
        _ => true,
    }
}

/// Settings for [`Paragrapher`].
pub struct ParagrapherConfig {
    /// Tag names of the containers to split.
    pub tags: Vec<String>,
    /// Tag for the paragraphs made when splitting the document root.
    pub create_tag: String,
    /// Block/inline classification of container children.
    pub classifier: Box<BlockClassifier>,
}

impl Default for ParagrapherConfig {
    fn default() -> Self {
        Self {
            tags: vec!["p".to_string()],
            create_tag: "p".to_string(),
            classifier: Box::new(is_block_default),
        }
    }
}

/// Splits paragraph containers on blank lines. See the module docs.
///
/// Applied to a node, it splits every configured container in that node's
/// subtree, the node itself included. Containers are collected before any
/// rewriting starts.
#[derive(Default)]
pub struct Paragrapher {
    config: ParagrapherConfig,
}

impl Paragrapher {
    /// Splits `p` containers with the default classifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A splitter with custom settings.
    #[must_use]
    pub const fn with_config(config: ParagrapherConfig) -> Self {
        Self { config }
    }

    /// Splits the root's own children into paragraphs of
    /// [`ParagrapherConfig::create_tag`], in place. Block children stay
    /// where they are.
    pub fn split_document(&self, tree: &mut Tree) {
        self.split(tree, NodeId::ROOT);
    }

    /// Splits a single container.
    ///
    /// A container with a parent is replaced by its paragraphs and hoisted
    /// blocks. A parentless one (the root, or a detached element) keeps its
    /// place and has its children rewritten instead.
    pub fn split(&self, tree: &mut Tree, container: NodeId) {
        let (tag, attrs) = match tree.as_element(container) {
            Some(data) => (data.tag_name.clone(), data.attrs.clone()),
            None => (self.config.create_tag.clone(), Vec::new()),
        };
        let parent = tree.parent(container);
        let paragraph = new_paragraph(tree, &tag, &attrs);
        let mut split = Split {
            tree,
            container,
            parent,
            tag,
            attrs,
            paragraph,
        };
        split.run(&*self.config.classifier);
    }
}

impl TagFunction for Paragrapher {
    fn apply(&self, tree: &mut Tree, node: NodeId) -> Result<(), TagError> {
        for tag in &self.config.tags {
            for container in tree.select_tag(node, tag) {
                self.split(tree, container);
            }
        }
        Ok(())
    }
}

fn new_paragraph(tree: &mut Tree, tag: &str, attrs: &[Attribute]) -> NodeId {
    let paragraph = tree.new_element(tag, &[]);
    if let Some(data) = tree.as_element_mut(paragraph) {
        data.attrs = attrs.to_vec();
    }
    paragraph
}

/// State of one container's rewrite.
struct Split<'a> {
    tree: &'a mut Tree,
    container: NodeId,
    parent: Option<NodeId>,
    tag: String,
    attrs: Vec<Attribute>,
    /// The paragraph being accumulated. Detached until flushed.
    paragraph: NodeId,
}

impl Split<'_> {
    fn run(&mut self, is_block: &BlockClassifier) {
        // `next` is read before `current` moves out of the container.
        let mut current = self.tree.first_child(self.container);
        while let Some(node) = current {
            current = self.tree.next_sibling(node);

            if is_block(self.tree, node) {
                self.flush(Some(node));
                if self.parent.is_some() {
                    self.place(node, None);
                }
                continue;
            }
            if self.tree.as_text(node).is_some() {
                self.split_text(node);
            } else {
                self.tree.append_child(self.paragraph, node);
            }
        }
        self.flush(None);

        if let Some(parent) = self.parent {
            self.tree.remove_child(parent, self.container);
        }
    }

    /// Consume a text child, emitting a paragraph at every blank line.
    fn split_text(&mut self, node: NodeId) {
        loop {
            let text = self.tree.as_text(node).unwrap_or_default().to_string();
            if text.is_empty() {
                self.tree.detach(node);
                return;
            }
            let Some(index) = text.find("\n\n") else {
                self.tree.append_child(self.paragraph, node);
                return;
            };

            let head = text[..index].trim_end_matches(SPLIT_WHITESPACE);
            if !head.is_empty() {
                let head = self.tree.new_text(head);
                self.tree.append_child(self.paragraph, head);
            }
            self.flush(Some(node));
            let tail = text[index + 2..].trim_start_matches(SPLIT_WHITESPACE);
            self.tree.set_text(node, tail);
        }
    }

    /// Emit the accumulated paragraph if it has content and start a new one.
    /// `before` is the child it precedes when splitting in place.
    fn flush(&mut self, before: Option<NodeId>) {
        if !self.has_content() {
            self.tree.remove_all_children(self.paragraph);
            return;
        }
        self.place(self.paragraph, before);
        self.paragraph = new_paragraph(self.tree, &self.tag, &self.attrs);
    }

    /// Put an output node before the container, or before `before` inside
    /// it when the container has no parent.
    fn place(&mut self, node: NodeId, before: Option<NodeId>) {
        match self.parent {
            Some(parent) => self.tree.insert_before(parent, node, Some(self.container)),
            None => self.tree.insert_before(self.container, node, before),
        }
    }

    fn has_content(&self) -> bool {
        self.tree
            .children(self.paragraph)
            .iter()
            .any(|&child| match self.tree.as_text(child) {
                Some(text) => !text.trim().is_empty(),
                None => true,
            })
    }
}
