//! The execute engine.
//!
//! [`execute`] walks a tree post-order and hands each element to the
//! [`TagFunction`] registered for its tag name in a [`FunctionTable`].
//! Unregistered tags pass through untouched. The first failing function
//! aborts the walk.

use std::collections::HashMap;
use std::fmt;

use tagmark_dom::{NodeId, Tree};
use tagmark_syntax::ParseError;
use thiserror::Error;

/// Failure reported by a single tag function.
#[derive(Debug, Error)]
pub enum TagError {
    /// `$ent[...]` named something that is not an entity.
    #[error("got unknown entity {0:?}")]
    InvalidEntity(String),

    /// A CSV body could not be read.
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Markup produced by a tag function failed to parse.
    #[error("markup error: {0}")]
    Markup(#[from] ParseError),

    /// A nested execution over a subtree failed.
    #[error(transparent)]
    Nested(Box<ExecuteError>),

    /// Any other failure, for caller-defined functions.
    #[error("{0}")]
    Custom(String),
}

impl TagError {
    /// Convenience constructor for [`TagError::Custom`].
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// Failure of an [`execute`] call.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// The function registered for `tag` failed.
    #[error("tag function for ${tag} failed: {source}")]
    TagFunction {
        /// Tag name of the element being transformed.
        tag: String,
        /// What the function reported.
        #[source]
        source: TagError,
    },
}

/// A transform applied to every element with a given tag name.
///
/// The function receives the whole tree and may rewrite `node`, its
/// subtree, or `node`'s place among its siblings (including removing
/// `node` itself).
pub trait TagFunction {
    /// Transform `node`.
    ///
    /// # Errors
    ///
    /// Any error aborts the enclosing [`execute`] call.
    fn apply(&self, tree: &mut Tree, node: NodeId) -> Result<(), TagError>;
}

impl<F> TagFunction for F
where
    F: Fn(&mut Tree, NodeId) -> Result<(), TagError>,
{
    fn apply(&self, tree: &mut Tree, node: NodeId) -> Result<(), TagError> {
        self(tree, node)
    }
}

/// Mapping from tag name to the function that transforms it.
///
/// Built explicitly by the caller and passed to [`execute`]; there is no
/// global registry.
#[derive(Default)]
pub struct FunctionTable {
    functions: HashMap<String, Box<dyn TagFunction>>,
}

impl FunctionTable {
    /// An empty table: every tag passes through.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FunctionTable::insert`].
    #[must_use]
    pub fn with(mut self, tag: impl Into<String>, function: impl TagFunction + 'static) -> Self {
        self.insert(tag, function);
        self
    }

    /// Register `function` for `tag`, replacing any earlier registration.
    pub fn insert(&mut self, tag: impl Into<String>, function: impl TagFunction + 'static) {
        let _ = self.functions.insert(tag.into(), Box::new(function));
    }

    /// The function registered for `tag`.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&dyn TagFunction> {
        self.functions.get(tag).map(Box::as_ref)
    }

    /// Whether `tag` has a function.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.functions.contains_key(tag)
    }

    /// Number of registered tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("FunctionTable").field("tags", &tags).finish()
    }
}

/// A table is itself a function: it executes the subtree at `node` with its
/// own registrations.
impl TagFunction for FunctionTable {
    fn apply(&self, tree: &mut Tree, node: NodeId) -> Result<(), TagError> {
        execute(tree, node, self).map_err(|err| TagError::Nested(Box::new(err)))
    }
}

/// Run the tag functions in `table` over `node` and its subtree.
///
/// Children are executed before their parent, in their original order.
/// The child list is captured before any child runs, so nodes a function
/// inserts are never visited, and a captured child that an earlier
/// sibling's function moved or removed is skipped.
///
/// # Errors
///
/// Returns [`ExecuteError::TagFunction`] for the first function that fails.
/// The tree is left as it was at that point.
pub fn execute(tree: &mut Tree, node: NodeId, table: &FunctionTable) -> Result<(), ExecuteError> {
    let mut stack = vec![Frame::new(tree, node)];
    while let Some(frame) = stack.last_mut() {
        if let Some(&child) = frame.children.get(frame.next) {
            frame.next += 1;
            if tree.parent(child) == Some(frame.node) {
                let child_frame = Frame::new(tree, child);
                stack.push(child_frame);
            }
            continue;
        }

        let node = frame.node;
        let _ = stack.pop();
        let Some(tag) = tree.tag_name(node).map(str::to_owned) else {
            continue;
        };
        if let Some(function) = table.get(&tag) {
            function
                .apply(tree, node)
                .map_err(|source| ExecuteError::TagFunction { tag, source })?;
        }
    }
    Ok(())
}

/// A node whose children are still being executed.
struct Frame {
    node: NodeId,
    /// Children as captured when the node was entered.
    children: Vec<NodeId>,
    next: usize,
}

impl Frame {
    fn new(tree: &Tree, node: NodeId) -> Self {
        Self {
            node,
            children: tree.children(node).to_vec(),
            next: 0,
        }
    }
}
