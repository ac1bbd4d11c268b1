use tagmark_dom::{NodeId, Tree};

use crate::engine::{TagError, TagFunction};

/// Rewrites an element's tag name and drops its arguments, optionally
/// setting a single `class`. Children are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    tag: String,
    class: Option<String>,
}

/// `$h{...}` to `<h1>...</h1>` style renames.
///
/// Applying it panics if `tag` is empty.
#[must_use]
pub fn rename(tag: impl Into<String>) -> Rename {
    Rename {
        tag: tag.into(),
        class: None,
    }
}

/// Like [`rename`], and the result carries `class=<class>` as its only
/// attribute.
#[must_use]
pub fn rename_with_class(tag: impl Into<String>, class: impl Into<String>) -> Rename {
    Rename {
        tag: tag.into(),
        class: Some(class.into()),
    }
}

impl TagFunction for Rename {
    fn apply(&self, tree: &mut Tree, node: NodeId) -> Result<(), TagError> {
        match &self.class {
            Some(class) => tree.transform_element(node, &self.tag, &[("class", class.as_str())]),
            None => tree.transform_element(node, &self.tag, &[]),
        }
        Ok(())
    }
}
