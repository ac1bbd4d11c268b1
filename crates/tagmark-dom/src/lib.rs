//! Node tree for tagmark documents.
//!
//! This crate provides the arena-based tree that the tokenizer builds, tag
//! functions rewrite, and the renderers serialize.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Every
//! node records its parent and an ordered list of children; sibling links are
//! derived from the parent's child list, so a mutation only ever edits one
//! `Vec<NodeId>`.
//!
//! Removed nodes stay in the arena. They are unreachable from the root and are
//! dropped together with the tree.

/// A type-safe index into the tree.
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// A single `key` or `key=value` argument of an element.
///
/// An empty value is indistinguishable from no value at all: both render as
/// the bare key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub key: String,
    /// Attribute value; empty when the argument was a bare key.
    pub value: String,
}

impl Attribute {
    /// Create a `key=value` attribute.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a bare `key` attribute.
    pub fn bare(key: impl Into<String>) -> Self {
        Self::new(key, "")
    }

    /// Split a raw argument on its first `=` into key and value.
    ///
    /// `a=b=c` yields key `a` and value `b=c`; an argument without `=` is a
    /// bare key.
    #[must_use]
    pub fn from_arg(arg: &str) -> Self {
        match arg.split_once('=') {
            Some((key, value)) => Self::new(key, value),
            None => Self::bare(arg),
        }
    }

    /// Render back to the `key` / `key=value` argument form.
    #[must_use]
    pub fn to_arg(&self) -> String {
        if self.value.is_empty() {
            self.key.clone()
        } else {
            format!("{}={}", self.key, self.value)
        }
    }
}

/// A node in the tree.
///
/// This node stores its parent index and its ordered children.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is, with its payload.
    pub node_type: NodeType,

    /// The containing node, or `None` for the root and for detached nodes.
    pub parent: Option<NodeId>,

    /// Children in document order.
    pub children: Vec<NodeId>,
}

/// The kinds of node a tree can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// The single top-level container produced by every parse.
    Root,
    /// A named element with arguments and children.
    Element(ElementData),
    /// Literal text. Never has children.
    Text(String),
    /// An output fragment that renderers emit verbatim, without escaping.
    /// Never has children.
    Raw(String),
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// The element's name, the part after `$`.
    pub tag_name: String,
    /// Arguments in source order. Duplicate keys are kept.
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    /// Create element data with no attributes.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: Vec::new(),
        }
    }

    /// Value of the first attribute named `key`.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    /// The `i`-th argument as written: `key` or `key=value`.
    #[must_use]
    pub fn arg(&self, i: usize) -> Option<String> {
        self.attrs.get(i).map(Attribute::to_arg)
    }

    /// All arguments as `key` / `key=value` strings.
    #[must_use]
    pub fn args(&self) -> Vec<String> {
        self.attrs.iter().map(Attribute::to_arg).collect()
    }

    /// Overwrite the `i`-th argument with a bare key.
    ///
    /// # Panics
    ///
    /// Panics if there is no `i`-th argument.
    pub fn set_arg(&mut self, i: usize, key: impl Into<String>) {
        assert!(i < self.attrs.len(), "argument index {i} out of range");
        self.attrs[i] = Attribute::bare(key);
    }

    /// Returns the set of class names from the class attribute.
    #[must_use]
    pub fn classes(&self) -> Vec<&str> {
        self.attr("class")
            .map(|classes| classes.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Arena-based tree with O(1) node access.
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships. This provides:
/// - O(1) access to any node by `NodeId`
/// - O(1) parent traversal
/// - No borrowing issues (indices instead of references)
#[derive(Debug, Clone)]
pub struct Tree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The root node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a new tree with just the root node.
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            node_type: NodeType::Root,
            parent: None,
            children: Vec::new(),
        };
        Self { nodes: vec![root] }
    }

    /// Get the root node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of nodes in the arena, including detached ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty (never true: the root always exists).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a detached element with the given `(key, value)` attributes.
    pub fn new_element(&mut self, tag_name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut data = ElementData::new(tag_name);
        data.attrs = attrs
            .iter()
            .map(|&(key, value)| Attribute::new(key, value))
            .collect();
        self.alloc(NodeType::Element(data))
    }

    /// Allocate a detached text node.
    pub fn new_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Text(text.into()))
    }

    /// Allocate a detached raw output node.
    pub fn new_raw(&mut self, fragment: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Raw(fragment.into()))
    }

    // ========== structure ==========

    /// Appends `child` as the last child of `parent`.
    ///
    /// If `child` is currently attached somewhere it is detached first.
    ///
    /// # Panics
    ///
    /// Panics if `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Appends a freshly allocated, detached `child` to `parent` in O(1).
    ///
    /// Unlike [`Tree::append_child`] this does not detach `child` or check
    /// for cycles; builders that only ever attach new nodes use it.
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            child != parent && self.nodes[child.0].parent.is_none(),
            "push_child needs a detached node other than the parent"
        );
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Inserts `new_child` into `parent` immediately before `reference`, or
    /// at the end when `reference` is `None`.
    ///
    /// If `new_child` is currently attached somewhere it is detached first.
    ///
    /// # Panics
    ///
    /// Panics if `reference` is not a child of `parent`, or if `new_child` is
    /// `parent` or one of its ancestors.
    pub fn insert_before(&mut self, parent: NodeId, new_child: NodeId, reference: Option<NodeId>) {
        assert!(
            new_child != parent && !self.is_descendant_of(parent, new_child),
            "inserting {new_child:?} into {parent:?} would create a cycle"
        );
        self.detach(new_child);

        let children = &mut self.nodes[parent.0].children;
        let index = match reference {
            Some(reference) => children
                .iter()
                .position(|&c| c == reference)
                .unwrap_or_else(|| panic!("{reference:?} is not a child of {parent:?}")),
            None => children.len(),
        };
        children.insert(index, new_child);
        self.nodes[new_child.0].parent = Some(parent);
    }

    /// Removes `child` from `parent`. The child stays in the arena, detached.
    ///
    /// # Panics
    ///
    /// Panics if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        assert_eq!(
            self.parent(child),
            Some(parent),
            "{child:?} is not a child of {parent:?}"
        );
        self.detach(child);
    }

    /// Removes `id` from its parent, if it has one.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Removes all children of `id`.
    pub fn remove_all_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// Moves all of `src`'s children onto the end of `dst`'s children,
    /// leaving `src` childless.
    pub fn reparent(&mut self, dst: NodeId, src: NodeId) {
        let moved = std::mem::take(&mut self.nodes[src.0].children);
        for &child in &moved {
            self.nodes[child.0].parent = Some(dst);
        }
        self.nodes[dst.0].children.extend(moved);
    }

    /// Makes `dst` a copy of `src`: `dst` takes `src`'s kind and payload and
    /// all of `src`'s children, and loses its own. `dst` keeps its position in
    /// the tree; `src` is left childless.
    pub fn replace(&mut self, dst: NodeId, src: NodeId) {
        self.remove_all_children(dst);
        self.reparent(dst, src);
        let node_type = self.nodes[src.0].node_type.clone();
        self.nodes[dst.0].node_type = node_type;
    }

    /// Puts `new` where `old` is. With a parent this is an insert-before plus
    /// remove; a parentless `old` is rewritten in place via [`Tree::replace`].
    ///
    /// Returns the node that now occupies the position.
    pub fn replace_node(&mut self, old: NodeId, new: NodeId) -> NodeId {
        if let Some(parent) = self.parent(old) {
            self.insert_before(parent, new, Some(old));
            self.remove_child(parent, old);
            new
        } else {
            self.replace(old, new);
            old
        }
    }

    /// Deep-copies `id` and its subtree from `other` into this arena.
    /// Returns the detached copy.
    pub fn import(&mut self, other: &Self, id: NodeId) -> NodeId {
        let Some(node) = other.get(id) else {
            return self.alloc(NodeType::Text(String::new()));
        };
        let copy = self.alloc(node.node_type.clone());
        let mut pending = vec![(id, copy)];
        while let Some((source, target)) = pending.pop() {
            for &child in other.children(source) {
                let child_copy = self.alloc(other.nodes[child.0].node_type.clone());
                self.push_child(target, child_copy);
                pending.push((child, child_copy));
            }
        }
        copy
    }

    // ========== navigation ==========

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&c| c == id)?;
        siblings.get(index + 1).copied()
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&c| c == id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Collect `id` and all of its descendants, in document (pre-)order, for
    /// which `predicate` holds.
    pub fn select<F>(&self, id: NodeId, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Self, NodeId) -> bool,
    {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if predicate(self, current) {
                out.push(current);
            }
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Collect `id` and its descendants that are elements named `tag`.
    #[must_use]
    pub fn select_tag(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.select(id, |tree, n| tree.tag_name(n) == Some(tag))
    }

    // ========== payload ==========

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Tag name if this node is an element.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|e| e.tag_name.as_str())
    }

    /// Replace the payload of a text node.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a text node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        match &mut self.nodes[id.0].node_type {
            NodeType::Text(s) => *s = text.into(),
            other => panic!("set_text on a non-text node: {other:?}"),
        }
    }

    /// Renames an element and replaces its attributes with `attrs`.
    /// Children are kept.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not an element or `name` is empty.
    pub fn transform_element(&mut self, id: NodeId, name: &str, attrs: &[(&str, &str)]) {
        assert!(!name.is_empty(), "renaming an element to an empty name");
        let Some(data) = self.as_element_mut(id) else {
            panic!("transform_element on a non-element node {id:?}");
        };
        data.tag_name = name.to_string();
        data.attrs = attrs
            .iter()
            .map(|&(key, value)| Attribute::new(key, value))
            .collect();
    }

    /// Concatenated text of `id` and all of its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(text) = self.as_text(current) {
                out.push_str(text);
            } else {
                stack.extend(self.children(current).iter().rev());
            }
        }
        out
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a Tree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
