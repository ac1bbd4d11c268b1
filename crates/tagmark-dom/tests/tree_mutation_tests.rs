//! Tests for tree mutation methods: remove_child, insert_before, reparent, replace.

use tagmark_dom::{Attribute, NodeId, NodeType, Tree};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut Tree, tag: &str) -> NodeId {
    tree.new_element(tag, &[])
}

/// Helper to build `root > div > [a, b, c]` and return `(div, [a, b, c])`.
fn three_children(tree: &mut Tree) -> (NodeId, [NodeId; 3]) {
    let parent = alloc_element(tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let a = alloc_element(tree, "a");
    let b = alloc_element(tree, "b");
    let c = alloc_element(tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);
    (parent, [a, b, c])
}

#[test]
fn test_new_tree_has_root_only() {
    let tree = Tree::new();
    assert_eq!(tree.len(), 1);
    assert!(matches!(
        tree.get(NodeId::ROOT).map(|n| &n.node_type),
        Some(NodeType::Root)
    ));
    assert_eq!(tree.parent(NodeId::ROOT), None);
}

// ========== append_child ==========

#[test]
fn test_append_child_links_parent_and_siblings() {
    let mut tree = Tree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.parent(b), Some(parent));
    assert_eq!(tree.first_child(parent), Some(a));
    assert_eq!(tree.last_child(parent), Some(c));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(c), Some(b));
    assert_eq!(tree.prev_sibling(a), None);
    assert_eq!(tree.next_sibling(c), None);
}

#[test]
fn test_append_child_moves_attached_node() {
    let mut tree = Tree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);
    let other = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, other);

    tree.append_child(other, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.children(other), &[b]);
    assert_eq!(tree.parent(b), Some(other));
}

#[test]
#[should_panic(expected = "cycle")]
fn test_append_ancestor_panics() {
    let mut tree = Tree::new();
    let (parent, [a, _, _]) = three_children(&mut tree);
    tree.append_child(a, parent);
}

// ========== remove_child ==========

#[test]
fn test_remove_child_first_of_three() {
    let mut tree = Tree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);

    tree.remove_child(parent, a);

    assert_eq!(tree.children(parent), &[b, c]);
    assert_eq!(tree.prev_sibling(b), None);
    assert_eq!(tree.parent(a), None);
    assert_eq!(tree.next_sibling(a), None);
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = Tree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
#[should_panic(expected = "is not a child of")]
fn test_remove_child_of_wrong_parent_panics() {
    let mut tree = Tree::new();
    let (_, [a, b, _]) = three_children(&mut tree);
    tree.remove_child(a, b);
}

#[test]
fn test_remove_all_children() {
    let mut tree = Tree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);

    tree.remove_all_children(parent);

    assert!(tree.children(parent).is_empty());
    for id in [a, b, c] {
        assert_eq!(tree.parent(id), None);
    }
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = Tree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let existing = alloc_element(&mut tree, "b");
    tree.append_child(parent, existing);

    let new_child = alloc_element(&mut tree, "a");
    tree.insert_before(parent, new_child, Some(existing));

    assert_eq!(tree.children(parent), &[new_child, existing]);
    assert_eq!(tree.parent(new_child), Some(parent));
    assert_eq!(tree.prev_sibling(existing), Some(new_child));
}

#[test]
fn test_insert_before_none_appends() {
    let mut tree = Tree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);
    let d = alloc_element(&mut tree, "d");

    tree.insert_before(parent, d, None);

    assert_eq!(tree.children(parent), &[a, b, c, d]);
}

#[test]
fn test_insert_before_reorders_existing_child() {
    let mut tree = Tree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);

    tree.insert_before(parent, c, Some(a));

    assert_eq!(tree.children(parent), &[c, a, b]);
}

// ========== reparent ==========

#[test]
fn test_reparent_appends_to_existing() {
    let mut tree = Tree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);

    let existing = alloc_element(&mut tree, "x");
    tree.append_child(to, existing);
    let moved = alloc_element(&mut tree, "y");
    let moved_too = tree.new_text("z");
    tree.append_child(from, moved);
    tree.append_child(from, moved_too);

    tree.reparent(to, from);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, moved, moved_too]);
    assert_eq!(tree.parent(moved_too), Some(to));
}

#[test]
fn test_reparent_empty_source() {
    let mut tree = Tree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "span");

    tree.reparent(to, from);

    assert!(tree.children(from).is_empty());
    assert!(tree.children(to).is_empty());
}

// ========== replace ==========

#[test]
fn test_replace_node_with_parent() {
    let mut tree = Tree::new();
    let (parent, [a, b, c]) = three_children(&mut tree);
    let raw = tree.new_raw("&amp;");

    let at = tree.replace_node(b, raw);

    assert_eq!(at, raw);
    assert_eq!(tree.children(parent), &[a, raw, c]);
    assert_eq!(tree.parent(b), None);
}

#[test]
fn test_replace_node_without_parent_rewrites_in_place() {
    let mut tree = Tree::new();
    let lone = alloc_element(&mut tree, "link");
    let old_child = tree.new_text("old");
    tree.append_child(lone, old_child);

    let table = alloc_element(&mut tree, "table");
    let row = alloc_element(&mut tree, "tr");
    tree.append_child(table, row);

    let at = tree.replace_node(lone, table);

    assert_eq!(at, lone);
    assert_eq!(tree.tag_name(lone), Some("table"));
    assert_eq!(tree.children(lone), &[row]);
    assert_eq!(tree.parent(row), Some(lone));
    assert_eq!(tree.parent(old_child), None);
}

// ========== payload helpers ==========

#[test]
fn test_transform_element_keeps_children() {
    let mut tree = Tree::new();
    let (parent, children) = three_children(&mut tree);

    tree.transform_element(parent, "section", &[("class", "foo")]);

    let data = tree.as_element(parent).expect("element");
    assert_eq!(data.tag_name, "section");
    assert_eq!(data.attrs, vec![Attribute::new("class", "foo")]);
    assert_eq!(tree.children(parent), &children);
}

#[test]
#[should_panic(expected = "non-element")]
fn test_transform_text_node_panics() {
    let mut tree = Tree::new();
    let text = tree.new_text("x");
    tree.transform_element(text, "p", &[]);
}

#[test]
#[should_panic(expected = "empty name")]
fn test_transform_to_empty_name_panics() {
    let mut tree = Tree::new();
    let p = alloc_element(&mut tree, "p");
    tree.transform_element(p, "", &[]);
}

#[test]
fn test_arguments() {
    let mut tree = Tree::new();
    let id = tree.new_element("echo", &[("1", ""), ("class", "mega bold"), ("k", "a=b")]);
    let data = tree.as_element_mut(id).expect("element");

    assert_eq!(data.arg(0).as_deref(), Some("1"));
    assert_eq!(data.arg(1).as_deref(), Some("class=mega bold"));
    assert_eq!(data.arg(3), None);
    assert_eq!(data.attr("k"), Some("a=b"));
    assert_eq!(data.attr("missing"), None);
    assert_eq!(data.classes(), vec!["mega", "bold"]);

    data.set_arg(1, "plain");
    assert_eq!(data.args(), vec!["1", "plain", "k=a=b"]);
}

#[test]
fn test_classes_split_on_any_whitespace() {
    let mut tree = Tree::new();
    let spaced = tree.new_element("p", &[("class", "  lead\tnote\n wide ")]);
    let empty = tree.new_element("p", &[("class", "")]);
    let none = tree.new_element("p", &[("id", "x")]);

    let classes = |id| tree.as_element(id).expect("element").classes();
    assert_eq!(classes(spaced), vec!["lead", "note", "wide"]);
    assert!(classes(empty).is_empty());
    assert!(classes(none).is_empty());
}

#[test]
fn test_attribute_from_arg_splits_on_first_equals() {
    assert_eq!(Attribute::from_arg("a=b=c"), Attribute::new("a", "b=c"));
    assert_eq!(Attribute::from_arg("bare"), Attribute::bare("bare"));
    assert_eq!(Attribute::from_arg("k="), Attribute::bare("k"));
}

#[test]
fn test_select_is_preorder_and_includes_start() {
    let mut tree = Tree::new();
    let outer = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, outer);
    let inner = alloc_element(&mut tree, "p");
    let other = alloc_element(&mut tree, "b");
    let deepest = alloc_element(&mut tree, "p");
    tree.append_child(outer, inner);
    tree.append_child(outer, other);
    tree.append_child(inner, deepest);

    assert_eq!(tree.select_tag(outer, "p"), vec![outer, inner, deepest]);
    assert_eq!(tree.select_tag(NodeId::ROOT, "b"), vec![other]);
}

#[test]
fn test_text_content_concatenates_descendants() {
    let mut tree = Tree::new();
    let b = alloc_element(&mut tree, "b");
    let before = tree.new_text("bold ");
    let i = alloc_element(&mut tree, "i");
    let inner = tree.new_text("italic");
    tree.append_child(NodeId::ROOT, b);
    tree.append_child(b, before);
    tree.append_child(b, i);
    tree.append_child(i, inner);

    assert_eq!(tree.text_content(NodeId::ROOT), "bold italic");
    assert_eq!(tree.text_content(inner), "italic");
}

#[test]
fn test_import_deep_copies_from_another_tree() {
    let mut source = Tree::new();
    let b = source.new_element("b", &[("class", "big")]);
    let text = source.new_text("3");
    source.append_child(NodeId::ROOT, b);
    source.append_child(b, text);

    let mut tree = Tree::new();
    let cell = alloc_element(&mut tree, "td");
    tree.append_child(NodeId::ROOT, cell);
    let copy = tree.import(&source, b);
    tree.append_child(cell, copy);

    assert_eq!(tree.parent(copy), Some(cell));
    assert_eq!(tree.as_element(copy), source.as_element(b));
    assert_eq!(tree.text_content(cell), "3");
    // The source is untouched.
    assert_eq!(source.children(b), &[text]);
}

#[test]
fn test_push_child_appends_in_order() {
    let mut tree = Tree::new();
    let a = alloc_element(&mut tree, "a");
    let b = tree.new_text("b");
    tree.push_child(NodeId::ROOT, a);
    tree.push_child(NodeId::ROOT, b);

    assert_eq!(tree.children(NodeId::ROOT), &[a, b]);
    assert_eq!(tree.parent(b), Some(NodeId::ROOT));
    assert_eq!(tree.next_sibling(a), Some(b));
}

/// Helper to build a chain of `depth` nested elements ending in a text leaf
fn deep_chain(tree: &mut Tree, depth: usize) -> NodeId {
    let mut current = NodeId::ROOT;
    for _ in 0..depth {
        let next = alloc_element(tree, "a");
        tree.push_child(current, next);
        current = next;
    }
    let leaf = tree.new_text("leaf");
    tree.push_child(current, leaf);
    leaf
}

#[test]
fn test_deep_trees_do_not_exhaust_the_stack() {
    let mut source = Tree::new();
    let leaf = deep_chain(&mut source, 100_000);
    assert_eq!(source.ancestors(leaf).count(), 100_001);
    assert_eq!(source.text_content(NodeId::ROOT), "leaf");

    let mut tree = Tree::new();
    let first = source.children(NodeId::ROOT)[0];
    let copy = tree.import(&source, first);
    tree.append_child(NodeId::ROOT, copy);
    assert_eq!(tree.len(), source.len());
    assert_eq!(tree.text_content(NodeId::ROOT), "leaf");
}
