//! Tree back to markup source.
//!
//! Re-parsing the output of [`render`] yields the same tree, except that
//! argument quoting is normalized: quotes appear only where an argument
//! needs them. Text is written as-is; the markup has no escape syntax.

use tagmark_dom::{Attribute, NodeId, NodeType, Tree};

/// Render `id` and its subtree. The root renders as `$root{...}`.
#[must_use]
pub fn render(tree: &Tree, id: NodeId) -> String {
    let mut out = String::new();
    render_from(tree, vec![Step::Enter(id)], &mut out);
    out
}

/// Render only the children of `id`, concatenated, with no wrapping syntax.
#[must_use]
pub fn render_children(tree: &Tree, id: NodeId) -> String {
    let mut out = String::new();
    let steps = tree.children(id).iter().rev().map(|&child| Step::Enter(child)).collect();
    render_from(tree, steps, &mut out);
    out
}

/// A unit of pending output: open a node, or close one already opened.
enum Step {
    Enter(NodeId),
    Close,
}

/// Iterative, so deeply nested input cannot overflow the call stack.
fn render_from(tree: &Tree, mut stack: Vec<Step>, out: &mut String) {
    while let Some(step) = stack.pop() {
        let id = match step {
            Step::Close => {
                out.push('}');
                continue;
            }
            Step::Enter(id) => id,
        };
        let Some(node) = tree.get(id) else {
            continue;
        };
        match &node.node_type {
            NodeType::Text(text) | NodeType::Raw(text) => {
                out.push_str(text);
                continue;
            }
            NodeType::Root => out.push_str("$root"),
            NodeType::Element(data) => {
                out.push('$');
                out.push_str(&data.tag_name);
                if !data.attrs.is_empty() {
                    let args: Vec<String> = data.attrs.iter().map(render_attribute).collect();
                    out.push('[');
                    out.push_str(&args.join(" "));
                    out.push(']');

                    // Arguments and no children: no braces needed.
                    if node.children.is_empty() {
                        continue;
                    }
                }
            }
        }
        out.push('{');
        stack.push(Step::Close);
        stack.extend(node.children.iter().rev().map(|&child| Step::Enter(child)));
    }
}

/// `key`, `key=value`, or a quoted form when whitespace, quotes or `]`
/// would otherwise end the argument early.
fn render_attribute(attr: &Attribute) -> String {
    let Attribute { key, value } = attr;
    if needs_quoting(key) {
        if value.is_empty() {
            return quote(key);
        }
        return quote(&format!("{key}={value}"));
    }
    if value.is_empty() {
        key.clone()
    } else if needs_quoting(value) {
        format!("{key}={}", quote(value))
    } else {
        format!("{key}={value}")
    }
}

fn needs_quoting(s: &str) -> bool {
    s.chars()
        .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | ']'))
}

/// No escape exists inside quotes, so pick the quote character the text
/// doesn't contain. Text holding both quote characters cannot round-trip.
fn quote(s: &str) -> String {
    if s.contains('"') && !s.contains('\'') {
        format!("'{s}'")
    } else {
        format!("\"{s}\"")
    }
}
