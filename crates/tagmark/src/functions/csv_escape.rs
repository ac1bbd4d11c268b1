use tagmark_dom::{NodeId, Tree};

use crate::engine::{TagError, TagFunction};

/// Replaces the element with its text children encoded as a single CSV
/// field, so markup output can be embedded in a `csvtable` body.
///
/// Only direct text children count; nested elements are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvEscape;

impl TagFunction for CsvEscape {
    fn apply(&self, tree: &mut Tree, node: NodeId) -> Result<(), TagError> {
        let raw: String = tree
            .children(node)
            .iter()
            .filter_map(|&child| tree.as_text(child))
            .collect();
        let text = tree.new_text(escape_csv_field(&raw));
        let _ = tree.replace_node(node, text);
        Ok(())
    }
}

/// Quote `field` if it contains `,`, `"` or a newline, doubling any `"`.
#[must_use]
pub fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
