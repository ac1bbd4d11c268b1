use tagmark_dom::{NodeId, Tree};

use crate::engine::{TagError, TagFunction};

/// `$ent[amp]` becomes the raw fragment `&amp;`.
///
/// The first argument names the entity: 1 to 15 characters from
/// `[A-Za-z0-9#]`, so numeric references like `$ent[#8212]` work too.
#[derive(Debug, Clone, Copy, Default)]
pub struct Entity;

impl TagFunction for Entity {
    fn apply(&self, tree: &mut Tree, node: NodeId) -> Result<(), TagError> {
        let name = tree
            .as_element(node)
            .and_then(|data| data.arg(0))
            .unwrap_or_default();
        if !is_entity_name(&name) {
            return Err(TagError::InvalidEntity(name));
        }
        let raw = tree.new_raw(format!("&{name};"));
        let _ = tree.replace_node(node, raw);
        Ok(())
    }
}

fn is_entity_name(name: &str) -> bool {
    (1..=15).contains(&name.len()) && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'#')
}
