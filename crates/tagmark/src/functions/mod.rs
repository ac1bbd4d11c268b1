//! Tag functions shipped with tagmark.
//!
//! Each is a [`TagFunction`](crate::TagFunction) value to register in a
//! [`FunctionTable`](crate::FunctionTable) under whatever tag name the
//! document uses, e.g. `ent` for [`Entity`] or `p` for [`Paragrapher`].

mod csv_escape;
mod csv_table;
mod entity;
mod paragrapher;
mod rename;

pub use csv_escape::{CsvEscape, escape_csv_field};
pub use csv_table::{CellFormatter, CsvTable};
pub use entity::Entity;
pub use paragrapher::{BlockClassifier, Paragrapher, ParagrapherConfig, is_block_default};
pub use rename::{Rename, rename, rename_with_class};
