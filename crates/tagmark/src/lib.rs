//! High-level API for tagmark documents.
//!
//! # Scope
//!
//! This crate provides:
//! - **Execute engine** - post-order dispatch of tag functions over a tree
//! - **Function table** - explicit mapping from tag name to [`TagFunction`]
//! - **Tag-function library** - entities, CSV tables, paragraph splitting,
//!   renaming and CSV escaping
//! - **Generation** - parse, execute and render in one call
//!
//! # Example
//!
//! ```
//! use tagmark::functions::{Entity, Paragrapher};
//! use tagmark::{FunctionTable, generate_html};
//!
//! let table = FunctionTable::new()
//!     .with("ent", Entity)
//!     .with("p", Paragrapher::new());
//! let html = generate_html("$p{one$ent[amp]\n\ntwo}", &table).unwrap();
//! assert_eq!(html, "<root><p>one&amp;</p><p>two</p></root>");
//! ```

pub mod engine;
pub mod functions;
pub mod generate;

pub use tagmark_dom as dom;
pub use tagmark_html as html;
pub use tagmark_syntax as syntax;

pub use engine::{ExecuteError, FunctionTable, TagError, TagFunction, execute};
pub use generate::{GenerateError, generate, generate_html};
