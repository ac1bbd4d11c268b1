//! Parse, execute and render in one call.

use tagmark_common::warning::clear_warnings;
use tagmark_dom::{NodeId, Tree};
use tagmark_html::{HtmlError, render_html};
use tagmark_syntax::{ParseError, parse, render};
use thiserror::Error;

use crate::engine::{ExecuteError, FunctionTable, execute};

/// Failure anywhere in the generation pipeline.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The source did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A tag function failed.
    #[error(transparent)]
    Execute(#[from] ExecuteError),
    /// The transformed tree could not be written as HTML.
    #[error(transparent)]
    Html(#[from] HtmlError),
}

/// Parse `source`, execute `table` over it and render the result as
/// markup, wrapped in `$root{...}`.
///
/// # Errors
///
/// Returns the parse or execute error that stopped the pipeline.
pub fn generate(source: &str, table: &FunctionTable) -> Result<String, GenerateError> {
    let tree = build(source, table)?;
    Ok(render(&tree, NodeId::ROOT))
}

/// Like [`generate`], but renders HTML wrapped in `<root>...</root>`.
///
/// # Errors
///
/// Returns the parse, execute or HTML error that stopped the pipeline.
pub fn generate_html(source: &str, table: &FunctionTable) -> Result<String, GenerateError> {
    let tree = build(source, table)?;
    Ok(render_html(&tree, NodeId::ROOT)?)
}

/// Each call is a new document, so warnings seen before are reported again.
fn build(source: &str, table: &FunctionTable) -> Result<Tree, GenerateError> {
    clear_warnings();
    let mut tree = parse(source)?;
    execute(&mut tree, NodeId::ROOT, table)?;
    Ok(tree)
}
