//! `$csvtable{...}`: CSV text to an HTML table.

use std::fmt;

use csv::ReaderBuilder;
use tagmark_dom::{NodeId, NodeType, Tree};
use tagmark_syntax::{parse, render_children};

use crate::engine::{TagError, TagFunction};

/// Delimiters of the stand-in text for a raw node while its table body
/// goes through CSV. Private-use code points, so markup never means them.
const RAW_OPEN: char = '\u{E000}';
const RAW_CLOSE: char = '\u{E001}';

/// Class name for one part of a table, called as `(tag, row, col)`.
/// An empty string means no class.
///
/// Header cells are row 0 and body rows count from 1. `table`, `thead`,
/// `tbody` and `wrapper` are always asked with `(0, 0)`; `tr` with
/// `(row, 0)`.
pub type CellFormatter = dyn Fn(&str, usize, usize) -> String;

/// Converts a CSV body into `table` / `thead` / `tbody` elements.
///
/// The first record is the header row. Every record must have the same
/// number of fields. By default each field is parsed as markup, so
/// `$b{3}` in a cell becomes a `b` element. Raw nodes in the body (the
/// output of `$ent`, say) land in their cell still raw.
///
/// ```
/// use tagmark::functions::CsvTable;
/// use tagmark::{FunctionTable, generate};
///
/// let table = FunctionTable::new().with("csvtable", CsvTable::new());
/// let out = generate("$csvtable{\nA,B\n1,2\n}", &table).unwrap();
/// assert_eq!(
///     out,
///     "$root{$table{$thead{$tr{$th{A}$th{B}}}$tbody{$tr{$td{1}$td{2}}}}}"
/// );
/// ```
pub struct CsvTable {
    tag: String,
    formatter: Option<Box<CellFormatter>>,
    parse_cells: bool,
}

impl CsvTable {
    /// A table function for `$csvtable` with no classes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tag: "csvtable".to_string(),
            formatter: None,
            parse_cells: true,
        }
    }

    /// Use `formatter` to pick class names.
    #[must_use]
    pub fn with_formatter(mut self, formatter: impl Fn(&str, usize, usize) -> String + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// The tag searched for when applied to something other than a table
    /// macro (a whole document, say).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Whether cell text is parsed as markup (the default) or kept as
    /// plain text.
    #[must_use]
    pub const fn parse_cells(mut self, parse_cells: bool) -> Self {
        self.parse_cells = parse_cells;
        self
    }

    fn class_for(&self, tag: &str, row: usize, col: usize) -> String {
        self.formatter
            .as_ref()
            .map(|formatter| formatter(tag, row, col))
            .unwrap_or_default()
    }

    fn make_tag(&self, tree: &mut Tree, tag: &str, row: usize, col: usize) -> NodeId {
        let class = self.class_for(tag, row, col);
        if class.is_empty() {
            tree.new_element(tag, &[])
        } else {
            tree.new_element(tag, &[("class", class.as_str())])
        }
    }

    fn make_cell(
        &self,
        tree: &mut Tree,
        tag: &str,
        row: usize,
        col: usize,
        field: &str,
        fragments: &[String],
    ) -> Result<NodeId, TagError> {
        let cell = self.make_tag(tree, tag, row, col);
        if self.parse_cells {
            let fragment = parse(field)?;
            for &child in fragment.children(NodeId::ROOT) {
                let copy = tree.import(&fragment, child);
                tree.append_child(cell, copy);
            }
        } else if !field.is_empty() {
            let text = tree.new_text(field);
            tree.append_child(cell, text);
        }
        restore_raw(tree, cell, fragments);
        Ok(cell)
    }

    fn build(&self, tree: &mut Tree, body: &str, fragments: &[String]) -> Result<NodeId, TagError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(false)
            .from_reader(body.as_bytes());
        let mut records = reader.records();

        let table = self.make_tag(tree, "table", 0, 0);
        let thead = self.make_tag(tree, "thead", 0, 0);
        let header_row = self.make_tag(tree, "tr", 0, 0);
        tree.append_child(table, thead);
        tree.append_child(thead, header_row);
        if let Some(header) = records.next() {
            for (col, field) in header?.iter().enumerate() {
                let th = self.make_cell(tree, "th", 0, col, field, fragments)?;
                tree.append_child(header_row, th);
            }
        }

        let tbody = self.make_tag(tree, "tbody", 0, 0);
        tree.append_child(table, tbody);
        for (index, record) in records.enumerate() {
            let record = record?;
            let row = index + 1;
            let tr = self.make_tag(tree, "tr", row, 0);
            tree.append_child(tbody, tr);
            for (col, field) in record.iter().enumerate() {
                let td = self.make_cell(tree, "td", row, col, field, fragments)?;
                tree.append_child(tr, td);
            }
        }

        let wrapper = self.class_for("wrapper", 0, 0);
        if wrapper.is_empty() {
            return Ok(table);
        }
        let div = tree.new_element("div", &[("class", wrapper.as_str())]);
        tree.append_child(div, table);
        Ok(div)
    }

    fn convert(&self, tree: &mut Tree, node: NodeId) -> Result<(), TagError> {
        let mut scratch = Tree::new();
        let copy = scratch.import(tree, node);
        let fragments = stash_raw(&mut scratch, copy);
        let body = render_children(&scratch, copy);
        let table = self.build(tree, &body, &fragments)?;
        let _ = tree.replace_node(node, table);
        Ok(())
    }
}

/// Turns every raw node below `id` into placeholder text. Returns the
/// fragments, indexed by placeholder number.
fn stash_raw(tree: &mut Tree, id: NodeId) -> Vec<String> {
    let raws = tree.select(id, |tree, n| {
        tree.get(n).is_some_and(|node| matches!(node.node_type, NodeType::Raw(_)))
    });
    let mut fragments = Vec::with_capacity(raws.len());
    for raw in raws {
        let Some(node) = tree.get_mut(raw) else {
            continue;
        };
        if let NodeType::Raw(fragment) = &mut node.node_type {
            let fragment = std::mem::take(fragment);
            node.node_type = NodeType::Text(format!("{RAW_OPEN}{}{RAW_CLOSE}", fragments.len()));
            fragments.push(fragment);
        }
    }
    fragments
}

/// Splits text below `cell` back into text and raw nodes wherever a
/// placeholder from [`stash_raw`] survived parsing.
fn restore_raw(tree: &mut Tree, cell: NodeId, fragments: &[String]) {
    if fragments.is_empty() {
        return;
    }
    let texts = tree.select(cell, |tree, n| tree.as_text(n).is_some_and(|t| t.contains(RAW_OPEN)));
    for text_id in texts {
        let Some(parent) = tree.parent(text_id) else {
            continue;
        };
        let text = tree.as_text(text_id).unwrap_or_default().to_string();
        let mut rest = text.as_str();
        while let Some((before, fragment, after)) = next_placeholder(rest, fragments) {
            if !before.is_empty() {
                let piece = tree.new_text(before);
                tree.insert_before(parent, piece, Some(text_id));
            }
            let piece = tree.new_raw(fragment.as_str());
            tree.insert_before(parent, piece, Some(text_id));
            rest = after;
        }
        if !rest.is_empty() {
            let piece = tree.new_text(rest);
            tree.insert_before(parent, piece, Some(text_id));
        }
        tree.remove_child(parent, text_id);
    }
}

/// The first well-formed placeholder in `text`, as
/// `(text before, fragment, text after)`.
fn next_placeholder<'a>(text: &'a str, fragments: &'a [String]) -> Option<(&'a str, &'a String, &'a str)> {
    let mut search = 0;
    while let Some(offset) = text[search..].find(RAW_OPEN) {
        let start = search + offset;
        let inner = start + RAW_OPEN.len_utf8();
        if let Some(len) = text[inner..].find(RAW_CLOSE)
            && let Ok(index) = text[inner..inner + len].parse::<usize>()
            && let Some(fragment) = fragments.get(index)
        {
            return Some((&text[..start], fragment, &text[inner + len + RAW_CLOSE.len_utf8()..]));
        }
        search = inner;
    }
    None
}

impl Default for CsvTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CsvTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvTable")
            .field("tag", &self.tag)
            .field("formatter", &self.formatter.is_some())
            .field("parse_cells", &self.parse_cells)
            .finish()
    }
}

impl TagFunction for CsvTable {
    /// Converts `node` if it is the table macro, otherwise every table
    /// macro below it.
    fn apply(&self, tree: &mut Tree, node: NodeId) -> Result<(), TagError> {
        if tree.tag_name(node) == Some(self.tag.as_str()) {
            return self.convert(tree, node);
        }
        for table in tree.select_tag(node, &self.tag) {
            self.convert(tree, table)?;
        }
        Ok(())
    }
}
