//! Property tests for paragraph splitting.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use tagmark::functions::Paragrapher;
use tagmark::{FunctionTable, TagFunction, execute};
use tagmark_dom::{NodeId, Tree};
use tagmark_syntax::{parse, render};

const PIECES: &[&str] = &[
    "one", "two ", " ", "\n", "\n\n", "\n \n", "  \n\n\n  ", "$b{bold}", "$em{x y}", "$pre{code}",
    "$blockquote{q}", "$1.00",
];

/// A document of `$p{...}` containers with text between them.
#[derive(Clone, Debug)]
struct Document(String);

impl Arbitrary for Document {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut out = String::new();
        for _ in 0..usize::arbitrary(g) % 4 + 1 {
            if bool::arbitrary(g) {
                out.push_str(g.choose(PIECES).copied().unwrap_or_default());
            }
            out.push_str("$p{");
            for _ in 0..usize::arbitrary(g) % 8 {
                out.push_str(g.choose(PIECES).copied().unwrap_or_default());
            }
            out.push('}');
        }
        Self(out)
    }
}

fn split(source: &str) -> Tree {
    let mut tree = parse(source).expect("generated documents parse");
    Paragrapher::new()
        .apply(&mut tree, NodeId::ROOT)
        .expect("splitting never fails");
    tree
}

fn non_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[quickcheck]
fn prop_paragraphs_hold_no_blank_lines_or_blocks(doc: Document) -> bool {
    let tree = split(&doc.0);
    tree.select_tag(NodeId::ROOT, "p").into_iter().all(|p| {
        let children = tree.children(p);
        !children.is_empty()
            && !tree.text_content(p).trim().is_empty()
            && children.iter().all(|&child| match tree.as_text(child) {
                Some(text) => !text.contains("\n\n"),
                None => !matches!(tree.tag_name(child), Some("pre" | "blockquote" | "p")),
            })
    })
}

#[quickcheck]
fn prop_splitting_keeps_visible_text(doc: Document) -> bool {
    let before = parse(&doc.0).expect("generated documents parse");
    let after = split(&doc.0);
    let before = non_whitespace(&before.text_content(NodeId::ROOT));
    before == non_whitespace(&after.text_content(NodeId::ROOT))
}

#[quickcheck]
fn prop_second_execute_changes_nothing(doc: Document) -> bool {
    let table = FunctionTable::new().with("p", Paragrapher::new());
    let mut tree = parse(&doc.0).expect("generated documents parse");
    execute(&mut tree, NodeId::ROOT, &table).expect("first pass");
    let once = render(&tree, NodeId::ROOT);
    execute(&mut tree, NodeId::ROOT, &table).expect("second pass");
    render(&tree, NodeId::ROOT) == once
}
