use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::debug;

use crate::document::{Block, Document, ListKind, Table};

/// What a visited element contributes to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Heading(u8),
    Paragraph,
    Code,
    List(ListKind),
    ListItem,
    Table,
    Break,
    Other,
}

fn classify(tag: &str) -> ElementKind {
    match tag {
        "h1" => ElementKind::Heading(1),
        "h2" => ElementKind::Heading(2),
        "h3" => ElementKind::Heading(3),
        "h4" => ElementKind::Heading(4),
        "h5" => ElementKind::Heading(5),
        "h6" => ElementKind::Heading(6),
        "p" => ElementKind::Paragraph,
        "pre" => ElementKind::Code,
        "ul" => ElementKind::List(ListKind::Bullet),
        "ol" => ElementKind::List(ListKind::Decimal),
        "li" => ElementKind::ListItem,
        "table" => ElementKind::Table,
        "br" => ElementKind::Break,
        _ => ElementKind::Other,
    }
}

fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => {
            let local: &str = &name.local;
            Some(local.to_ascii_lowercase())
        }
        _ => None,
    }
}

fn kind_of(node: &Handle) -> Option<ElementKind> {
    tag_name(node).map(|t| classify(&t))
}

/// Appends `text` with whitespace runs folded into one space, including a run
/// that continues one already ending `out`.
fn push_collapsed(text: &str, out: &mut String) {
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.ends_with(' ') {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }
    if pending_space && !out.ends_with(' ') {
        out.push(' ');
    }
}

/// Text content of `node` with inline formatting dropped.
///
/// Whitespace runs collapse the way a browser shows them; `<br>` and nested
/// paragraphs start a new line. With `own_text_only` set, nested lists, tables
/// and code blocks are left out so they can be mapped as blocks of their own.
fn flatten_text(node: &Handle, own_text_only: bool) -> String {
    fn walk(node: &Handle, own_text_only: bool, out: &mut String) {
        match &node.data {
            NodeData::Text { contents } => push_collapsed(&contents.borrow(), out),
            NodeData::Element { .. } => match kind_of(node) {
                Some(ElementKind::Break) => out.push('\n'),
                Some(ElementKind::List(_) | ElementKind::Table | ElementKind::Code)
                    if own_text_only => {}
                Some(ElementKind::Paragraph) => {
                    if !out.trim().is_empty() {
                        out.push('\n');
                    }
                    for c in node.children.borrow().iter() {
                        walk(c, own_text_only, out);
                    }
                }
                _ => {
                    for c in node.children.borrow().iter() {
                        walk(c, own_text_only, out);
                    }
                }
            },
            _ => {}
        }
    }

    let mut raw = String::new();
    walk(node, own_text_only, &mut raw);
    raw.split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Verbatim text of a `<pre>` block, minus the final newline.
fn preformatted_text(node: &Handle) -> String {
    fn walk(node: &Handle, out: &mut String) {
        match &node.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => {
                for c in node.children.borrow().iter() {
                    walk(c, out);
                }
            }
            _ => {}
        }
    }

    let mut out = String::new();
    walk(node, &mut out);
    let text = out.replace("\r\n", "\n");
    text.strip_suffix('\n').unwrap_or(&text).to_string()
}

/// Rows of `table` in document order, each as its `td`/`th` cell texts.
///
/// Rows of nested tables belong to those tables and are not collected.
fn table_rows(table: &Handle) -> Vec<Vec<String>> {
    fn find_rows(node: &Handle, out: &mut Vec<Handle>) {
        for c in node.children.borrow().iter() {
            match tag_name(c).as_deref() {
                Some("tr") => out.push(c.clone()),
                Some("table") => {}
                _ => find_rows(c, out),
            }
        }
    }

    let mut trs: Vec<Handle> = Vec::new();
    find_rows(table, &mut trs);

    trs.iter()
        .map(|tr| {
            tr.children
                .borrow()
                .iter()
                .filter(|c| matches!(tag_name(c).as_deref(), Some("td" | "th")))
                .map(|c| flatten_text(c, false))
                .collect()
        })
        .collect()
}

/// Builds a table sized by its widest row, or `None` when the table has no
/// cells at all.
fn map_table(node: &Handle) -> Option<Table> {
    let rows = table_rows(node);
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        debug!(rows = rows.len(), "skipping table without cells");
        return None;
    }

    let mut table = Table::with_columns(columns);
    for row in rows {
        table.add_row(row);
    }
    Some(table)
}

struct Mapper {
    document: Document,
    lists: Vec<ListKind>,
}

impl Mapper {
    fn visit(&mut self, node: &Handle) {
        let Some(kind) = kind_of(node) else { return };

        match kind {
            ElementKind::Heading(level) => {
                let text = flatten_text(node, false);
                if !text.is_empty() {
                    self.document.push(Block::Heading { level, text });
                }
            }
            ElementKind::Paragraph => {
                let text = flatten_text(node, false);
                if !text.is_empty() {
                    self.document.push(Block::Paragraph(text));
                }
            }
            ElementKind::Code => {
                let text = preformatted_text(node);
                if !text.trim().is_empty() {
                    self.document.push(Block::Code(text));
                }
            }
            ElementKind::List(list) => {
                self.lists.push(list);
                self.visit_children(node);
                let _ = self.lists.pop();
            }
            ElementKind::ListItem => {
                let text = flatten_text(node, true);
                if !text.is_empty() {
                    self.document.push(Block::ListItem {
                        kind: self.lists.last().copied().unwrap_or(ListKind::Bullet),
                        level: self.lists.len().saturating_sub(1) as u32,
                        text,
                    });
                }
                self.visit_nested_blocks(node);
            }
            ElementKind::Table => {
                if let Some(table) = map_table(node) {
                    self.document.push(Block::Table(table));
                }
            }
            ElementKind::Break => {}
            ElementKind::Other => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: &Handle) {
        for c in node.children.borrow().iter() {
            self.visit(c);
        }
    }

    /// Maps the lists, tables and code blocks held inside a list item, which
    /// its own text leaves out.
    fn visit_nested_blocks(&mut self, node: &Handle) {
        for c in node.children.borrow().iter() {
            match kind_of(c) {
                Some(ElementKind::List(_) | ElementKind::Table | ElementKind::Code) => {
                    self.visit(c)
                }
                Some(ElementKind::Break) | None => {}
                Some(_) => self.visit_nested_blocks(c),
            }
        }
    }
}

/// Parses `input_html` and returns the top-level nodes of its `<body>`.
///
/// html5ever supplies the `html`/`body` scaffolding around a bare fragment,
/// so both fragments and full documents land here the same way. The leading
/// doctype keeps the parser out of quirks mode, where `<table>` would not
/// close an open `<p>`; a second doctype in a full document is ignored.
fn body_nodes(input_html: &str) -> Vec<Handle> {
    let source = format!("<!doctype html>{input_html}");
    let dom = parse_document(RcDom::default(), Default::default()).one(source.as_str());
    let mut pending = vec![dom.document.clone()];
    while let Some(node) = pending.pop() {
        if tag_name(&node).as_deref() == Some("body") {
            let children = node.children.borrow().clone();
            return children;
        }
        pending.extend(node.children.borrow().iter().rev().cloned());
    }
    Vec::new()
}

/// Maps rendered HTML (fragment or full document) onto a [`Document`].
///
/// The title block comes first, followed by headings, paragraphs, code
/// blocks, list items and tables in document order.
pub fn document_from_html(input_html: &str, title: &str) -> Document {
    let mut mapper = Mapper {
        document: Document::new(title),
        lists: Vec::new(),
    };
    for node in body_nodes(input_html) {
        mapper.visit(&node);
    }

    debug!(
        blocks = mapper.document.blocks().len(),
        tables = mapper.document.tables().count(),
        "mapped html into document"
    );
    mapper.document
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table_of(doc: &Document) -> &Table {
        doc.tables().next().expect("table block")
    }

    #[test]
    fn empty_html_yields_only_the_title() {
        let doc = document_from_html("", "Converted Chat");
        assert_eq!(doc.blocks(), &[Block::Title("Converted Chat".to_string())]);
    }

    #[test]
    fn paragraphs_drop_inline_formatting() {
        let doc = document_from_html("<p>Hello <strong>bold</strong> <em>world</em></p>", "T");
        assert_eq!(doc.blocks()[1], Block::Paragraph("Hello bold world".to_string()));
    }

    #[test]
    fn line_breaks_survive_flattening() {
        let doc = document_from_html("<p>one<br />\ntwo</p>", "T");
        assert_eq!(doc.blocks()[1], Block::Paragraph("one\ntwo".to_string()));
    }

    #[test]
    fn soft_wraps_collapse_to_spaces() {
        let doc = document_from_html("<p>one\n   two</p>", "T");
        assert_eq!(doc.blocks()[1], Block::Paragraph("one two".to_string()));
    }

    #[test]
    fn table_column_count_comes_from_widest_row() {
        let html = "<table><tr><td>a</td></tr><tr><td>1</td><td>2</td><td>3</td></tr></table>";
        let doc = document_from_html(html, "T");
        let t = table_of(&doc);
        assert_eq!(t.columns(), 3);
        assert_eq!(t.rows().len(), 2);
        assert_eq!(t.rows()[0], vec!["a", "", ""]);
        assert_eq!(t.rows()[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn header_and_data_cells_are_treated_alike() {
        let html = "<table><thead><tr><th>x</th><th>y</th></tr></thead>\
                    <tbody><tr><td>1</td><td>2</td></tr></tbody></table>";
        let doc = document_from_html(html, "T");
        let t = table_of(&doc);
        assert_eq!(t.rows()[0], vec!["x", "y"]);
        assert_eq!(t.rows()[1], vec!["1", "2"]);
    }

    #[test]
    fn table_without_rows_is_omitted() {
        let doc = document_from_html("<table></table><p>after</p>", "T");
        assert_eq!(doc.tables().count(), 0);
        assert_eq!(doc.blocks()[1], Block::Paragraph("after".to_string()));
    }

    #[test]
    fn nested_table_rows_stay_with_the_inner_table() {
        let html = "<table><tr><td>outer<table><tr><td>i1</td><td>i2</td><td>i3</td></tr></table></td></tr></table>";
        let doc = document_from_html(html, "T");
        let t = table_of(&doc);
        assert_eq!(t.columns(), 1);
        assert_eq!(t.rows().len(), 1);
        assert!(t.rows()[0][0].starts_with("outer"));
    }

    #[test]
    fn blocks_follow_document_order() {
        let html = "<h2>Intro</h2><p>a</p><table><tr><td>c</td></tr></table><p>b</p>";
        let doc = document_from_html(html, "T");
        let blocks = doc.blocks();
        assert_eq!(blocks.len(), 5);
        assert_eq!(
            blocks[1],
            Block::Heading {
                level: 2,
                text: "Intro".to_string()
            }
        );
        assert_eq!(blocks[2], Block::Paragraph("a".to_string()));
        assert!(matches!(blocks[3], Block::Table(_)));
        assert_eq!(blocks[4], Block::Paragraph("b".to_string()));
    }

    #[test]
    fn nested_lists_keep_kind_and_level() {
        let html = "<ul><li>top<ol><li>inner</li></ol></li><li>second</li></ul>";
        let doc = document_from_html(html, "T");
        assert_eq!(
            &doc.blocks()[1..],
            &[
                Block::ListItem {
                    kind: ListKind::Bullet,
                    level: 0,
                    text: "top".to_string()
                },
                Block::ListItem {
                    kind: ListKind::Decimal,
                    level: 1,
                    text: "inner".to_string()
                },
                Block::ListItem {
                    kind: ListKind::Bullet,
                    level: 0,
                    text: "second".to_string()
                },
            ]
        );
    }

    #[test]
    fn loose_list_items_absorb_their_paragraphs() {
        let doc = document_from_html("<ol><li><p>a</p><p>b</p></li></ol>", "T");
        assert_eq!(
            &doc.blocks()[1..],
            &[Block::ListItem {
                kind: ListKind::Decimal,
                level: 0,
                text: "a\nb".to_string()
            }]
        );
    }

    #[test]
    fn preformatted_text_is_kept_verbatim() {
        let doc = document_from_html("<pre><code>fn main() {\n    run();\n}\n</code></pre>", "T");
        assert_eq!(
            doc.blocks()[1],
            Block::Code("fn main() {\n    run();\n}".to_string())
        );
    }

    #[test]
    fn malformed_html_is_mapped_best_effort() {
        let doc = document_from_html("<p>open <b>bold<table><tr><td>x", "T");
        assert_eq!(doc.tables().count(), 1);
        assert!(table_of(&doc).cell(0, 0).is_some_and(|c| c.contains('x')));
    }

    #[test]
    fn table_under_a_bullet_stays_a_table() {
        let html = crate::markdown::markdown_to_html("- item\n\n  | a | b |\n  |---|---|\n  | 1 | 2 |");
        let doc = document_from_html(&html, "T");
        assert_eq!(
            doc.blocks()[1],
            Block::ListItem {
                kind: ListKind::Bullet,
                level: 0,
                text: "item".to_string()
            }
        );
        assert_eq!(doc.tables().count(), 1);
        let t = table_of(&doc);
        assert_eq!(t.rows()[0], vec!["a", "b"]);
        assert_eq!(t.rows()[1], vec!["1", "2"]);
    }

    #[test]
    fn fenced_code_under_a_numbered_item_keeps_its_lines() {
        let html = crate::markdown::markdown_to_html("1. run:\n\n   ```\n   a  b\n   c\n   ```");
        let doc = document_from_html(&html, "T");
        assert_eq!(
            &doc.blocks()[1..],
            &[
                Block::ListItem {
                    kind: ListKind::Decimal,
                    level: 0,
                    text: "run:".to_string()
                },
                Block::Code("a  b\nc".to_string()),
            ]
        );
    }

    #[test]
    fn whitespace_collapses_across_inline_elements() {
        let doc = document_from_html("<p>a <em> b</em></p>", "T");
        assert_eq!(doc.blocks()[1], Block::Paragraph("a b".to_string()));
    }

    #[test]
    fn full_documents_map_like_fragments() {
        let doc = document_from_html("<html><head><title>x</title></head><body><p>hi</p></body></html>", "T");
        assert_eq!(&doc.blocks()[1..], &[Block::Paragraph("hi".to_string())]);
    }
}
