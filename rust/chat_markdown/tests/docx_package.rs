use std::io::{Cursor, Read};

use chat_markdown::{html_to_docx, markdown_to_html, DOCX_CONTENT_TYPE};
use pretty_assertions::assert_eq;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::ZipArchive;

fn read_part(docx: &[u8], name: &str) -> Option<String> {
    let mut archive = ZipArchive::new(Cursor::new(docx)).expect("valid zip");
    let mut file = archive.by_name(name).ok()?;
    let mut out = String::new();
    file.read_to_string(&mut out).expect("utf-8 part");
    Some(out)
}

#[derive(Debug, Default)]
struct Body {
    /// Cells per row, per table.
    tables: Vec<Vec<usize>>,
    grid_cols: Vec<usize>,
    styles: Vec<String>,
    texts: Vec<String>,
}

fn parse_body(xml: &str) -> Body {
    let mut reader = Reader::from_str(xml);
    let mut body = Body::default();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" => {
                    body.tables.push(Vec::new());
                    body.grid_cols.push(0);
                }
                b"w:tr" => body.tables.last_mut().expect("row in table").push(0),
                b"w:tc" => {
                    let row = body
                        .tables
                        .last_mut()
                        .and_then(|t| t.last_mut())
                        .expect("cell in row");
                    *row += 1;
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:gridCol" => *body.grid_cols.last_mut().expect("grid in table") += 1,
                b"w:pStyle" => {
                    let val = e
                        .attributes()
                        .flatten()
                        .find(|a| a.key.as_ref() == b"w:val")
                        .map(|a| String::from_utf8_lossy(&a.value).to_string())
                        .unwrap_or_default();
                    body.styles.push(val);
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                body.texts.push(t.unescape().expect("text").to_string());
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:t" => in_text = false,
            Ok(Event::Eof) => break,
            Err(e) => panic!("invalid document.xml: {e}"),
            _ => {}
        }
    }
    body
}

#[test]
fn docx_mime_type() {
    assert_eq!(
        DOCX_CONTENT_TYPE,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
}

#[test]
fn package_contains_required_parts() {
    let docx = html_to_docx("<p>hello</p>", "Converted Chat").unwrap();
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "docProps/core.xml",
        "word/document.xml",
        "word/styles.xml",
        "word/_rels/document.xml.rels",
    ] {
        assert!(read_part(&docx, part).is_some(), "missing {part}");
    }
    assert!(read_part(&docx, "word/numbering.xml").is_none());
}

#[test]
fn heading_and_table_round_through_markdown() {
    let html = markdown_to_html("# Hi\n\n| a | b |\n|---|---|\n| 1 | 2 |");
    let docx = html_to_docx(&html, "Converted Chat").unwrap();
    let body = parse_body(&read_part(&docx, "word/document.xml").unwrap());

    assert_eq!(body.tables, vec![vec![2, 2]]);
    assert_eq!(body.grid_cols, vec![2]);
    assert_eq!(body.styles, vec!["Title", "Heading1"]);
    assert_eq!(body.texts, vec!["Converted Chat", "Hi", "a", "b", "1", "2"]);
}

#[test]
fn table_rows_include_the_header() {
    let md = "| x | y | z |\n|---|---|---|\n| 1 | 2 | 3 |\n| 4 | 5 | 6 |\n| 7 | 8 | 9 |";
    let docx = html_to_docx(&markdown_to_html(md), "T").unwrap();
    let body = parse_body(&read_part(&docx, "word/document.xml").unwrap());
    assert_eq!(body.tables, vec![vec![3, 3, 3, 3]]);
}

#[test]
fn ragged_rows_are_normalized_to_the_widest_row() {
    let html = "<table><tr><td>a</td><td>b</td></tr><tr><td>1</td></tr>\
                <tr><td>x</td><td>y</td><td>z</td></tr></table>";
    let docx = html_to_docx(html, "T").unwrap();
    let body = parse_body(&read_part(&docx, "word/document.xml").unwrap());
    assert_eq!(body.tables, vec![vec![3, 3, 3]]);
    assert_eq!(body.grid_cols, vec![3]);
}

#[test]
fn empty_input_yields_title_only() {
    let docx = html_to_docx(&markdown_to_html(""), "Only Title").unwrap();
    let body = parse_body(&read_part(&docx, "word/document.xml").unwrap());
    assert!(body.tables.is_empty());
    assert_eq!(body.styles, vec!["Title"]);
    assert_eq!(body.texts, vec!["Only Title"]);

    let core = read_part(&docx, "docProps/core.xml").unwrap();
    assert!(core.contains("<dc:title>Only Title</dc:title>"));
}

#[test]
fn lists_pull_in_numbering_definitions() {
    let html = markdown_to_html("1. first\n2. second\n\n- bullet");
    let docx = html_to_docx(&html, "T").unwrap();
    let numbering = read_part(&docx, "word/numbering.xml").expect("numbering part");
    assert!(numbering.contains("w:numFmt w:val=\"decimal\""));
    assert!(numbering.contains("w:numFmt w:val=\"bullet\""));

    let types = read_part(&docx, "[Content_Types].xml").unwrap();
    assert!(types.contains("/word/numbering.xml"));

    let body = parse_body(&read_part(&docx, "word/document.xml").unwrap());
    assert_eq!(body.texts, vec!["T", "first", "second", "bullet"]);
}

#[test]
fn special_characters_survive_escaping() {
    let html = markdown_to_html("Tom & Jerry <3 \"quotes\"");
    let docx = html_to_docx(&html, "T").unwrap();
    let body = parse_body(&read_part(&docx, "word/document.xml").unwrap());
    assert_eq!(body.texts, vec!["T", "Tom & Jerry <3 \"quotes\""]);
}

#[test]
fn terminal_escapes_are_stripped_from_the_package() {
    let html = markdown_to_html("colored \u{1b}[31mred\u{1b}[0m text \u{1} x");
    let docx = html_to_docx(&html, "Log\u{7}").unwrap();

    for part in ["word/document.xml", "docProps/core.xml"] {
        let xml = read_part(&docx, part).unwrap();
        let illegal: Vec<char> = xml
            .chars()
            .filter(|&c| c < ' ' && !matches!(c, '\t' | '\n' | '\r'))
            .collect();
        assert!(illegal.is_empty(), "{part} carries {illegal:?}");
    }

    let body = parse_body(&read_part(&docx, "word/document.xml").unwrap());
    assert_eq!(body.texts, vec!["Log", "colored [31mred[0m text  x"]);
}
