use std::io::{Cursor, Write};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::document::{Block, Document, ListKind, Table};
use crate::error::DocxError;
use crate::escape::escape_xml_text;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

// Letter page minus 1" margins, in twentieths of a point.
const TEXT_WIDTH_TWIPS: usize = 9360;

fn runs_xml(text: &str, out: &mut String) {
    let mut first = true;
    for line in text.split('\n') {
        if !first {
            out.push_str("<w:r><w:br/></w:r>");
        }
        first = false;
        if line.is_empty() {
            continue;
        }
        out.push_str("<w:r><w:t xml:space=\"preserve\">");
        out.push_str(&escape_xml_text(line));
        out.push_str("</w:t></w:r>");
    }
}

fn paragraph_xml(style: Option<&str>, list: Option<(ListKind, u32)>, text: &str) -> String {
    let mut out = String::new();
    out.push_str("<w:p>");

    if style.is_some() || list.is_some() {
        out.push_str("<w:pPr>");
        if let Some(style) = style {
            out.push_str(&format!("<w:pStyle w:val=\"{style}\"/>"));
        }
        if let Some((kind, ilvl)) = list {
            out.push_str("<w:numPr>");
            out.push_str(&format!("<w:ilvl w:val=\"{ilvl}\"/>"));
            out.push_str(&format!("<w:numId w:val=\"{}\"/>", kind.num_id()));
            out.push_str("</w:numPr>");
        }
        out.push_str("</w:pPr>");
    }

    runs_xml(text, &mut out);
    out.push_str("</w:p>");
    out
}

fn table_xml(t: &Table) -> String {
    let col_width = TEXT_WIDTH_TWIPS / t.columns().max(1);

    let mut out = String::new();
    out.push_str("<w:tbl>");
    out.push_str("<w:tblPr>");
    out.push_str("<w:tblStyle w:val=\"TableGrid\"/>");
    out.push_str("<w:tblW w:w=\"0\" w:type=\"auto\"/>");
    out.push_str(
        r#"<w:tblBorders>
<w:top w:val="single" w:sz="4" w:space="0" w:color="D9D9D9"/>
<w:left w:val="single" w:sz="4" w:space="0" w:color="D9D9D9"/>
<w:bottom w:val="single" w:sz="4" w:space="0" w:color="D9D9D9"/>
<w:right w:val="single" w:sz="4" w:space="0" w:color="D9D9D9"/>
<w:insideH w:val="single" w:sz="4" w:space="0" w:color="D9D9D9"/>
<w:insideV w:val="single" w:sz="4" w:space="0" w:color="D9D9D9"/>
</w:tblBorders>"#,
    );
    out.push_str("</w:tblPr>");

    out.push_str("<w:tblGrid>");
    for _ in 0..t.columns() {
        out.push_str(&format!("<w:gridCol w:w=\"{col_width}\"/>"));
    }
    out.push_str("</w:tblGrid>");

    for row in t.rows() {
        out.push_str("<w:tr>");
        for cell in row {
            out.push_str("<w:tc>");
            out.push_str(&format!(
                "<w:tcPr><w:tcW w:w=\"{col_width}\" w:type=\"dxa\"/></w:tcPr>"
            ));
            // A cell must hold at least one paragraph, even when blank.
            out.push_str(&paragraph_xml(None, None, cell));
            out.push_str("</w:tc>");
        }
        out.push_str("</w:tr>");
    }

    out.push_str("</w:tbl>");
    out
}

fn block_xml(block: &Block) -> String {
    match block {
        Block::Title(text) => paragraph_xml(Some("Title"), None, text),
        Block::Heading { level, text } => {
            let style = format!("Heading{}", (*level).clamp(1, 6));
            paragraph_xml(Some(&style), None, text)
        }
        Block::Paragraph(text) => paragraph_xml(None, None, text),
        Block::Code(text) => paragraph_xml(Some("CodeBlock"), None, text),
        Block::ListItem { kind, level, text } => {
            paragraph_xml(None, Some((*kind, (*level).min(8))), text)
        }
        Block::Table(t) => table_xml(t),
    }
}

pub(crate) fn document_xml(document: &Document) -> String {
    let mut body = String::new();
    for b in document.blocks() {
        body.push_str(&block_xml(b));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
 xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    {body}
    <w:sectPr>
      <w:pgSz w:w="12240" w:h="15840"/>
      <w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>
      <w:cols w:space="708"/>
      <w:docGrid w:linePitch="360"/>
    </w:sectPr>
  </w:body>
</w:document>"#,
        body = body
    )
}

fn content_types_xml(has_numbering: bool) -> String {
    const WORDML: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml";

    let mut overrides = vec![
        ("/word/document.xml", format!("{WORDML}.document.main+xml")),
        ("/word/styles.xml", format!("{WORDML}.styles+xml")),
    ];
    if has_numbering {
        overrides.push(("/word/numbering.xml", format!("{WORDML}.numbering+xml")));
    }
    overrides.push((
        "/docProps/core.xml",
        "application/vnd.openxmlformats-package.core-properties+xml".to_string(),
    ));

    let mut out = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
"#,
    );
    for (part, content_type) in &overrides {
        out.push_str(&format!(
            "  <Override PartName=\"{part}\" ContentType=\"{content_type}\"/>\n"
        ));
    }
    out.push_str("</Types>");
    out
}

fn rels_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#
}

fn document_rels_xml(has_numbering: bool) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    out.push('\n');
    out.push_str(r#"  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#);
    out.push('\n');
    if has_numbering {
        out.push_str(r#"  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>"#);
        out.push('\n');
    }
    out.push_str("</Relationships>");
    out
}

fn core_xml(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
 xmlns:dc="http://purl.org/dc/elements/1.1/"
 xmlns:dcterms="http://purl.org/dc/terms/"
 xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:title>{}</dc:title>
</cp:coreProperties>"#,
        escape_xml_text(title)
    )
}

fn styles_xml() -> String {
    // Half-point sizes for Heading1..Heading6.
    const HEADING_SIZES: [u32; 6] = [32, 28, 26, 24, 22, 22];

    let mut out = String::new();
    out.push_str(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Title">
    <w:name w:val="Title"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:uiPriority w:val="10"/>
    <w:qFormat/>
    <w:pPr>
      <w:spacing w:after="240"/>
    </w:pPr>
    <w:rPr>
      <w:sz w:val="56"/>
    </w:rPr>
  </w:style>
"#,
    );

    for (i, size) in HEADING_SIZES.iter().enumerate() {
        let level = i + 1;
        out.push_str(&format!(
            r#"  <w:style w:type="paragraph" w:styleId="Heading{level}">
    <w:name w:val="heading {level}"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:uiPriority w:val="9"/>
    <w:qFormat/>
    <w:pPr>
      <w:keepNext/>
      <w:spacing w:before="240" w:after="120"/>
      <w:outlineLvl w:val="{i}"/>
    </w:pPr>
    <w:rPr>
      <w:b/>
      <w:sz w:val="{size}"/>
    </w:rPr>
  </w:style>
"#
        ));
    }

    out.push_str(
        r#"  <w:style w:type="paragraph" w:styleId="CodeBlock">
    <w:name w:val="Code Block"/>
    <w:basedOn w:val="Normal"/>
    <w:uiPriority w:val="99"/>
    <w:qFormat/>
    <w:pPr>
      <w:spacing w:before="120" w:after="120"/>
    </w:pPr>
    <w:rPr>
      <w:rFonts w:ascii="Consolas" w:hAnsi="Consolas" w:cs="Consolas"/>
      <w:sz w:val="20"/>
    </w:rPr>
  </w:style>
  <w:style w:type="table" w:styleId="TableGrid">
    <w:name w:val="Table Grid"/>
    <w:uiPriority w:val="59"/>
    <w:tblPr>
      <w:tblCellMar>
        <w:left w:w="108" w:type="dxa"/>
        <w:right w:w="108" w:type="dxa"/>
      </w:tblCellMar>
    </w:tblPr>
  </w:style>
</w:styles>"#,
    );
    out
}

fn numbering_xml() -> String {
    fn abstract_num(id: u32, fmt: &str, bullet: bool) -> String {
        let mut out = format!(
            "  <w:abstractNum w:abstractNumId=\"{id}\">\n    <w:multiLevelType w:val=\"hybridMultilevel\"/>\n"
        );
        for ilvl in 0..9u32 {
            let text = if bullet {
                "•".to_string()
            } else {
                format!("%{}.", ilvl + 1)
            };
            let left = 720 * (ilvl + 1);
            out.push_str(&format!(
                "    <w:lvl w:ilvl=\"{ilvl}\"><w:start w:val=\"1\"/><w:numFmt w:val=\"{fmt}\"/><w:lvlText w:val=\"{text}\"/><w:lvlJc w:val=\"left\"/><w:pPr><w:ind w:left=\"{left}\" w:hanging=\"360\"/></w:pPr></w:lvl>\n"
            ));
        }
        out.push_str("  </w:abstractNum>\n");
        out
    }

    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push('\n');
    out.push_str(r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#);
    out.push('\n');
    out.push_str(&abstract_num(ListKind::Bullet.num_id(), "bullet", true));
    out.push_str(&abstract_num(ListKind::Decimal.num_id(), "decimal", false));
    for kind in [ListKind::Bullet, ListKind::Decimal] {
        let id = kind.num_id();
        out.push_str(&format!(
            "  <w:num w:numId=\"{id}\"><w:abstractNumId w:val=\"{id}\"/></w:num>\n"
        ));
    }
    out.push_str("</w:numbering>");
    out
}

/// Packages `document` as a DOCX archive held in memory.
pub fn write_docx(document: &Document) -> Result<Vec<u8>, DocxError> {
    let has_numbering = document.needs_numbering();

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", opts)?;
    zip.write_all(content_types_xml(has_numbering).as_bytes())?;

    zip.start_file("_rels/.rels", opts)?;
    zip.write_all(rels_xml().as_bytes())?;

    zip.start_file("docProps/core.xml", opts)?;
    zip.write_all(core_xml(document.title()).as_bytes())?;

    zip.start_file("word/document.xml", opts)?;
    zip.write_all(document_xml(document).as_bytes())?;

    zip.start_file("word/styles.xml", opts)?;
    zip.write_all(styles_xml().as_bytes())?;

    if has_numbering {
        zip.start_file("word/numbering.xml", opts)?;
        zip.write_all(numbering_xml().as_bytes())?;
    }

    zip.start_file("word/_rels/document.xml.rels", opts)?;
    zip.write_all(document_rels_xml(has_numbering).as_bytes())?;

    let bytes = zip.finish()?.into_inner();
    debug!(
        bytes = bytes.len(),
        blocks = document.blocks().len(),
        has_numbering,
        "packaged docx"
    );
    Ok(bytes)
}
