/// Escapes text for XML character data and attribute values.
///
/// The same escaping is safe for HTML text and quoted attributes.
pub fn escape_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Whether `ch` may appear in an XML 1.0 document at all.
fn is_xml_char(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escapes text for WordprocessingML parts, dropping control characters and
/// other code points XML 1.0 cannot carry.
pub(crate) fn escape_xml_text(s: &str) -> String {
    let kept: String = s.chars().filter(|&ch| is_xml_char(ch)).collect();
    escape_markup(&kept)
}
