use pulldown_cmark::{html, Options, Parser};

/// Renders chat text as HTML: CommonMark plus pipe tables.
///
/// Never fails; unrecognized syntax stays literal text. The renderer's
/// trailing newline is dropped, so `hello` becomes `<p>hello</p>`.
pub fn markdown_to_html(text: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    let parser = Parser::new_ext(text, opts);
    let mut out = String::with_capacity(text.len() + text.len() / 2);
    html::push_html(&mut out, parser);
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out
}
