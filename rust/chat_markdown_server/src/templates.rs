//! HTML pages served by the handlers.
//!
//! The result page is assembled from fixed pieces around the rendered HTML,
//! which appears twice: as live markup and, escaped, as the value of the
//! hidden `markdown_content` field posted to `/download`.

use chat_markdown::escape_markup;

const STYLE: &str = r#"<style>
        body { font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 0; background-color: #f5f5f5; }
        header { background-color: #333; color: white; padding: 20px; text-align: center; }
        main { padding: 20px; }
        .container { max-width: 800px; margin: 0 auto; background-color: white; border-radius: 8px; box-shadow: 0 4px 8px rgba(0, 0, 0, 0.1); padding: 20px; }
        h1 { font-size: 36px; }
        textarea { width: 100%; padding: 10px; font-size: 16px; border: 1px solid #ddd; border-radius: 5px; box-sizing: border-box; }
        button { background-color: #4CAF50; color: white; padding: 10px 20px; border: none; border-radius: 5px; cursor: pointer; font-size: 16px; margin-top: 10px; }
        button:hover { background-color: #45a049; }
        pre { background-color: #f4f4f4; padding: 15px; border-radius: 5px; white-space: pre-wrap; word-wrap: break-word; border: 1px solid #ddd; }
        table { width: 100%; border-collapse: collapse; margin-top: 20px; }
        th, td { padding: 10px; border: 1px solid #ddd; text-align: left; }
        th { background-color: #f9f9f9; }
        a { color: #4CAF50; text-decoration: none; font-weight: bold; }
        a:hover { text-decoration: underline; }
    </style>"#;

const INDEX_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Chat to Markdown</title>
"#;

const INDEX_BODY: &str = r#"
</head>
<body>
    <header>
        <h1>Chat to Markdown Converter</h1>
    </header>
    <main>
        <div class="container">
            <form action="/convert" method="POST">
                <textarea name="chat_input" rows="6" placeholder="Enter your chat message here"></textarea><br><br>
                <button type="submit">Convert to Markdown</button>
            </form>
        </div>
    </main>
</body>
</html>
"#;

const RESULT_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Converted Markdown</title>
"#;

const RESULT_OPEN: &str = r#"
</head>
<body>
    <header>
        <h1>Converted Markdown</h1>
    </header>
    <main>
        <div class="container">
            <h3>Markdown Output:</h3>
            <div id="markdown-output">"#;

const RESULT_FORM_OPEN: &str = r#"</div>
            <button onclick="copyToClipboard()">Copy to Clipboard</button>
            <form action="/download" method="POST">
                <input type="hidden" name="markdown_content" value=""#;

const RESULT_TAIL: &str = r#"">
                <button type="submit">Download as DOCX</button>
            </form>
            <br>
            <a href="/">Go Back</a>
        </div>
    </main>
    <script>
        function copyToClipboard() {
            var copyText = document.getElementById("markdown-output");
            var range = document.createRange();
            range.selectNode(copyText);
            window.getSelection().removeAllRanges();
            window.getSelection().addRange(range);
            document.execCommand("copy");
            alert("Copied to clipboard!");
        }
    </script>
</body>
</html>
"#;

pub(crate) const ERROR_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Internal Server Error</title></head>
<body>
    <h1>Internal Server Error</h1>
    <p>The server could not complete your request.</p>
    <a href="/">Go Back</a>
</body>
</html>
"#;

pub(crate) fn render_index() -> String {
    [INDEX_HEAD, STYLE, INDEX_BODY].concat()
}

/// Result page with `rendered` shown as-is and carried escaped in the
/// download form.
pub(crate) fn render_result(rendered: &str) -> String {
    let escaped = escape_markup(rendered);
    [
        RESULT_HEAD,
        STYLE,
        RESULT_OPEN,
        rendered,
        RESULT_FORM_OPEN,
        escaped.as_str(),
        RESULT_TAIL,
    ]
    .concat()
}
