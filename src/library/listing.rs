//! Listing page rendering

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped when a file name becomes a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Link target of a listed file
pub fn audio_href(name: &str) -> String {
    format!("/audio/{}", utf8_percent_encode(name, PATH_SEGMENT))
}

/// Render the listing page for `entries`
pub fn render_index(title: &str, entries: &[String]) -> String {
    let title = escape_html(title);
    let mut items = String::new();
    for name in entries {
        let href = audio_href(name);
        let label = escape_html(name);
        items.push_str(&format!(
            r#"
            <li>
                <a href="{href}">{label}</a>
                <audio controls preload="none" src="{href}"></audio>
            </li>"#
        ));
    }

    let body = if entries.is_empty() {
        r#"<p class="empty">No audio files available.</p>"#.to_string()
    } else {
        format!(r#"<ul class="files">{items}
        </ul>"#)
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
            line-height: 1.6;
            max-width: 760px;
            margin: 40px auto;
            padding: 0 20px;
            color: #222;
        }}
        h1 {{
            font-size: 2em;
            margin-bottom: 20px;
        }}
        .files {{
            list-style: none;
            padding: 0;
        }}
        .files li {{
            display: flex;
            align-items: center;
            justify-content: space-between;
            gap: 16px;
            padding: 10px 0;
            border-bottom: 1px solid #eee;
        }}
        .empty {{
            opacity: 0.7;
        }}
        a {{
            color: #5b4bc4;
            text-decoration: none;
            font-weight: 600;
            word-break: break-all;
        }}
        a:hover {{
            text-decoration: underline;
        }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    {body}
</body>
</html>"#
    )
}

/// Escape text for use inside HTML element content or quoted attributes
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
