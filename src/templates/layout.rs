const STYLESHEET: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wraps `body` in the shared page shell. `body` must already be escaped.
pub(super) fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="{STYLESHEET}">
</head>
<body>
<main class="container py-4">
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
    )
}

pub fn render_error_page(message: &str) -> String {
    page(
        message,
        &format!(
            r#"<h1>{}</h1>
<p><a href="/">Back to products</a></p>"#,
            escape_html(message)
        ),
    )
}
