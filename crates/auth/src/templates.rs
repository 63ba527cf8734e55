//! Inline HTML for the sign-in page.

/// Escape HTML special characters to prevent XSS.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Renders the sign-in form. `next` is carried through a hidden field.
pub fn login_page(next: Option<&str>, error: Option<&str>) -> String {
    let next = next.map(html_escape).unwrap_or_default();
    let error = error
        .map(|message| format!(r#"<p class="error">{}</p>"#, html_escape(message)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Sign in | newsdesk</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, sans-serif;
            max-width: 400px;
            margin: 100px auto;
            padding: 20px;
        }}
        form {{
            background: #f8f9fa;
            padding: 20px;
            border-radius: 8px;
        }}
        label {{
            display: block;
            margin-bottom: 5px;
            font-weight: 500;
        }}
        input[type="text"] {{
            width: 100%;
            padding: 8px;
            margin-bottom: 15px;
            border: 1px solid #ddd;
            border-radius: 4px;
            box-sizing: border-box;
        }}
        button {{
            width: 100%;
            padding: 10px;
            background: #1a73e8;
            color: white;
            border: none;
            border-radius: 4px;
            cursor: pointer;
        }}
        .error {{
            color: #b00020;
        }}
    </style>
</head>
<body>
    <h1>Sign in</h1>
    {error}
    <form method="POST" action="/accounts/login">
        <label for="username">Username</label>
        <input type="text" id="username" name="username" autocomplete="username" required />
        <input type="hidden" name="next" value="{next}" />
        <button type="submit">Sign in</button>
    </form>
    <p>First sign-in creates the account.</p>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_next_and_error() {
        let html = login_page(Some("/news?a=\"1\""), Some("<bad>"));
        assert!(html.contains(r#"value="/news?a=&quot;1&quot;""#));
        assert!(html.contains("&lt;bad&gt;"));
        assert!(!html.contains("<bad>"));
    }

    #[test]
    fn omits_error_block_when_absent() {
        let html = login_page(None, None);
        assert!(!html.contains(r#"class="error">"#));
        assert!(html.contains(r#"name="next" value="""#));
    }
}
