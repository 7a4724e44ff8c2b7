use std::borrow::Cow;

use chrono::{Datelike, Local};

const SITE_NAME: &str = "CineArtist Productions";

const BASE_STYLES: &str = r#"
        :root { color-scheme: dark; }
        body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; background: #0b0f19; color: #e2e8f0; min-height: 100vh; display: flex; flex-direction: column; }
        a { color: #fbbf24; }
        header { background: #111827; padding: 1.25rem clamp(1.25rem, 5vw, 3rem); border-bottom: 1px solid #1f2937; }
        .header-bar { display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 1rem; }
        .brand { font-size: 1.35rem; font-weight: 700; letter-spacing: 0.04em; color: #fbbf24; text-decoration: none; }
        nav { display: flex; flex-wrap: wrap; gap: 0.35rem; }
        nav a { color: #cbd5e1; text-decoration: none; padding: 0.45rem 0.85rem; border-radius: 999px; font-weight: 600; }
        nav a:hover { background: #1f2937; }
        nav a.active { background: #fbbf24; color: #111827; }
        main { flex: 1; padding: clamp(1.5rem, 4vw, 3rem); max-width: 1100px; width: 100%; margin: 0 auto; box-sizing: border-box; }
        h1 { margin-top: 0; }
        .panel { background: #111827; border-radius: 14px; border: 1px solid #1f2937; padding: 1.5rem; margin-bottom: 2rem; }
        .lead { color: #94a3b8; font-size: 1.05rem; line-height: 1.7; }
        label { display: block; margin-top: 1rem; font-weight: 600; }
        input, textarea { width: 100%; padding: 0.75rem; margin-top: 0.45rem; border-radius: 8px; border: 1px solid #334155; background: #0f172a; color: #e2e8f0; box-sizing: border-box; font-size: 1rem; }
        textarea { min-height: 8rem; resize: vertical; }
        button, .button { display: inline-block; margin-top: 1.5rem; padding: 0.8rem 1.4rem; border: none; border-radius: 8px; background: #fbbf24; color: #111827; font-weight: 700; cursor: pointer; text-decoration: none; }
        button:hover, .button:hover { background: #f59e0b; }
        .flash { padding: 1rem 1.25rem; border-radius: 10px; margin-bottom: 1.5rem; font-weight: 600; border: 1px solid transparent; }
        .flash.success { background: #052e16; border-color: #166534; color: #bbf7d0; }
        .flash.error { background: #450a0a; border-color: #b91c1c; color: #fecaca; }
        .card-grid { display: grid; gap: 1.25rem; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); }
        .card { display: block; background: #111827; border: 1px solid #1f2937; border-radius: 14px; padding: 1.35rem; color: inherit; text-decoration: none; }
        .card:hover { border-color: #fbbf24; }
        .card h3 { margin-top: 0; color: #fbbf24; }
        .tag { display: inline-block; margin: 0.2rem 0.35rem 0 0; padding: 0.2rem 0.65rem; border-radius: 999px; background: #1f2937; color: #cbd5e1; font-size: 0.8rem; }
        table { width: 100%; border-collapse: collapse; margin-top: 1rem; font-size: 0.92rem; }
        th, td { padding: 0.6rem 0.75rem; border-bottom: 1px solid #1f2937; text-align: left; vertical-align: top; word-break: break-word; }
        th { background: #1f2937; }
        .app-footer { padding: 2rem 1rem; text-align: center; font-size: 0.85rem; color: #64748b; }
        @media (max-width: 768px) {
            .header-bar { flex-direction: column; align-items: flex-start; }
            table { font-size: 0.85rem; }
        }
"#;

const NAV_LINKS: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/about", "About"),
    ("/films", "Films"),
    ("/stories", "Stories"),
    ("/casting", "Casting"),
    ("/contact", "Contact"),
];

pub struct PageLayout<'a> {
    pub meta_title: &'a str,
    /// Path of the nav entry to highlight, if any.
    pub active_path: Option<&'a str>,
    pub body_html: Cow<'a, str>,
    pub noindex: bool,
}

impl<'a> PageLayout<'a> {
    pub fn new(meta_title: &'a str, body_html: impl Into<Cow<'a, str>>) -> Self {
        Self {
            meta_title,
            active_path: None,
            body_html: body_html.into(),
            noindex: false,
        }
    }

    pub fn active(mut self, path: &'a str) -> Self {
        self.active_path = Some(path);
        self
    }

    pub fn noindex(mut self) -> Self {
        self.noindex = true;
        self
    }
}

pub fn render_page(layout: PageLayout<'_>) -> String {
    let PageLayout {
        meta_title,
        active_path,
        body_html,
        noindex,
    } = layout;

    let nav = NAV_LINKS
        .iter()
        .map(|(href, label)| {
            let class = if active_path == Some(*href) {
                r#" class="active""#
            } else {
                ""
            };
            format!(r#"<a href="{href}"{class}>{label}</a>"#)
        })
        .collect::<String>();

    let robots = if noindex {
        r#"<meta name="robots" content="noindex,nofollow">"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{meta_title} | {site}</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    {robots}
    <style>
{styles}
    </style>
</head>
<body>
    <header>
        <div class="header-bar">
            <a class="brand" href="/">{site}</a>
            <nav>{nav}</nav>
        </div>
    </header>
    <main>
{body_html}
    </main>
    {footer}
</body>
</html>"#,
        meta_title = escape_html(meta_title),
        site = SITE_NAME,
        robots = robots,
        styles = BASE_STYLES,
        nav = nav,
        body_html = body_html,
        footer = render_footer(),
    )
}

pub fn render_footer() -> String {
    let current_year = Local::now().year();
    format!(
        r#"<footer class="app-footer">© {year} {site}. All rights reserved.</footer>"#,
        year = current_year,
        site = SITE_NAME,
    )
}

/// A success or error banner; `message` is escaped here.
pub fn render_flash(message: &str, is_error: bool) -> String {
    let class = if is_error { "error" } else { "success" };
    format!(
        r#"<div class="flash {class}">{message}</div>"#,
        message = escape_html(message)
    )
}

/// Shared acknowledgement page shown after a form is accepted.
pub fn render_success_page(title: &str, message: &str) -> String {
    let body = format!(
        r#"        <section class="panel">
            <h1>{title}</h1>
            <p class="lead">{message}</p>
            <a class="button" href="/">Back to home</a>
        </section>"#,
        title = escape_html(title),
        message = escape_html(message),
    );
    render_page(PageLayout::new(title, body))
}

/// Admin sign-in form; `flash` is an optional (message, is_error) banner.
pub fn render_login_page(flash: Option<(&str, bool)>) -> String {
    let flash_html = flash
        .map(|(message, is_error)| render_flash(message, is_error))
        .unwrap_or_default();
    let body = format!(
        r#"        <section class="panel" style="max-width: 420px; margin: 0 auto;">
            <h1>Admin Login</h1>
            {flash_html}
            <form method="post" action="/admin/login">
                <label for="username">Username</label>
                <input id="username" name="username" autocomplete="username" required>
                <label for="password">Password</label>
                <input id="password" type="password" name="password" autocomplete="current-password" required>
                <button type="submit">Sign in</button>
            </form>
        </section>"#,
    );
    render_page(PageLayout::new("Admin Login", body).noindex())
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn highlights_active_nav_entry() {
        let html = render_page(PageLayout::new("Stories", "<p>body</p>").active("/stories"));
        assert!(html.contains(r#"<a href="/stories" class="active">Stories</a>"#));
        assert!(html.contains(r#"<a href="/casting">Casting</a>"#));
        assert!(!html.contains("noindex"));
    }

    #[test]
    fn flash_escapes_message() {
        let html = render_flash("<b>oops</b>", true);
        assert!(html.contains("flash error"));
        assert!(html.contains("&lt;b&gt;oops&lt;/b&gt;"));
    }
}
