//! Page template and embedded assets.

use crate::config::RenderConfig;
use crate::error::{RenderError, Result};

use askama::Template;

/// Route polled by the live-reload script.
pub const WATCH_ROUTE: &str = "/watch";

const STYLE_CSS: &str = include_str!("../assets/style.css");
const SCRIPT_JS: &str = include_str!("../assets/script.js");
const WATCH_JS: &str = include_str!("../assets/watch.js");

#[derive(Template)]
#[template(path = "document.html")]
struct DocumentTemplate<'a> {
    title: &'a str,
    version: &'a str,
    css: &'a str,
    table: &'a str,
    script: &'a str,
    watch_script: Option<&'a str>,
}

/// Wrap a table fragment in the full page.
///
/// The reload script is embedded only when `config.live_reload` is set.
pub fn render_document(table_html: &str, config: &RenderConfig) -> Result<String> {
    let template = DocumentTemplate {
        title: &config.title,
        version: env!("CARGO_PKG_VERSION"),
        css: STYLE_CSS,
        table: table_html,
        script: SCRIPT_JS,
        watch_script: config.live_reload.then_some(WATCH_JS),
    };
    let html = template.render()?;

    if !config.minify {
        return Ok(html);
    }
    let cfg = minify_html::Cfg {
        minify_js: true,
        minify_css: true,
        ..Default::default()
    };
    String::from_utf8(minify_html::minify(html.as_bytes(), &cfg))
        .map_err(|e| RenderError::TemplateError(format!("minified output is not UTF-8: {e}")))
}
