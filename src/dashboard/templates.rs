//! HTML templates for the web dashboard.
//!
//! Templates are embedded at compile time using `include_str!`.

use super::html_escape;

/// The base HTML template with navigation, layout and chart drawing.
pub const BASE_TEMPLATE: &str = include_str!("templates/base.html");

/// Fill the base template. `nav` and `content` are inserted as HTML.
pub fn render_base(title: &str, nav: &str, content: &str) -> String {
    BASE_TEMPLATE
        .replace("{{title}}", &html_escape(title))
        .replace("{{nav}}", nav)
        .replace("{{content}}", content)
}
