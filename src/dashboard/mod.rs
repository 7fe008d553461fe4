//! Web dashboard: pages, tables, timeline charts and the HTTP server.

pub mod charts;
pub mod pages;
mod server;
pub mod table;
pub mod templates;

pub use pages::{Page, PageData, ViewRequest};
pub use server::{
    DashboardServer, ServerHandle, api_filters, api_view, build_router, page_view, serve,
    start_server,
};

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::html_escape;

    #[test]
    fn escapes_markup_and_quotes() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }
}
