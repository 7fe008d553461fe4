//! HTML data tables with column definitions and pagination.
//!
//! Rows arrive as serialized JSON objects so one renderer serves every page:
//! a column names the field it shows and, optionally, the field holding the
//! cell's text color.

use super::html_escape;
use serde_json::Value;

/// One table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub header: &'static str,
    /// Field holding a CSS color for the cell text.
    pub color_field: Option<&'static str>,
}

impl Column {
    pub const fn new(field: &'static str, header: &'static str) -> Self {
        Self {
            field,
            header,
            color_field: None,
        }
    }

    pub const fn colored(mut self, color_field: &'static str) -> Self {
        self.color_field = Some(color_field);
        self
    }
}

/// A window onto a list of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based current page, clamped into range.
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

impl Pagination {
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total.div_ceil(page_size).max(1);
        Self {
            page: page.clamp(1, total_pages),
            page_size,
            total,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size).max(1)
    }

    /// Index of the first row on this page.
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    /// Rows of `rows` that fall on this page.
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = self.offset().min(rows.len());
        let end = (start + self.page_size).min(rows.len());
        &rows[start..end]
    }
}

/// Display text of a JSON cell value.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 => format!("{:.0}", f),
            (None, Some(f)) => format!("{:.2}", f),
            _ => n.to_string(),
        },
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Render one page of `rows` as an HTML table.
///
/// `page_url` is the fragment URL (query string included, without `page`)
/// the pagination buttons request; `target` is the CSS selector the
/// response replaces.
pub fn render_table(
    columns: &[Column],
    rows: &[Value],
    pagination: &Pagination,
    page_url: &str,
    target: &str,
) -> String {
    if rows.is_empty() {
        return r#"<div class="empty-state">No rows match the current filters</div>"#.to_string();
    }

    let mut html = String::from(r#"<table class="data-table"><thead><tr>"#);
    for column in columns {
        html.push_str(&format!(
            r#"<th data-field="{}">{}</th>"#,
            column.field,
            html_escape(column.header)
        ));
    }
    html.push_str("</tr></thead><tbody>");

    for row in pagination.slice(rows) {
        html.push_str("<tr>");
        for column in columns {
            let text = html_escape(&cell_text(row.get(column.field)));
            let color = column
                .color_field
                .map(|f| cell_text(row.get(f)))
                .filter(|c| !c.is_empty());
            match color {
                Some(color) => html.push_str(&format!(
                    r#"<td style="color: {}">{}</td>"#,
                    html_escape(&color),
                    text
                )),
                None => html.push_str(&format!("<td>{}</td>", text)),
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");

    html.push_str(&render_pagination(pagination, rows.len(), page_url, target));
    html
}

fn render_pagination(p: &Pagination, shown_total: usize, page_url: &str, target: &str) -> String {
    let start = p.offset() + 1;
    let end = (p.offset() + p.page_size).min(shown_total);
    let total_pages = p.total_pages();
    let sep = if page_url.contains('?') { "&amp;" } else { "?" };
    let button = |label: &str, page: usize, disabled: bool| {
        format!(
            r#"<button hx-get="{url}{sep}page={page}" hx-target="{target}" hx-swap="innerHTML"{disabled}>{label}</button>"#,
            url = html_escape(page_url),
            sep = sep,
            page = page,
            target = target,
            disabled = if disabled { " disabled" } else { "" },
            label = label,
        )
    };

    format!(
        r#"<div class="pagination">
            <div class="pagination-info">Showing {start} - {end} of {total} rows</div>
            <div class="pagination-controls">{first}{prev}<span class="page-number">{page} / {total_pages}</span>{next}{last}</div>
        </div>"#,
        start = start,
        end = end,
        total = p.total,
        first = button("First", 1, p.page <= 1),
        prev = button("Prev", p.page.saturating_sub(1).max(1), p.page <= 1),
        page = p.page,
        total_pages = total_pages,
        next = button("Next", (p.page + 1).min(total_pages), p.page >= total_pages),
        last = button("Last", total_pages, p.page >= total_pages),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLUMNS: &[Column] = &[
        Column::new("episode", "Episode"),
        Column::new("task_status_code", "Status").colored("task_status_color"),
        Column::new("calc_estimate", "Estimate (D)"),
    ];

    #[test]
    fn pagination_clamps_page_into_range() {
        let p = Pagination::new(9, 10, 25);
        assert_eq!(p.page, 3);
        assert_eq!(p.total_pages(), 3);
        assert_eq!(p.offset(), 20);

        let empty = Pagination::new(0, 10, 0);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages(), 1);
    }

    #[test]
    fn slice_returns_the_current_page() {
        let rows: Vec<i32> = (0..25).collect();
        assert_eq!(Pagination::new(3, 10, 25).slice(&rows), &[20, 21, 22, 23, 24]);
        assert_eq!(Pagination::new(1, 10, 25).slice(&rows).len(), 10);
    }

    #[test]
    fn cell_text_formats_json_values() {
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(&json!(null))), "");
        assert_eq!(cell_text(Some(&json!(12))), "12");
        assert_eq!(cell_text(Some(&json!(2.0))), "2");
        assert_eq!(cell_text(Some(&json!(1.256))), "1.26");
        assert_eq!(cell_text(Some(&json!("ep01"))), "ep01");
    }

    #[test]
    fn renders_colored_and_escaped_cells() {
        let rows = vec![json!({
            "episode": "<ep01>",
            "task_status_code": "wip",
            "task_status_color": "#3273dc",
            "calc_estimate": 1.5
        })];
        let html = render_table(
            COLUMNS,
            &rows,
            &Pagination::new(1, 10, 1),
            "/api/shot-data/view",
            "#shot-data-view",
        );
        assert!(html.contains("<th data-field=\"episode\">Episode</th>"));
        assert!(html.contains("&lt;ep01&gt;"));
        assert!(html.contains(r##"<td style="color: #3273dc">wip</td>"##));
        assert!(html.contains("<td>1.50</td>"));
        assert!(html.contains("Showing 1 - 1 of 1 rows"));
    }

    #[test]
    fn pagination_links_keep_the_query() {
        let rows: Vec<Value> = (0..15).map(|i| json!({"episode": format!("ep{i}")})).collect();
        let html = render_table(
            COLUMNS,
            &rows,
            &Pagination::new(1, 10, 15),
            "/api/shot-data/view?project=Alpha",
            "#shot-data-view",
        );
        assert!(html.contains("/api/shot-data/view?project=Alpha&amp;page=2"));
        assert!(html.contains("ep9"));
        assert!(!html.contains("ep10"));
    }

    #[test]
    fn empty_rows_render_placeholder() {
        let html = render_table(COLUMNS, &[], &Pagination::new(1, 10, 0), "/x", "#x");
        assert!(html.contains("No rows match"));
    }
}
