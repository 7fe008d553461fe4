//! Dashboard pages: registry, data loading and HTML rendering.
//!
//! Every page runs one reporting query, derives the task columns, applies
//! the date window and dropdown selections, then renders a table and zero or
//! more timelines. Full pages and the htmx fragments they refresh share the
//! same loading path.

use super::charts::{self, ColorBy, TimelineSpec};
use super::html_escape;
use super::table::{self, Column, Pagination};
use crate::db::Database;
use crate::error::{DashboardError, DashboardResult};
use crate::filters::{unique_values, Selection};
use crate::types::{derive_all, Selectable};
use crate::window::{filter_by_task_date, DateWindow};
use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// A dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    ProjectsSummary,
    ShotData,
    AssetData,
    ArtistData,
    ProjectDetails,
    ShotDetails,
    TaskComments,
    ProjectNav,
}

/// A dropdown whose options narrow with the selections of its parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cascade {
    pub field: &'static str,
    pub parents: &'static [&'static str],
}

const TASK_FILTERS: &[&str] = &["project", "department", "task_type", "task_status"];
const EPISODE_FILTERS: &[&str] = &["project", "department", "episode", "task_type", "task_status"];

const EPISODE_CASCADE: Cascade = Cascade {
    field: "episode",
    parents: &["project", "department"],
};

const PROJECTS_SUMMARY_COLUMNS: &[Column] = &[
    Column::new("name", "Project"),
    Column::new("start_date", "Start"),
    Column::new("end_date", "End"),
    Column::new("total_tasks", "Total Tasks"),
    Column::new("completed_tasks", "Completed Tasks"),
    Column::new("perc_completed", "% Completed"),
    Column::new("duration", "Duration (D)"),
    Column::new("project_status", "Status"),
];

const SHOT_DATA_COLUMNS: &[Column] = &[
    Column::new("project_code", "Project"),
    Column::new("department", "Department"),
    Column::new("episode", "Episode"),
    Column::new("task_type_code", "Task Type").colored("task_type_color"),
    Column::new("task_status_code", "Task Status").colored("task_status_color"),
    Column::new("calc_estimate", "Estimate (D)"),
    Column::new("status_description", "Status").colored("calc_status_color"),
    Column::new("calc_duration", "Duration (D)"),
    Column::new("nb_frames", "Frames"),
    Column::new("shot_count", "Shots"),
    Column::new("calc_task_real_start_date", "Work Start"),
    Column::new("calc_task_end_date", "Work End"),
    Column::new("calc_task_start_date", "Task Start"),
    Column::new("calc_task_due_date", "Task Due"),
];

const ASSET_DATA_COLUMNS: &[Column] = &[
    Column::new("project", "Project"),
    Column::new("department", "Department"),
    Column::new("entity_type", "Type"),
    Column::new("asset_name", "Asset"),
    Column::new("artists", "Assigned"),
    Column::new("task_type", "Task Type").colored("task_type_color"),
    Column::new("task_status", "Task Status").colored("task_status_color"),
    Column::new("calc_estimate", "Estimate (D)"),
    Column::new("status_description", "Status").colored("calc_status_color"),
    Column::new("calc_duration", "Duration (D)"),
    Column::new("retake_count", "Retakes"),
    Column::new("calc_task_real_start_date", "Real Start Date"),
    Column::new("calc_task_end_date", "End Date"),
    Column::new("calc_task_start_date", "Start Date"),
    Column::new("calc_task_due_date", "Due Date"),
];

const ARTIST_DATA_COLUMNS: &[Column] = &[
    Column::new("project_code", "PR"),
    Column::new("artist", "Artist"),
    Column::new("department", "Dep"),
    Column::new("task", "Task"),
    Column::new("task_type_code", "Task Type").colored("task_type_color"),
    Column::new("task_status_code", "Task Status").colored("task_status_color"),
    Column::new("status_description", "Status").colored("calc_status_color"),
    Column::new("calc_estimate", "Estimate (D)"),
    Column::new("calc_duration", "Duration (D)"),
    Column::new("retake_count", "Retakes"),
    Column::new("calc_task_real_start_date", "Real Start Date"),
    Column::new("calc_task_end_date", "End Date"),
    Column::new("calc_task_start_date", "Start Date"),
    Column::new("calc_task_due_date", "Due Date"),
];

const PROJECT_DETAILS_COLUMNS: &[Column] = &[
    Column::new("project_code", "Project"),
    Column::new("department", "Department"),
    Column::new("episode", "Episode"),
    Column::new("task_type_code", "Task Type").colored("task_type_color"),
    Column::new("task_status_code", "Task Status").colored("task_status_color"),
    Column::new("status_description", "Status").colored("calc_status_color"),
    Column::new("calc_estimate", "Est (D)"),
    Column::new("calc_duration", "Dur (D)"),
    Column::new("nb_frames", "Frames"),
    Column::new("shot_count", "Shots"),
    Column::new("calc_task_real_start_date", "Task Real Start"),
    Column::new("calc_task_end_date", "Task End"),
    Column::new("calc_task_start_date", "Task Start"),
    Column::new("calc_task_due_date", "Task Due"),
];

const SHOT_DETAILS_COLUMNS: &[Column] = &[
    Column::new("project", "Project"),
    Column::new("department", "Department"),
    Column::new("episode", "Episode"),
    Column::new("nb_frames", "Frames"),
    Column::new("shot_count", "Shots"),
    Column::new("task_type", "Task Type").colored("task_type_color"),
    Column::new("priority", "Priority"),
    Column::new("task_status", "Task Status"),
    Column::new("task_status_code", "Code").colored("task_status_color"),
    Column::new("task_estimation", "Estimation"),
    Column::new("task_duration", "Duration"),
    Column::new("retake_count", "Retakes"),
    Column::new("calc_task_real_start_date", "Real Start"),
    Column::new("calc_task_end_date", "End"),
    Column::new("calc_task_due_date", "Due"),
    Column::new("artists", "Artists"),
];

const TASK_COMMENTS_COLUMNS: &[Column] = &[
    Column::new("project", "Project"),
    Column::new("department", "Department"),
    Column::new("episode", "Episode"),
    Column::new("scene", "Scene"),
    Column::new("shot", "Shot"),
    Column::new("task_type", "Task Type").colored("task_type_color"),
    Column::new("task_status", "Task Status").colored("task_status_color"),
    Column::new("task_start_date", "Start"),
    Column::new("task_end_date", "Due"),
    Column::new("comment_text", "Comment"),
    Column::new("comment_checklist", "Checklist"),
    Column::new("preview_file_id", "Preview"),
    Column::new("last_comment_date", "Last Comment"),
];

const PROJECT_NAV_COLUMNS: &[Column] = &[
    Column::new("project", "Project"),
    Column::new("department", "Department"),
    Column::new("episode", "Episode"),
    Column::new("nb_frames", "Frames"),
    Column::new("shot_count", "Shots"),
    Column::new("task_type", "Task Type"),
    Column::new("priority", "Priority"),
    Column::new("task_status", "Task Status"),
    Column::new("task_status_code", "Code").colored("task_status_color"),
    Column::new("task_estimation", "Estimation"),
    Column::new("task_duration", "Duration"),
    Column::new("retake_count", "Retakes"),
    Column::new("calc_task_real_start_date", "Real Start"),
    Column::new("calc_task_end_date", "End"),
    Column::new("calc_task_start_date", "Start"),
    Column::new("calc_task_due_date", "Due"),
    Column::new("artists", "Artists"),
];

const PROJECT_TIMELINE: &[TimelineSpec] = &[TimelineSpec {
    title: "",
    x_start: "start_date",
    x_end: "end_date",
    y: "name",
    color: ColorBy::Continuous("perc_completed"),
    hover: Some("name"),
}];

const ARTIST_TIMELINES: &[TimelineSpec] = &[
    TimelineSpec {
        title: "artist task timeline",
        x_start: "task_start_date",
        x_end: "task_end_date",
        y: "project",
        color: ColorBy::Discrete("artist"),
        hover: Some("task"),
    },
    TimelineSpec {
        title: "artist work timeline",
        x_start: "task_real_start_date",
        x_end: "task_end_date",
        y: "project",
        color: ColorBy::Discrete("artist"),
        hover: Some("task"),
    },
];

const EPISODE_TIMELINE: &[TimelineSpec] = &[TimelineSpec {
    title: "",
    x_start: "task_start_date",
    x_end: "task_end_date",
    y: "episode",
    color: ColorBy::Discrete("department"),
    hover: Some("task_type"),
}];

const COMMENT_TIMELINE: &[TimelineSpec] = &[TimelineSpec {
    title: "",
    x_start: "task_start_date",
    x_end: "task_end_date",
    y: "task_type",
    color: ColorBy::Discrete("task_status"),
    hover: Some("shot"),
}];

impl Page {
    /// Every page in navigation order.
    pub fn all() -> [Page; 8] {
        [
            Page::ProjectsSummary,
            Page::ShotData,
            Page::AssetData,
            Page::ArtistData,
            Page::ProjectDetails,
            Page::ShotDetails,
            Page::TaskComments,
            Page::ProjectNav,
        ]
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Page::ProjectsSummary => "projects-summary",
            Page::ShotData => "shot-data",
            Page::AssetData => "asset-data",
            Page::ArtistData => "artist-data",
            Page::ProjectDetails => "project-details",
            Page::ShotDetails => "shot-details",
            Page::TaskComments => "task-comments",
            Page::ProjectNav => "project-nav",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Page::ProjectsSummary => "/projects-summary",
            Page::ShotData => "/shot-data",
            Page::AssetData => "/asset-data",
            Page::ArtistData => "/artist-data",
            Page::ProjectDetails => "/project-details",
            Page::ShotDetails => "/shot-details",
            Page::TaskComments => "/task-comments",
            Page::ProjectNav => "/project-nav",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::ProjectsSummary => "Projects Summary",
            Page::ShotData => "Shot Data",
            Page::AssetData => "Asset Data",
            Page::ArtistData => "Artist Data",
            Page::ProjectDetails => "Project Details",
            Page::ShotDetails => "Shot Details",
            Page::TaskComments => "Task Comments",
            Page::ProjectNav => "Project Nav",
        }
    }

    /// Position in the navigation bar.
    pub fn order(&self) -> u32 {
        match self {
            Page::ProjectsSummary => 1,
            Page::ShotData => 15,
            Page::AssetData => 20,
            Page::ArtistData => 25,
            Page::ProjectDetails => 30,
            Page::ShotDetails => 40,
            Page::TaskComments => 60,
            Page::ProjectNav => 100,
        }
    }

    pub fn from_slug(slug: &str) -> Option<Page> {
        Page::all().into_iter().find(|p| p.slug() == slug)
    }

    /// Prefix of the window button ids, e.g. `artist_data`.
    pub fn prefix(&self) -> String {
        self.slug().replace('-', "_")
    }

    /// Dropdowns shown on the page, in display order.
    pub fn filter_fields(&self) -> &'static [&'static str] {
        match self {
            Page::ProjectsSummary => &["project", "project_status"],
            Page::ShotData | Page::AssetData => TASK_FILTERS,
            Page::ArtistData => &["project", "department", "artist", "task_type", "task_status"],
            Page::ProjectDetails | Page::ShotDetails | Page::TaskComments => EPISODE_FILTERS,
            Page::ProjectNav => &["project", "department", "episode"],
        }
    }

    pub fn cascade(&self) -> Option<Cascade> {
        match self {
            Page::ArtistData => Some(Cascade {
                field: "artist",
                parents: &["project", "department"],
            }),
            Page::ProjectDetails | Page::ShotDetails | Page::TaskComments => Some(EPISODE_CASCADE),
            _ => None,
        }
    }

    /// Whether the page offers the last week / now / next week buttons.
    pub fn has_window(&self) -> bool {
        matches!(self, Page::ShotData | Page::ArtistData)
    }

    pub fn columns(&self) -> &'static [Column] {
        match self {
            Page::ProjectsSummary => PROJECTS_SUMMARY_COLUMNS,
            Page::ShotData => SHOT_DATA_COLUMNS,
            Page::AssetData => ASSET_DATA_COLUMNS,
            Page::ArtistData => ARTIST_DATA_COLUMNS,
            Page::ProjectDetails => PROJECT_DETAILS_COLUMNS,
            Page::ShotDetails => SHOT_DETAILS_COLUMNS,
            Page::TaskComments => TASK_COMMENTS_COLUMNS,
            Page::ProjectNav => PROJECT_NAV_COLUMNS,
        }
    }

    pub fn charts(&self) -> &'static [TimelineSpec] {
        match self {
            Page::ProjectsSummary => PROJECT_TIMELINE,
            Page::ArtistData => ARTIST_TIMELINES,
            Page::ProjectDetails | Page::ShotDetails => EPISODE_TIMELINE,
            Page::TaskComments => COMMENT_TIMELINE,
            Page::ShotData | Page::AssetData | Page::ProjectNav => &[],
        }
    }

    /// URL prefix a chart click appends the bar's label to.
    pub fn drilldown(&self) -> Option<&'static str> {
        match self {
            Page::ProjectsSummary => Some("/project-details?project_name="),
            _ => None,
        }
    }
}

fn field_label(field: &str) -> &str {
    match field {
        "project" => "Project",
        "project_status" => "Project Status",
        "department" => "Department",
        "episode" => "Episode",
        "artist" => "Artist",
        "task_type" => "Task Type",
        "task_status" => "Task Status",
        other => other,
    }
}

/// What a request asks a page to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRequest {
    pub selection: Selection,
    pub window: DateWindow,
    /// 1-based table page.
    pub page: usize,
}

impl ViewRequest {
    /// Build a request from decoded query pairs.
    ///
    /// Dropdown values come as repeated keys (`project=A&project=B`). The
    /// window is read from `trigger` (the id of the button pressed) or
    /// `window`; `project_name` preselects a project, as used by the
    /// projects summary drill-down.
    pub fn from_pairs(page: Page, pairs: &[(String, String)]) -> DashboardResult<Self> {
        let mut selection = Selection::from_pairs(pairs, page.filter_fields());
        let mut window = DateWindow::Reset;
        let mut table_page = 1;

        for (key, value) in pairs {
            match key.as_str() {
                "project_name" if !value.is_empty() && page.filter_fields().contains(&"project") => {
                    selection.select("project", value.clone());
                }
                "trigger" | "window" if page.has_window() => {
                    window = DateWindow::from_trigger(Some(value.as_str()));
                }
                "page" if !value.is_empty() => {
                    table_page = value.parse::<usize>().map_err(|_| {
                        DashboardError::invalid_value("page", "page must be a positive integer")
                    })?;
                }
                _ => {}
            }
        }

        Ok(Self {
            selection,
            window,
            page: table_page.max(1),
        })
    }

    /// Query string reproducing this request, without the table page.
    pub fn to_query(&self) -> String {
        let mut query = self.selection.to_query();
        if self.window != DateWindow::Reset {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str("window=");
            query.push_str(self.window.as_str());
        }
        query
    }
}

/// Rows and dropdown options of one page view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageData {
    /// Filtered rows, serialized with their derived columns.
    pub rows: Vec<Value>,
    /// Options of each dropdown.
    pub options: BTreeMap<&'static str, Vec<String>>,
}

/// Run the page's query and apply the request's window and selections.
pub fn load(
    db: &Database,
    page: Page,
    request: &ViewRequest,
    now: NaiveDateTime,
    window_days: i64,
) -> Result<PageData> {
    let data = match page {
        Page::ProjectsSummary => {
            let rows = db.project_summary()?;
            build(page, request, &rows, rows.clone())?
        }
        Page::ShotData | Page::ProjectDetails | Page::ShotDetails | Page::ProjectNav => {
            let rows = derive_all(db.shot_summary()?);
            let windowed = filter_by_task_date(rows.clone(), request.window, now, window_days);
            build(page, request, &rows, windowed)?
        }
        Page::AssetData => {
            let rows = derive_all(db.asset_tasks()?);
            let windowed = filter_by_task_date(rows.clone(), request.window, now, window_days);
            build(page, request, &rows, windowed)?
        }
        Page::ArtistData => {
            let rows = derive_all(db.artist_tasks()?);
            let windowed = filter_by_task_date(rows.clone(), request.window, now, window_days);
            build(page, request, &rows, windowed)?
        }
        Page::TaskComments => {
            let rows = db.task_comments()?;
            build(page, request, &rows, rows.clone())?
        }
    };

    debug!(page = page.slug(), rows = data.rows.len(), window = %request.window, "Loaded page view");
    Ok(data)
}

fn build<R: Selectable + Serialize + Clone>(
    page: Page,
    request: &ViewRequest,
    all: &[R],
    windowed: Vec<R>,
) -> Result<PageData> {
    let options = filter_options(page, &request.selection, all);
    let rows = request
        .selection
        .apply(windowed)
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PageData { rows, options })
}

/// Dropdown options: distinct values over all rows, except the cascading
/// dropdown, whose options come from rows matching its parents' selections.
pub fn filter_options<R: Selectable + Clone>(
    page: Page,
    selection: &Selection,
    rows: &[R],
) -> BTreeMap<&'static str, Vec<String>> {
    let cascade = page.cascade();
    page.filter_fields()
        .iter()
        .map(|&field| {
            let values = match cascade {
                Some(c) if c.field == field => {
                    let narrowed = selection.restricted_to(c.parents).apply(rows.to_vec());
                    unique_values(&narrowed, field)
                }
                _ => unique_values(rows, field),
            };
            (field, values)
        })
        .collect()
}

fn view_target(page: Page) -> String {
    format!("{}-view", page.slug())
}

fn render_select(page: Page, field: &str, options: &[String], selection: &Selection) -> String {
    let mut html = format!(
        r#"<label for="{slug}-{field}">{label}</label><select id="{slug}-{field}" name="{field}" multiple"#,
        slug = page.slug(),
        field = field,
        label = field_label(field),
    );
    if let Some(cascade) = page.cascade().filter(|c| c.parents.contains(&field)) {
        html.push_str(&format!(
            r##" hx-get="/api/{slug}/filters" hx-target="#{slug}-{child}-filter" hx-include="closest form" hx-trigger="change""##,
            slug = page.slug(),
            child = cascade.field,
        ));
    }
    html.push('>');
    for option in options {
        html.push_str(&format!(
            r#"<option value="{v}"{sel}>{v}</option>"#,
            v = html_escape(option),
            sel = if selection.is_selected(field, option) {
                " selected"
            } else {
                ""
            },
        ));
    }
    html.push_str("</select>");
    html
}

/// The cascading dropdown alone, as returned by `/api/<page>/filters`.
pub fn render_cascade(page: Page, data: &PageData, request: &ViewRequest) -> String {
    let Some(cascade) = page.cascade() else {
        return String::new();
    };
    let options = data
        .options
        .get(cascade.field)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    render_select(page, cascade.field, options, &request.selection)
}

/// Dropdowns and window buttons.
pub fn render_filters(page: Page, data: &PageData, request: &ViewRequest) -> String {
    let slug = page.slug();
    let mut html = format!(
        r##"<form id="{slug}-filters" class="filters" hx-get="/api/{slug}/view" hx-target="#{target}" hx-trigger="change, submit">"##,
        slug = slug,
        target = view_target(page),
    );

    let cascade_field = page.cascade().map(|c| c.field);
    for &field in page.filter_fields() {
        let options = data.options.get(field).map(Vec::as_slice).unwrap_or(&[]);
        let select = render_select(page, field, options, &request.selection);
        if cascade_field == Some(field) {
            html.push_str(&format!(
                r#"<div class="filter" id="{slug}-{field}-filter">{select}</div>"#
            ));
        } else {
            html.push_str(&format!(r#"<div class="filter">{select}</div>"#));
        }
    }

    if page.has_window() {
        let prefix = page.prefix();
        html.push_str(r#"<div class="window-buttons">"#);
        for window in DateWindow::all() {
            html.push_str(&format!(
                r#"<button type="submit" id="{prefix}_tasks_{name}" name="trigger" value="{prefix}_tasks_{name}"{active}>{label}</button>"#,
                prefix = prefix,
                name = window.as_str(),
                label = window.label(),
                active = if window == request.window && window != DateWindow::Reset {
                    r#" class="active""#
                } else {
                    ""
                },
            ));
        }
        html.push_str("</div>");
    }

    html.push_str("</form>");
    html
}

/// Table and charts for the current request.
pub fn render_view(page: Page, data: &PageData, request: &ViewRequest, page_size: usize) -> String {
    let slug = page.slug();
    let pagination = Pagination::new(request.page, page_size, data.rows.len());
    let query = request.to_query();
    let page_url = if query.is_empty() {
        format!("/api/{}/view", slug)
    } else {
        format!("/api/{}/view?{}", slug, query)
    };

    let mut html = table::render_table(
        page.columns(),
        &data.rows,
        &pagination,
        &page_url,
        &format!("#{}", view_target(page)),
    );

    for (i, spec) in page.charts().iter().enumerate() {
        let figure = charts::timeline(&data.rows, spec);
        let drilldown = page
            .drilldown()
            .map(|url| format!(r#" data-drilldown="{}""#, html_escape(url)))
            .unwrap_or_default();
        html.push_str(&format!(
            r#"<div class="chart" id="{slug}-chart-{i}" data-figure="{figure}"{drilldown}></div>"#,
            figure = html_escape(&figure.to_string()),
        ));
    }

    html
}

/// Page body: heading, filters and the refreshable view.
pub fn render_body(page: Page, data: &PageData, request: &ViewRequest, page_size: usize) -> String {
    format!(
        r#"<h1>{title}</h1>{filters}<div id="{target}" class="view">{view}</div>"#,
        title = page.title(),
        filters = render_filters(page, data, request),
        target = view_target(page),
        view = render_view(page, data, request, page_size),
    )
}

/// Navigation links, current page marked.
pub fn render_nav(current: Option<Page>) -> String {
    let mut pages = Page::all();
    pages.sort_by_key(Page::order);

    let mut html = format!(
        r#"<a href="/"{}>Home</a>"#,
        if current.is_none() { r#" class="active""# } else { "" }
    );
    for page in pages {
        html.push_str(&format!(
            r#"<a href="{path}"{active}>{title}</a>"#,
            path = page.path(),
            title = page.title(),
            active = if current == Some(page) {
                r#" class="active""#
            } else {
                ""
            },
        ));
    }
    html
}

/// Home page body: one card per page.
pub fn render_home() -> String {
    let mut html = String::from(r#"<h1>Production Dashboard</h1><div class="grid">"#);
    for page in Page::all() {
        html.push_str(&format!(
            r#"<a class="card" href="{}">{}</a>"#,
            page.path(),
            page.title()
        ));
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use serde_json::json;

    /// Decode `query` the way the handlers do, then build the request.
    fn parse_request(page: Page, query: &str) -> DashboardResult<ViewRequest> {
        let uri: axum::http::Uri = format!("/?{}", query).parse().unwrap();
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&uri).unwrap();
        ViewRequest::from_pairs(page, &pairs)
    }

    #[test]
    fn registry_is_in_navigation_order() {
        let orders: Vec<u32> = Page::all().iter().map(Page::order).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted);
        for page in Page::all() {
            assert_eq!(Page::from_slug(page.slug()), Some(page));
            assert_eq!(page.path(), format!("/{}", page.slug()));
        }
        assert_eq!(Page::from_slug("nope"), None);
    }

    #[test]
    fn request_parses_repeated_values_and_trigger() {
        let request = parse_request(
            Page::ArtistData,
            "project=Alpha&project=Beta+Two&trigger=artist_data_tasks_now&page=3&bogus=1",
        )
        .unwrap();
        assert_eq!(request.selection.values("project"), ["Alpha", "Beta Two"]);
        assert_eq!(request.window, DateWindow::Now);
        assert_eq!(request.page, 3);
        assert_eq!(request.to_query(), "project=Alpha&project=Beta%20Two&window=now");
    }

    #[test]
    fn window_is_ignored_on_pages_without_buttons() {
        let request = parse_request(Page::AssetData, "window=next_week").unwrap();
        assert_eq!(request.window, DateWindow::Reset);
    }

    #[test]
    fn project_name_preselects_project() {
        let request = parse_request(Page::ProjectDetails, "project_name=Big%20Show").unwrap();
        assert!(request.selection.is_selected("project", "Big Show"));
    }

    #[test]
    fn invalid_page_number_is_rejected() {
        let err = parse_request(Page::ShotData, "page=two").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::InvalidParameter);
        assert_eq!(err.field.as_deref(), Some("page"));
    }

    #[test]
    fn cascading_options_follow_parent_selection() {
        use crate::types::ArtistTaskRow;
        let rows = vec![
            ArtistTaskRow {
                project: "Alpha".into(),
                artist: "Ann".into(),
                ..Default::default()
            },
            ArtistTaskRow {
                project: "Beta".into(),
                artist: "Bob".into(),
                ..Default::default()
            },
        ];
        let selection = Selection::new().with("project", "Beta").with("artist", "Ann");
        let options = filter_options(Page::ArtistData, &selection, &rows);
        assert_eq!(options["project"], ["Alpha", "Beta"]);
        // The artist dropdown ignores its own selection.
        assert_eq!(options["artist"], ["Bob"]);
    }

    #[test]
    fn filters_render_selected_options_and_buttons() {
        let request = parse_request(Page::ShotData, "project=Alpha").unwrap();
        let mut data = PageData::default();
        data.options.insert("project", vec!["Alpha".into(), "B&B".into()]);
        let html = render_filters(Page::ShotData, &data, &request);
        assert!(html.contains(r#"<option value="Alpha" selected>Alpha</option>"#));
        assert!(html.contains(r#"<option value="B&amp;B">B&amp;B</option>"#));
        assert!(html.contains(r#"value="shot_data_tasks_last_week""#));
        assert!(html.contains(r##"hx-target="#shot-data-view""##));
    }

    #[test]
    fn view_embeds_escaped_figures_and_drilldown() {
        let data = PageData {
            rows: vec![json!({
                "name": "Alpha",
                "start_date": "2024-01-01",
                "end_date": "2024-03-01",
                "perc_completed": 50.0
            })],
            options: BTreeMap::new(),
        };
        let html = render_view(Page::ProjectsSummary, &data, &ViewRequest::default(), 10);
        assert!(html.contains(r#"id="projects-summary-chart-0""#));
        assert!(html.contains("data-figure=\"{&quot;data&quot;"));
        assert!(html.contains(r#"data-drilldown="/project-details?project_name=""#));
        assert!(html.contains("<td>Alpha</td>"));
    }

    #[test]
    fn nav_marks_current_page() {
        let html = render_nav(Some(Page::AssetData));
        assert!(html.contains(r#"<a href="/asset-data" class="active">Asset Data</a>"#));
        assert!(html.contains(r#"<a href="/">Home</a>"#));
    }
}
