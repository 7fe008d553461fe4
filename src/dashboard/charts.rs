//! Plotly timeline (Gantt) figures.
//!
//! Figures are emitted as Plotly.js figure JSON (`{"data": [...], "layout":
//! {...}}`) and drawn in the browser. A timeline is a horizontal bar chart on
//! a date axis: each bar starts at `base` and is `x` milliseconds long.

use crate::calcs::parse_date;
use chrono::NaiveDate;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Default qualitative palette, in the order Plotly assigns it.
const PALETTE: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Grey to green, for completion percentages.
const PROGRESS_SCALE: [(f64, &str); 2] = [(0.0, "grey"), (1.0, "green")];

/// How bars are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBy {
    /// One trace per distinct value of the field, with a legend entry each.
    Discrete(&'static str),
    /// A single trace colored along a grey-to-green scale by a numeric field.
    Continuous(&'static str),
}

/// What a timeline plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineSpec {
    pub title: &'static str,
    pub x_start: &'static str,
    pub x_end: &'static str,
    pub y: &'static str,
    pub color: ColorBy,
    /// Field shown as the bar's hover title.
    pub hover: Option<&'static str>,
}

/// One bar after grouping.
#[derive(Debug, Clone, PartialEq)]
struct Bar {
    y: String,
    color: String,
    start: NaiveDate,
    end: NaiveDate,
    hover: Vec<String>,
    totals: BTreeMap<String, f64>,
}

fn field_text(row: &Value, field: &str) -> String {
    match row.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn field_date(row: &Value, field: &str) -> Option<NaiveDate> {
    row.get(field)
        .and_then(Value::as_str)
        .and_then(parse_date)
        .map(|dt| dt.date())
}

/// Group rows into bars keyed by (y, color, start day, end day), summing
/// numeric fields. Rows missing either date are dropped.
fn group_bars(rows: &[Value], spec: &TimelineSpec) -> Vec<Bar> {
    let color_field = match spec.color {
        ColorBy::Discrete(f) | ColorBy::Continuous(f) => f,
    };
    let discrete = matches!(spec.color, ColorBy::Discrete(_));

    let mut bars: Vec<Bar> = Vec::new();
    let mut index: BTreeMap<(String, String, NaiveDate, NaiveDate), usize> = BTreeMap::new();

    for row in rows {
        let (Some(start), Some(end)) = (field_date(row, spec.x_start), field_date(row, spec.x_end))
        else {
            continue;
        };
        let y = field_text(row, spec.y);
        // Continuous colors are summed, not part of the key.
        let color = if discrete {
            field_text(row, color_field)
        } else {
            String::new()
        };

        let key = (y.clone(), color.clone(), start, end);
        let i = *index.entry(key).or_insert_with(|| {
            bars.push(Bar {
                y,
                color,
                start,
                end,
                hover: Vec::new(),
                totals: BTreeMap::new(),
            });
            bars.len() - 1
        });

        let bar = &mut bars[i];
        if let Some(hover) = spec.hover {
            let text = field_text(row, hover);
            if !text.is_empty() && !bar.hover.contains(&text) {
                bar.hover.push(text);
            }
        }
        if let Some(object) = row.as_object() {
            for (field, value) in object {
                if let Some(n) = value.as_f64() {
                    *bar.totals.entry(field.clone()).or_insert(0.0) += n;
                }
            }
        }
    }

    bars
}

fn iso_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn length_ms(bar: &Bar) -> i64 {
    (bar.end - bar.start).num_milliseconds()
}

fn hover_text(bar: &Bar) -> String {
    let title = if bar.hover.is_empty() {
        bar.y.clone()
    } else {
        bar.hover.join(", ")
    };
    format!("{}<br>{} - {}", title, iso_day(bar.start), iso_day(bar.end))
}

fn trace(name: &str, bars: &[&Bar]) -> Map<String, Value> {
    let mut trace = Map::new();
    trace.insert("type".into(), json!("bar"));
    trace.insert("orientation".into(), json!("h"));
    trace.insert("name".into(), json!(name));
    trace.insert("legendgroup".into(), json!(name));
    trace.insert(
        "base".into(),
        json!(bars.iter().map(|b| iso_day(b.start)).collect::<Vec<_>>()),
    );
    trace.insert("x".into(), json!(bars.iter().map(|b| length_ms(b)).collect::<Vec<_>>()));
    trace.insert("y".into(), json!(bars.iter().map(|b| b.y.clone()).collect::<Vec<_>>()));
    trace.insert(
        "hovertext".into(),
        json!(bars.iter().map(|b| hover_text(b)).collect::<Vec<_>>()),
    );
    trace.insert("hoverinfo".into(), json!("text"));
    trace
}

/// Build the Plotly figure for `rows`.
pub fn timeline(rows: &[Value], spec: &TimelineSpec) -> Value {
    let bars = group_bars(rows, spec);

    let data: Vec<Value> = match spec.color {
        ColorBy::Discrete(_) => {
            // Legend order follows first appearance.
            let mut groups: Vec<(&str, Vec<&Bar>)> = Vec::new();
            for bar in &bars {
                match groups.iter_mut().find(|(name, _)| *name == bar.color) {
                    Some((_, members)) => members.push(bar),
                    None => groups.push((bar.color.as_str(), vec![bar])),
                }
            }
            groups
                .iter()
                .enumerate()
                .map(|(i, (name, members))| {
                    let mut t = trace(name, members);
                    t.insert(
                        "marker".into(),
                        json!({"color": PALETTE[i % PALETTE.len()]}),
                    );
                    t.insert("showlegend".into(), json!(true));
                    Value::Object(t)
                })
                .collect()
        }
        ColorBy::Continuous(field) => {
            if bars.is_empty() {
                Vec::new()
            } else {
                let members: Vec<&Bar> = bars.iter().collect();
                let mut t = trace("", &members);
                let values: Vec<f64> = bars
                    .iter()
                    .map(|b| b.totals.get(field).copied().unwrap_or(0.0))
                    .collect();
                t.insert(
                    "marker".into(),
                    json!({
                        "color": values,
                        "colorscale": PROGRESS_SCALE
                            .iter()
                            .map(|(stop, color)| json!([stop, color]))
                            .collect::<Vec<_>>(),
                        "cmin": 0,
                        "cmax": 100,
                        "showscale": true,
                        "colorbar": {"title": {"text": field}},
                    }),
                );
                t.insert("showlegend".into(), json!(false));
                vec![Value::Object(t)]
            }
        }
    };

    json!({
        "data": data,
        "layout": {
            "title": {"text": spec.title, "x": 0.5},
            "font": {"size": 16},
            "barmode": "overlay",
            "showlegend": matches!(spec.color, ColorBy::Discrete(_)),
            "xaxis": {"type": "date", "title": {"text": ""}},
            "yaxis": {"title": {"text": ""}, "automargin": true, "autorange": "reversed"},
        }
    })
}
