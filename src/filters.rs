//! Dropdown selections and the set-membership filtering they drive.

use crate::types::Selectable;
use std::collections::{BTreeMap, HashSet};

/// Values chosen in each dropdown of a page.
///
/// A field with no chosen values does not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    fields: BTreeMap<String, Vec<String>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from query pairs, keeping only the listed fields.
    pub fn from_pairs(pairs: &[(String, String)], fields: &[&str]) -> Self {
        let mut selection = Self::new();
        for (key, value) in pairs {
            if fields.contains(&key.as_str()) && !value.is_empty() {
                selection.select(key, value);
            }
        }
        selection
    }

    /// Add `value` to the chosen values of `field`.
    pub fn select(&mut self, field: &str, value: impl Into<String>) {
        let value = value.into();
        let values = self.fields.entry(field.to_string()).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    /// Builder form of [`Selection::select`].
    pub fn with(mut self, field: &str, value: impl Into<String>) -> Self {
        self.select(field, value);
        self
    }

    /// Chosen values of `field`, empty when nothing is chosen.
    pub fn values(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_selected(&self, field: &str, value: &str) -> bool {
        self.values(field).iter().any(|v| v == value)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(Vec::is_empty)
    }

    /// A copy holding only the listed fields.
    pub fn restricted_to(&self, fields: &[&str]) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .filter(|(k, _)| fields.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Whether `row` passes every non-empty field. A row whose column is NULL
    /// never matches a non-empty field.
    pub fn matches<R: Selectable + ?Sized>(&self, row: &R) -> bool {
        self.fields
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .all(|(field, values)| {
                row.field(field)
                    .is_some_and(|value| values.iter().any(|v| v == value))
            })
    }

    /// Keep the rows passing [`Selection::matches`].
    pub fn apply<R: Selectable>(&self, rows: Vec<R>) -> Vec<R> {
        if self.is_empty() {
            return rows;
        }
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }

    /// Encode back into query pairs, e.g. for drill-down links.
    pub fn to_query(&self) -> String {
        self.fields
            .iter()
            .flat_map(|(field, values)| {
                values
                    .iter()
                    .map(move |v| format!("{}={}", field, urlencoding::encode(v)))
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Distinct non-NULL values of `field`, in order of first appearance.
pub fn unique_values<R: Selectable>(rows: &[R], field: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|row| row.field(field))
        .filter(|value| seen.insert(*value))
        .map(String::from)
        .collect()
}
