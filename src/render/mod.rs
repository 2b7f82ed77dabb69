//! Display models for the map, chart and summary panels.

mod chart;
pub mod format;
mod map;
mod summary;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use chart::{render_charts, tooltip_value, Bar, BarChart, ChartDatum, ChartPanel, ChartSpec, ChartView};
pub use map::{tooltip, FeatureStyle, MapRender, MapStatus, StyledRegion};
pub use summary::{format_stat, render_summary, SummaryPanel, SummaryStatistics};

/// Human-readable names of variable ids; unknown ids label themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableLabels(BTreeMap<String, String>);

impl VariableLabels {
    pub fn new(labels: BTreeMap<String, String>) -> Self { Self(labels) }

    pub fn label_for<'a>(&'a self, variable_id: &'a str) -> &'a str {
        self.0.get(variable_id).map_or(variable_id, String::as_str)
    }
}

/// One entry of the dashboard variable picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableOption {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorEntry {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

pub fn render_selector(options: &[VariableOption], selected: &str) -> Vec<SelectorEntry> {
    options.iter()
        .map(|option| SelectorEntry {
            id: option.id.clone(),
            name: option.name.clone(),
            selected: option.id == selected,
        })
        .collect()
}

/// Insights section; `None` when there is nothing to show.
pub fn render_insights(insights: Option<&[String]>) -> Option<&[String]> {
    insights.filter(|items| !items.is_empty())
}
