use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    format::{fixed, grouped},
    VariableLabels,
};

/// Precomputed statistics for one variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub count: Option<u64>,
    pub min_entity_name: Option<String>,
    pub max_entity_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryPanel {
    NoStatistics { label: String, message: &'static str },
    Stats {
        label: String,
        rows: Vec<(&'static str, String)>,
        /// (lowest, highest) region names, when both are known.
        extremes: Option<(String, String)>,
    },
}

pub fn render_summary(
    statistics: &BTreeMap<String, SummaryStatistics>,
    labels: &VariableLabels,
    variable_id: &str,
) -> SummaryPanel {
    let label = labels.label_for(variable_id).to_string();
    let Some(stats) = statistics.get(variable_id) else {
        return SummaryPanel::NoStatistics {
            label,
            message: "No statistics available for the selected variable.",
        };
    };

    let rows = vec![
        ("Mean", format_stat(stats.mean, variable_id)),
        ("Median", format_stat(stats.median, variable_id)),
        ("Minimum", format_stat(stats.min, variable_id)),
        ("Maximum", format_stat(stats.max, variable_id)),
        ("Count", stats.count.map_or_else(|| "N/A".to_string(), |c| c.to_string())),
    ];

    let extremes = stats.min_entity_name.clone().zip(stats.max_entity_name.clone());

    SummaryPanel::Stats { label, rows, extremes }
}

/// Percentages for rate-like variable ids, grouped for large numbers,
/// otherwise two decimals.
pub fn format_stat(value: Option<f64>, variable_id: &str) -> String {
    let Some(value) = value else { return "N/A".to_string() };
    if variable_id.contains("percentage") || variable_id.contains("rate") {
        return format!("{}%", fixed(value, 1));
    }
    if value.abs() >= 1000.0 {
        return grouped(value);
    }
    fixed(value, 2)
}
