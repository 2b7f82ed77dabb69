use serde::{Deserialize, Serialize};

use super::{
    format::{compact_tick, fixed, grouped},
    VariableLabels,
};

/// Chart payload as precomputed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub chart_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub variable_id: String,
    #[serde(default)]
    pub data: Vec<ChartDatum>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDatum {
    pub name: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub category: String,
    pub value: Option<f64>,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub series_name: String,
    pub bars: Vec<Bar>,
    /// Value axis range, always including zero.
    pub range: (f64, f64),
    pub ticks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    Bar(BarChart),
    Unsupported { chart_type: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartPanel {
    Empty { message: &'static str },
    Charts(Vec<ChartView>),
}

const TICK_COUNT: usize = 5;

pub fn render_charts(charts: &[ChartSpec], labels: &VariableLabels) -> ChartPanel {
    if charts.is_empty() {
        return ChartPanel::Empty { message: "No chart data available." };
    }

    ChartPanel::Charts(charts.iter()
        .map(|chart| match chart.chart_type.as_str() {
            "bar_chart" => ChartView::Bar(bar_chart(chart, labels)),
            other => ChartView::Unsupported { chart_type: other.to_string() },
        })
        .collect())
}

fn bar_chart(chart: &ChartSpec, labels: &VariableLabels) -> BarChart {
    let series_name = labels.label_for(&chart.variable_id).to_string();

    let bars = chart.data.iter()
        .map(|datum| Bar {
            category: datum.name.clone(),
            value: datum.value,
            tooltip: tooltip_value(datum.value, &series_name),
        })
        .collect();

    let range = chart.data.iter()
        .filter_map(|datum| datum.value.filter(|v| v.is_finite()))
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

    let ticks = (0..TICK_COUNT)
        .map(|i| range.0 + (range.1 - range.0) * i as f64 / (TICK_COUNT - 1) as f64)
        .map(compact_tick)
        .collect();

    BarChart { title: chart.title.clone(), series_name, bars, range, ticks }
}

/// Tooltip value: percentages for rate-like series, grouped for large numbers,
/// otherwise two decimals.
pub fn tooltip_value(value: Option<f64>, series_name: &str) -> String {
    let Some(value) = value else { return "No data".to_string() };
    if ["%", "Rate", "Percentage"].iter().any(|marker| series_name.contains(marker)) {
        return format!("{}%", fixed(value, 1));
    }
    if value.abs() >= 1000.0 {
        return grouped(value);
    }
    fixed(value, 2)
}
