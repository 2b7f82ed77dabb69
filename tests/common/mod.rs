#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use census_map::{
    backend::{QueryBackend, QueryResponse},
    boundary::MemBoundarySource,
    BackendError, GeoType,
};
use serde_json::{json, Value};

/// Backend answering from a queue of canned responses.
#[derive(Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<QueryResponse, BackendError>>>,
    calls: AtomicUsize,
    pings: AtomicUsize,
    hang_on_ping: bool,
}

impl ScriptedBackend {
    pub fn new(responses: impl IntoIterator<Item = Result<QueryResponse, BackendError>>) -> Self {
        Self { responses: Mutex::new(responses.into_iter().collect()), ..Default::default() }
    }

    /// A backend whose warm-up ping never answers.
    pub fn unresponsive() -> Self {
        Self { hang_on_ping: true, ..Default::default() }
    }

    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

    pub fn pings(&self) -> usize { self.pings.load(Ordering::SeqCst) }
}

#[async_trait]
impl QueryBackend for ScriptedBackend {
    async fn ask(&self, _query: &str) -> Result<QueryResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses.lock().unwrap().pop_front()
            .unwrap_or_else(|| Ok(QueryResponse::Text { response: "No more answers.".into() }))
    }

    async fn ping(&self) -> Result<(), BackendError> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        if self.hang_on_ping {
            futures::future::pending::<()>().await;
        }
        Err(BackendError::Transport("cold start".into()))
    }
}

pub fn response(value: Value) -> Result<QueryResponse, BackendError> {
    Ok(serde_json::from_value(value).unwrap())
}

fn square(x: f64, y: f64) -> Value {
    json!({"type": "Polygon", "coordinates": [[[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y]]]})
}

pub fn states_geojson() -> String {
    json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"STATEFP": "06", "NAME": "California"}, "geometry": square(0.0, 0.0)},
            {"type": "Feature", "properties": {"STATEFP": "48", "NAME": "Texas"}, "geometry": square(1.0, 0.0)},
            {"type": "Feature", "properties": {"STATE": "36", "NAME": "New York"}, "geometry": square(2.0, 0.0)},
        ]
    })
    .to_string()
}

pub fn counties_geojson() -> String {
    json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"STATEFP": "06", "COUNTYFP": "001", "NAME": "Alameda"}, "geometry": square(0.0, 0.0)},
            {"type": "Feature", "properties": {"STATEFP": "06", "COUNTYFP": "037", "NAME": "Los Angeles"}, "geometry": square(0.0, 1.0)},
            {"type": "Feature", "properties": {"STATE": "36", "COUNTY": "061", "NAME": "New York"}, "geometry": square(2.0, 0.0)},
        ]
    })
    .to_string()
}

pub fn country_geojson() -> String {
    json!({
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"NAME": "United States"}, "geometry": square(0.0, 0.0)},
        ]
    })
    .to_string()
}

pub fn boundaries() -> MemBoundarySource {
    MemBoundarySource::default()
        .with(GeoType::State, states_geojson())
        .with(GeoType::County, counties_geojson())
        .with(GeoType::Country, country_geojson())
}

pub fn state_map(variable_id: &str) -> Value {
    json!({
        "type": "map",
        "data": [
            {"state": "06", "B01003_001E": 39538223, "B19013_001E": 84097},
            {"state": "48", "B01003_001E": 29145505, "B19013_001E": 67321},
        ],
        "metadata": {
            "geography_level": "state",
            "variable_id": variable_id,
            "variable_labels": {"B01003_001E": "Total Population"},
        },
        "summary": "Population by state.",
    })
}

pub fn county_dashboard() -> Value {
    json!({
        "type": "dashboard_data",
        "data": [
            {"state": "6", "county": "1", "median_income": 112017, "poverty_rate": 9.3},
            {"state": "6", "county": "37", "median_income": 76367, "poverty_rate": 13.7},
            {"state": "36", "county": "61", "median_income": null, "poverty_rate": 15.6},
        ],
        "summary_statistics": {
            "median_income": {"mean": 94192.0, "median": 94192.0, "min": 76367.0, "max": 112017.0, "count": 2,
                              "min_entity_name": "Los Angeles", "max_entity_name": "Alameda"}
        },
        "charts": [
            {"chart_type": "bar_chart", "title": "Median income", "variable_id": "median_income",
             "data": [{"name": "Alameda", "value": 112017}, {"name": "Los Angeles", "value": 76367}]}
        ],
        "insights": ["Alameda has the highest median income."],
        "summary_text": "Income and poverty in California counties.",
        "metadata": {
            "geography_level": "county",
            "display_variable_id": "median_income",
            "available_variables": [
                {"id": "median_income", "name": "Median Household Income"},
                {"id": "poverty_rate", "name": "Poverty Rate"}
            ],
            "variable_labels": {"median_income": "Median Household Income", "poverty_rate": "Poverty Rate"},
            "state_name": "California"
        }
    })
}
