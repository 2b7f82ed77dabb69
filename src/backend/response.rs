use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    join::DemographicRecord,
    render::{ChartSpec, SummaryStatistics, VariableLabels, VariableOption},
};

/// Everything the backend can answer with, dispatched on its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QueryResponse {
    #[serde(rename = "text")]
    Text { response: String },
    #[serde(rename = "map")]
    Map(MapResponse),
    #[serde(rename = "dashboard_data")]
    Dashboard(DashboardResponse),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapResponse {
    #[serde(default)]
    pub data: Vec<DemographicRecord>,
    pub metadata: MapMetadata,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMetadata {
    pub geography_level: String,
    pub variable_id: String,
    #[serde(default)]
    pub display_variable_id: Option<String>,
    #[serde(default)]
    pub variable_labels: VariableLabels,
    #[serde(default)]
    pub state_name: Option<String>,
}

impl MapMetadata {
    /// The variable to color by: the display variable when given.
    pub fn shown_variable(&self) -> &str {
        self.display_variable_id.as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.variable_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    #[serde(default)]
    pub data: Vec<DemographicRecord>,
    #[serde(default)]
    pub summary_statistics: BTreeMap<String, SummaryStatistics>,
    #[serde(default)]
    pub charts: Vec<ChartSpec>,
    #[serde(default)]
    pub insights: Option<Vec<String>>,
    #[serde(default)]
    pub summary_text: Option<String>,
    pub metadata: DashboardMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetadata {
    pub geography_level: String,
    #[serde(default)]
    pub display_variable_id: Option<String>,
    #[serde(default)]
    pub available_variables: Vec<VariableOption>,
    #[serde(default)]
    pub variable_labels: VariableLabels,
    #[serde(default)]
    pub state_name: Option<String>,
}

impl DashboardMetadata {
    /// Initially selected variable: the display variable, else the first available one.
    pub fn initial_variable(&self) -> Option<&str> {
        self.display_variable_id.as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.available_variables.first().map(|v| v.id.as_str()))
    }

    pub fn offers(&self, variable_id: &str) -> bool {
        self.available_variables.iter().any(|v| v.id == variable_id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn text_response() {
        let response: QueryResponse = serde_json::from_value(json!({"type": "text", "response": "Hi"})).unwrap();
        assert_eq!(response, QueryResponse::Text { response: "Hi".into() });
    }

    #[test]
    fn map_response_without_optional_fields() {
        let response: QueryResponse = serde_json::from_value(json!({
            "type": "map",
            "data": [{"state": "06", "B01003_001E": 39538223}],
            "metadata": {"geography_level": "state", "variable_id": "B01003_001E"},
        }))
        .unwrap();

        let QueryResponse::Map(map) = response else { panic!("expected map") };
        assert_eq!(map.metadata.shown_variable(), "B01003_001E");
        assert_eq!(map.metadata.variable_labels.label_for("B01003_001E"), "B01003_001E");
        assert_eq!(map.data.len(), 1);
        assert!(map.summary.is_none());
    }

    #[test]
    fn dashboard_response() {
        let response: QueryResponse = serde_json::from_value(json!({
            "type": "dashboard_data",
            "data": [],
            "summary_statistics": {"income": {"mean": 1.5, "count": 3}},
            "charts": [{"chart_type": "bar_chart", "title": "t", "variable_id": "income", "data": [{"name": "A", "value": 1}]}],
            "summary_text": "Income by state",
            "metadata": {
                "geography_level": "county",
                "display_variable_id": "income",
                "available_variables": [{"id": "income", "name": "Income"}, {"id": "age", "name": "Age"}],
                "variable_labels": {"income": "Income"},
            },
        }))
        .unwrap();

        let QueryResponse::Dashboard(dash) = response else { panic!("expected dashboard") };
        assert_eq!(dash.metadata.initial_variable(), Some("income"));
        assert!(dash.metadata.offers("age"));
        assert!(dash.insights.is_none());
        assert_eq!(dash.summary_statistics["income"].count, Some(3));
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(serde_json::from_value::<QueryResponse>(json!({"type": "video"})).is_err());
    }
}
