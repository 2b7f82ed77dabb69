use std::{collections::BTreeMap, sync::Arc};

use crate::{
    backend::{DashboardMetadata, DashboardResponse, MapResponse},
    boundary::BoundaryCollection,
    diagnostics::DiagnosticsSink,
    error::CensusError,
    geography::GeoType,
    join::{join, DemographicRecord, EnrichedBoundaryCollection},
    render::{
        render_charts, render_insights, render_selector, render_summary, ChartPanel, ChartSpec,
        MapRender, SelectorEntry, SummaryPanel, SummaryStatistics, VariableLabels,
    },
    scale::ColorScale,
};

use super::viewport::Viewport;

/// Joined data and color scale for the variable currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDisplay {
    pub enriched: EnrichedBoundaryCollection,
    /// `Err(NoDataForVariable)` when no region has a usable value.
    pub scale: Result<ColorScale, CensusError>,
}

impl VariableDisplay {
    pub(crate) fn build(
        boundaries: &BoundaryCollection,
        records: &[DemographicRecord],
        level: GeoType,
        variable_id: &str,
        sink: &dyn DiagnosticsSink,
    ) -> Result<Self, CensusError> {
        let enriched = join(boundaries, records, level, variable_id, sink)?;
        let scale = ColorScale::derive(&enriched, variable_id);
        if scale.is_err() {
            sink.record("scale.no_data", &[("variable", variable_id.to_string())]);
        }
        Ok(Self { enriched, scale })
    }

    pub fn variable_id(&self) -> &str { &self.enriched.variable_id }

    pub fn render(&self, label: &str) -> MapRender {
        MapRender::new(&self.enriched, self.scale.as_ref().ok(), label)
    }
}

/// A single choropleth answering one query.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub level: GeoType,
    pub labels: VariableLabels,
    pub display: VariableDisplay,
    pub viewport: Viewport,
    pub summary: Option<String>,
}

impl MapView {
    pub(crate) fn build(
        response: MapResponse,
        boundaries: &BoundaryCollection,
        level: GeoType,
        sink: &dyn DiagnosticsSink,
    ) -> Result<Self, CensusError> {
        let MapResponse { data, metadata, summary } = response;
        let display = VariableDisplay::build(boundaries, &data, level, metadata.shown_variable(), sink)?;
        Ok(Self {
            level,
            viewport: Viewport::for_level(level, metadata.state_name.as_deref()),
            labels: metadata.variable_labels,
            display,
            summary,
        })
    }

    pub fn label(&self) -> &str { self.labels.label_for(self.display.variable_id()) }

    pub fn render(&self) -> MapRender { self.display.render(self.label()) }
}

/// Map, statistics, charts and insights over one dataset. The records stay in
/// memory so switching variables never goes back to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub level: GeoType,
    boundaries: Arc<BoundaryCollection>,
    records: Vec<DemographicRecord>,
    pub metadata: DashboardMetadata,
    pub statistics: BTreeMap<String, SummaryStatistics>,
    pub charts: Vec<ChartSpec>,
    pub insights: Option<Vec<String>>,
    pub summary_text: Option<String>,
    pub viewport: Viewport,
    pub display: VariableDisplay,
}

impl DashboardView {
    pub(crate) fn build(
        response: DashboardResponse,
        boundaries: Arc<BoundaryCollection>,
        level: GeoType,
        sink: &dyn DiagnosticsSink,
    ) -> Result<Self, CensusError> {
        let DashboardResponse { data, summary_statistics, charts, insights, summary_text, metadata } = response;
        let variable_id = metadata.initial_variable()
            .ok_or(CensusError::NoDashboardVariables)?
            .to_string();

        let display = VariableDisplay::build(&boundaries, &data, level, &variable_id, sink)?;
        Ok(Self {
            level,
            viewport: Viewport::for_level(level, metadata.state_name.as_deref()),
            boundaries,
            records: data,
            metadata,
            statistics: summary_statistics,
            charts,
            insights,
            summary_text,
            display,
        })
    }

    pub fn selected_variable(&self) -> &str { self.display.variable_id() }

    pub fn records(&self) -> &[DemographicRecord] { &self.records }

    /// Re-join the held records for `variable_id`.
    pub(crate) fn select(&mut self, variable_id: &str, sink: &dyn DiagnosticsSink) -> Result<(), CensusError> {
        if !self.metadata.offers(variable_id) {
            return Err(CensusError::UnknownVariable(variable_id.to_string()));
        }
        if variable_id == self.selected_variable() { return Ok(()) }

        self.display = VariableDisplay::build(&self.boundaries, &self.records, self.level, variable_id, sink)?;
        Ok(())
    }

    pub fn label(&self) -> &str { self.metadata.variable_labels.label_for(self.selected_variable()) }

    pub fn render_map(&self) -> MapRender { self.display.render(self.label()) }

    pub fn summary_panel(&self) -> SummaryPanel {
        render_summary(&self.statistics, &self.metadata.variable_labels, self.selected_variable())
    }

    pub fn chart_panel(&self) -> ChartPanel {
        render_charts(&self.charts, &self.metadata.variable_labels)
    }

    pub fn selector(&self) -> Vec<SelectorEntry> {
        render_selector(&self.metadata.available_variables, self.selected_variable())
    }

    pub fn insights(&self) -> Option<&[String]> {
        render_insights(self.insights.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Chat,
    SingleMap,
    Dashboard,
}

/// What is on screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Chat,
    SingleMap(MapView),
    Dashboard(DashboardView),
}

impl View {
    pub fn kind(&self) -> ViewKind {
        match self {
            View::Chat => ViewKind::Chat,
            View::SingleMap(_) => ViewKind::SingleMap,
            View::Dashboard(_) => ViewKind::Dashboard,
        }
    }

    /// The map currently displayed, whichever view holds it.
    pub fn map_render(&self) -> Option<MapRender> {
        match self {
            View::Chat => None,
            View::SingleMap(map) => Some(map.render()),
            View::Dashboard(dashboard) => Some(dashboard.render_map()),
        }
    }
}
