use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    join::EnrichedBoundaryCollection,
    scale::{ColorScale, Legend, Rgb, NO_DATA},
};

use super::format::grouped;

const STROKE: Rgb = Rgb::new(0x66, 0x66, 0x66);
const HOVER_STROKE: Rgb = Rgb::new(0x33, 0x33, 0x33);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureStyle {
    pub fill_color: Rgb,
    pub weight: f64,
    pub opacity: f64,
    pub color: Rgb,
    pub fill_opacity: f64,
}

impl FeatureStyle {
    pub fn base(fill_color: Rgb) -> Self {
        Self { fill_color, weight: 1.0, opacity: 1.0, color: STROKE, fill_opacity: 0.7 }
    }

    /// Style with hover emphasis applied, or `self` unchanged when not hovered.
    pub fn with_hover(self, hovered: bool) -> Self {
        if !hovered { return self }
        Self { weight: 2.0, color: HOVER_STROKE, fill_opacity: 0.9, ..self }
    }
}

/// Render state of one region on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRegion {
    pub id: Option<String>,
    pub name: String,
    pub value: Option<f64>,
    pub base: FeatureStyle,
    pub tooltip: String,
}

/// Whether the map has a usable color scale.
#[derive(Debug, Clone, PartialEq)]
pub enum MapStatus {
    Ready(Legend),
    NoData { message: String },
}

/// A fully styled choropleth, ready for a drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRender {
    pub regions: Vec<StyledRegion>,
    pub status: MapStatus,
    hovered: Option<usize>,
}

impl MapRender {
    /// Style `enriched` with `scale`. Without a scale every region is drawn as
    /// "no data" and the status carries the explanation.
    pub fn new(enriched: &EnrichedBoundaryCollection, scale: Option<&ColorScale>, label: &str) -> Self {
        let variable_id = enriched.variable_id.as_str();
        let ty = enriched.ty;

        let regions = enriched.regions().iter()
            .map(|region| {
                let value = region.value(variable_id);
                let fill = scale.map_or(NO_DATA, |s| s.color_for_optional(value));
                let name = region.name().unwrap_or("Unknown").to_string();
                StyledRegion {
                    id: region.key(ty).map(|key| key.id.to_string()),
                    tooltip: tooltip(&name, label, value),
                    name,
                    value,
                    base: FeatureStyle::base(fill),
                }
            })
            .collect();

        let status = match scale {
            Some(scale) => MapStatus::Ready(scale.legend(label)),
            None => MapStatus::NoData { message: format!("No data available for {label}.") },
        };

        Self { regions, status, hovered: None }
    }

    pub fn legend(&self) -> Option<&Legend> {
        match &self.status {
            MapStatus::Ready(legend) => Some(legend),
            MapStatus::NoData { .. } => None,
        }
    }

    pub fn set_hover(&mut self, idx: Option<usize>) {
        self.hovered = idx.filter(|&i| i < self.regions.len());
    }

    pub fn hovered(&self) -> Option<usize> { self.hovered }

    /// Current style of region `idx`.
    pub fn style(&self, idx: usize) -> Option<FeatureStyle> {
        self.regions.get(idx).map(|region| region.base.with_hover(self.hovered == Some(idx)))
    }

    /// Export as a GeoJSON FeatureCollection with resolved styles in each
    /// feature's properties. Geometry comes from `enriched`, which must be the
    /// collection this render was built from.
    pub fn to_geojson(&self, enriched: &EnrichedBoundaryCollection) -> anyhow::Result<Value> {
        if enriched.len() != self.regions.len() {
            anyhow::bail!(
                "[render::map] Region count ({}) does not match render count ({})",
                enriched.len(),
                self.regions.len()
            );
        }

        let features: Vec<Value> = enriched.regions().iter()
            .zip(&self.regions)
            .enumerate()
            .map(|(idx, (region, styled))| {
                let mut properties = region.properties.clone();
                let style = self.style(idx).unwrap_or(styled.base);
                properties.insert("_style".to_string(), json!(style));
                properties.insert("_tooltip".to_string(), json!(styled.tooltip));

                let id = styled.id.clone().unwrap_or_else(|| idx.to_string());
                json!({
                    "type": "Feature",
                    "id": id,
                    "geometry": region.geometry,
                    "properties": properties,
                })
            })
            .collect();

        Ok(json!({
            "type": "FeatureCollection",
            "features": features,
        }))
    }
}

/// Hover text: region name, then the variable label and formatted value.
pub fn tooltip(name: &str, label: &str, value: Option<f64>) -> String {
    let value = value.map_or_else(|| "No data".to_string(), grouped);
    format!("{name}\n{label}: {value}")
}
