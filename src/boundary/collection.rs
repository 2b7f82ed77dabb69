use ahash::AHashSet;
use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Map, Value};

use crate::geography::{GeoType, JoinKey};

/// A single boundary feature: identifying attributes plus an opaque geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub properties: Map<String, Value>,
    pub geometry: Value, // GeoJSON geometry, passed through untouched
}

impl Region {
    pub fn new(properties: Map<String, Value>, geometry: Value) -> Self {
        Self { properties, geometry }
    }

    pub fn key(&self, ty: GeoType) -> Option<JoinKey> {
        JoinKey::for_region(ty, &self.properties)
    }

    /// Display name, from `NAME` or `name`.
    pub fn name(&self) -> Option<&str> {
        ["NAME", "name"].iter()
            .find_map(|field| self.properties.get(*field).and_then(Value::as_str))
    }

    /// Numeric value of `variable_id`, if present and usable.
    pub fn value(&self, variable_id: &str) -> Option<f64> {
        self.properties.get(variable_id).and_then(numeric_value)
    }
}

/// Parse a finite number out of an attribute; numeric strings are accepted.
pub fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Immutable, ordered set of boundary regions for one geography level.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryCollection {
    pub ty: GeoType,
    regions: Vec<Region>,
}

impl BoundaryCollection {
    /// Builds a collection, rejecting regions that share a join key.
    /// Regions without a usable code are kept; the join treats them as misses.
    pub fn new(ty: GeoType, regions: Vec<Region>) -> Result<Self> {
        if ty.is_joinable() {
            let mut seen = AHashSet::with_capacity(regions.len());
            for (idx, region) in regions.iter().enumerate() {
                if let Some(key) = region.key(ty) {
                    if !seen.insert(key.id.clone()) {
                        bail!("[boundary] duplicate {} code {} at feature {}", ty, key.id, idx);
                    }
                }
            }
        }
        Ok(Self { ty, regions })
    }

    /// Parse a GeoJSON FeatureCollection.
    pub fn from_geojson(ty: GeoType, geojson: &Value) -> Result<Self> {
        let features = geojson.get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("[boundary] {} boundaries are not a FeatureCollection", ty))?;

        let mut regions = Vec::with_capacity(features.len());
        for (idx, feature) in features.iter().enumerate() {
            let properties = match feature.get("properties") {
                Some(Value::Object(props)) => props.clone(),
                _ => bail!("[boundary] {} feature {} has no properties object", ty, idx),
            };
            let geometry = feature.get("geometry").cloned().unwrap_or(Value::Null);
            regions.push(Region::new(properties, geometry));
        }

        Self::new(ty, regions)
    }

    pub fn from_geojson_str(ty: GeoType, text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .with_context(|| format!("[boundary] {} boundaries are not valid JSON", ty))?;
        Self::from_geojson(ty, &value)
    }

    pub fn regions(&self) -> &[Region] { &self.regions }

    pub fn len(&self) -> usize { self.regions.len() }

    pub fn is_empty(&self) -> bool { self.regions.is_empty() }

    /// Export as a GeoJSON FeatureCollection.
    pub fn to_geojson(&self) -> Value {
        regions_to_geojson(&self.regions)
    }
}

pub(crate) fn regions_to_geojson(regions: &[Region]) -> Value {
    let features: Vec<Value> = regions.iter()
        .map(|region| json!({
            "type": "Feature",
            "geometry": region.geometry,
            "properties": region.properties,
        }))
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"STATEFP": "06", "NAME": "California"}, "geometry": {"type": "Point", "coordinates": [0, 0]}},
                {"type": "Feature", "properties": {"STATE": "48", "name": "Texas"}, "geometry": null},
            ]
        })
    }

    #[test]
    fn parses_feature_collection() {
        let collection = BoundaryCollection::from_geojson(GeoType::State, &states()).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.regions()[0].name(), Some("California"));
        assert_eq!(collection.regions()[1].name(), Some("Texas"));
        assert_eq!(collection.regions()[1].key(GeoType::State).unwrap().id.as_ref(), "48");
    }

    #[test]
    fn rejects_non_collection() {
        assert!(BoundaryCollection::from_geojson(GeoType::State, &json!({"type": "Feature"})).is_err());
        assert!(BoundaryCollection::from_geojson_str(GeoType::State, "not json").is_err());
    }

    #[test]
    fn rejects_duplicate_codes() {
        let doc = json!({"features": [
            {"properties": {"STATEFP": "06"}, "geometry": null},
            {"properties": {"STATE": "6"}, "geometry": null},
        ]});
        let err = BoundaryCollection::from_geojson(GeoType::State, &doc).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn country_skips_uniqueness_check() {
        let doc = json!({"features": [
            {"properties": {"NAME": "United States"}, "geometry": null},
            {"properties": {"NAME": "United States"}, "geometry": null},
        ]});
        assert_eq!(BoundaryCollection::from_geojson(GeoType::Country, &doc).unwrap().len(), 2);
    }

    #[test]
    fn numeric_values() {
        assert_eq!(numeric_value(&json!(12.5)), Some(12.5));
        assert_eq!(numeric_value(&json!(" 7 ")), Some(7.0));
        assert_eq!(numeric_value(&json!("n/a")), None);
        assert_eq!(numeric_value(&json!("NaN")), None);
        assert_eq!(numeric_value(&Value::Null), None);
        assert_eq!(numeric_value(&json!(true)), None);
    }

    #[test]
    fn geojson_round_trip_keeps_geometry() {
        let collection = BoundaryCollection::from_geojson(GeoType::State, &states()).unwrap();
        let exported = collection.to_geojson();
        assert_eq!(exported["features"][0]["geometry"]["type"], "Point");
        assert_eq!(exported["features"][1]["properties"]["STATE"], "48");
    }
}
