//! Merges backend demographic records onto boundary regions by join key.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    boundary::{numeric_value, regions_to_geojson, BoundaryCollection, Region},
    diagnostics::DiagnosticsSink,
    error::CensusError,
    geography::{GeoType, JoinKey},
};

/// One row of a backend response: variable values plus the identifying codes
/// (`state`, and `county` at county level).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemographicRecord(pub Map<String, Value>);

impl DemographicRecord {
    pub fn fields(&self) -> &Map<String, Value> { &self.0 }

    pub fn key(&self, ty: GeoType) -> Option<JoinKey> { JoinKey::for_record(ty, &self.0) }

    pub fn value(&self, variable_id: &str) -> Option<f64> {
        self.0.get(variable_id).and_then(numeric_value)
    }
}

impl From<Map<String, Value>> for DemographicRecord {
    fn from(fields: Map<String, Value>) -> Self { Self(fields) }
}

/// A boundary collection whose regions carry demographic values.
/// Always holds exactly the regions of its source collection, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedBoundaryCollection {
    pub ty: GeoType,
    pub variable_id: String,
    regions: Vec<Region>,
    pub matched: usize,
    pub missed: usize,
    pub unmatched_records: usize,
}

impl EnrichedBoundaryCollection {
    pub fn regions(&self) -> &[Region] { &self.regions }

    pub fn len(&self) -> usize { self.regions.len() }

    pub fn is_empty(&self) -> bool { self.regions.is_empty() }

    /// Value of `variable_id` in every region, in region order.
    pub fn values<'a>(&'a self, variable_id: &'a str) -> impl Iterator<Item = Option<f64>> + 'a {
        self.regions.iter().map(move |region| region.value(variable_id))
    }

    pub fn to_geojson(&self) -> Value { regions_to_geojson(&self.regions) }
}

/// Join `records` onto a copy of `boundaries` at `level`.
///
/// Duplicate record keys resolve to the last record. Regions without a match
/// get an explicit null for `variable_id` and nothing else. `boundaries` is
/// never modified.
pub fn join(
    boundaries: &BoundaryCollection,
    records: &[DemographicRecord],
    level: GeoType,
    variable_id: &str,
    sink: &dyn DiagnosticsSink,
) -> Result<EnrichedBoundaryCollection, CensusError> {
    if !level.is_joinable() {
        return Err(CensusError::UnsupportedGeographyLevel(level.to_string()));
    }

    let mut index: AHashMap<JoinKey, &DemographicRecord> = AHashMap::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        let Some(key) = record.key(level) else {
            sink.record("join.key_missing", &[("side", "record".into()), ("index", idx.to_string())]);
            continue;
        };
        if index.insert(key.clone(), record).is_some() {
            sink.record("join.duplicate_key", &[("key", key.id.to_string()), ("index", idx.to_string())]);
        }
    }

    let mut used: AHashSet<&JoinKey> = AHashSet::with_capacity(index.len());
    let mut regions = Vec::with_capacity(boundaries.len());
    let (mut matched, mut missed) = (0, 0);

    for (idx, source) in boundaries.regions().iter().enumerate() {
        let mut region = source.clone();
        let key = region.key(level);
        if key.is_none() {
            sink.record("join.key_missing", &[("side", "region".into()), ("index", idx.to_string())]);
        }

        match key.as_ref().and_then(|key| index.get_key_value(key)) {
            Some((key, record)) => {
                for (field, value) in record.fields() {
                    if level.is_key_field(field) { continue }
                    region.properties.insert(field.clone(), value.clone());
                }
                used.insert(key);
                matched += 1;
            }
            None => {
                region.properties.insert(variable_id.to_string(), Value::Null);
                if let Some(key) = &key {
                    sink.record("join.miss", &[("key", key.id.to_string())]);
                }
                missed += 1;
            }
        }
        regions.push(region);
    }

    let unmatched_records = index.len() - used.len();
    if unmatched_records > 0 {
        sink.record("join.unmatched_records", &[("count", unmatched_records.to_string())]);
    }

    Ok(EnrichedBoundaryCollection {
        ty: level,
        variable_id: variable_id.to_string(),
        regions,
        matched,
        missed,
        unmatched_records,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::diagnostics::{MemorySink, NullSink};

    fn record(value: Value) -> DemographicRecord {
        serde_json::from_value(value).unwrap()
    }

    fn collection(ty: GeoType, props: &[Value]) -> BoundaryCollection {
        let regions = props.iter()
            .map(|p| Region::new(p.as_object().cloned().unwrap(), json!({"type": "Polygon", "coordinates": []})))
            .collect();
        BoundaryCollection::new(ty, regions).unwrap()
    }

    #[test]
    fn state_join_hits_and_misses() {
        let states = collection(GeoType::State, &[json!({"STATEFP": "06"}), json!({"STATEFP": "99"})]);
        let records = [record(json!({"state": "06", "population": 1000}))];

        let enriched = join(&states, &records, GeoType::State, "population", &NullSink).unwrap();

        assert_eq!(enriched.regions()[0].properties["population"], json!(1000));
        assert_eq!(enriched.regions()[1].properties["population"], Value::Null);
        assert_eq!((enriched.matched, enriched.missed), (1, 1));
    }

    #[test]
    fn county_join_normalizes_codes() {
        let counties = collection(GeoType::County, &[json!({"STATEFP": "06", "COUNTYFP": "001"})]);
        let records = [record(json!({"state": "6", "county": "1", "income": 500}))];

        let enriched = join(&counties, &records, GeoType::County, "income", &NullSink).unwrap();

        assert_eq!(enriched.regions()[0].value("income"), Some(500.0));
    }

    #[test]
    fn key_fields_are_not_copied() {
        let states = collection(GeoType::State, &[json!({"STATEFP": "06"})]);
        let records = [record(json!({"state": "6", "NAME": "California", "population": 1}))];

        let enriched = join(&states, &records, GeoType::State, "population", &NullSink).unwrap();
        let props = &enriched.regions()[0].properties;

        assert!(!props.contains_key("state"));
        assert_eq!(props["NAME"], "California");
        assert_eq!(props["STATEFP"], "06");
    }

    #[test]
    fn empty_records_null_fill_every_region() {
        let states = collection(GeoType::State, &[json!({"STATEFP": "01"}), json!({"STATEFP": "02"}), json!({"NAME": "no code"})]);

        let enriched = join(&states, &[], GeoType::State, "income", &NullSink).unwrap();

        assert_eq!(enriched.len(), states.len());
        assert!(enriched.regions().iter().all(|r| r.properties.get("income") == Some(&Value::Null)));
    }

    #[test]
    fn miss_sets_only_the_requested_variable() {
        let states = collection(GeoType::State, &[json!({"STATEFP": "01"}), json!({"STATEFP": "02"})]);
        let records = [record(json!({"state": "01", "income": 1, "population": 2}))];

        let enriched = join(&states, &records, GeoType::State, "income", &NullSink).unwrap();
        let miss = &enriched.regions()[1].properties;

        assert_eq!(miss.get("income"), Some(&Value::Null));
        assert!(!miss.contains_key("population"));
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        let states = collection(GeoType::State, &[json!({"STATEFP": "06"})]);
        let records = [
            record(json!({"state": "06", "population": 1})),
            record(json!({"state": 6, "population": 2})),
        ];
        let sink = MemorySink::new();

        let enriched = join(&states, &records, GeoType::State, "population", &sink).unwrap();

        assert_eq!(enriched.regions()[0].value("population"), Some(2.0));
        assert_eq!(sink.count("join.duplicate_key"), 1);
    }

    #[test]
    fn join_does_not_mutate_input() {
        let states = collection(GeoType::State, &[json!({"STATEFP": "06"}), json!({"STATEFP": "48"})]);
        let before = states.clone();
        let records = [record(json!({"state": "06", "population": 1}))];

        join(&states, &records, GeoType::State, "population", &NullSink).unwrap();
        join(&states, &records, GeoType::State, "income", &NullSink).unwrap();

        assert_eq!(states, before);
    }

    #[test]
    fn country_level_is_unsupported() {
        let country = collection(GeoType::Country, &[json!({"NAME": "United States"})]);
        let err = join(&country, &[], GeoType::Country, "population", &NullSink).unwrap_err();
        assert_eq!(err, CensusError::UnsupportedGeographyLevel("country".into()));
    }

    #[test]
    fn diagnostics_report_missing_keys_and_unmatched_records() {
        let states = collection(GeoType::State, &[json!({"STATEFP": "06"}), json!({"NAME": "no code"})]);
        let records = [
            record(json!({"population": 5})),
            record(json!({"state": "72", "population": 9})),
        ];
        let sink = MemorySink::new();

        let enriched = join(&states, &records, GeoType::State, "population", &sink).unwrap();

        assert_eq!(sink.count("join.key_missing"), 2);
        assert_eq!(enriched.unmatched_records, 1);
        let event = sink.events().into_iter().find(|e| e.name == "join.unmatched_records").unwrap();
        assert_eq!(event.field("count"), Some("1"));
    }
}
