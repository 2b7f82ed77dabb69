use std::{fmt, sync::Arc};

use serde_json::{Map, Value};

use super::geo_type::{CodeField, GeoType};

/// Stable key matching a boundary region to a demographic record.
/// Both sides build it the same way, so a state region `{STATEFP: "06"}` and a
/// record `{state: 6}` end up with the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinKey {
    pub ty: GeoType,
    pub id: Arc<str>, // e.g., "06" for a state, "06001" for a county
}

impl JoinKey {
    /// Key of a boundary region, reading each code through the level's alias table.
    pub fn for_region(ty: GeoType, properties: &Map<String, Value>) -> Option<JoinKey> {
        Self::build(ty, |code| {
            code.region_aliases.iter()
                .find_map(|alias| properties.get(*alias).and_then(code_text))
        })
    }

    /// Key of a demographic record as returned by the backend.
    pub fn for_record(ty: GeoType, fields: &Map<String, Value>) -> Option<JoinKey> {
        Self::build(ty, |code| fields.get(code.record_field).and_then(code_text))
    }

    fn build(ty: GeoType, lookup: impl Fn(&CodeField) -> Option<String>) -> Option<JoinKey> {
        let fields = ty.code_fields();
        if fields.is_empty() { return None }

        let mut id = String::with_capacity(fields.iter().map(|code| code.width).sum());
        for code in fields {
            id.push_str(&normalize_code(&lookup(code)?, code.width)?);
        }

        Some(JoinKey { ty, id: Arc::from(id) })
    }
}

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ty, self.id)
    }
}

/// Left-pad a FIPS code with zeros to `width`. Longer codes are kept as-is.
pub fn normalize_code(raw: &str, width: usize) -> Option<String> {
    let code = raw.trim();
    if code.is_empty() { return None }
    Some(format!("{code:0>width$}"))
}

/// Code text of an attribute value; codes arrive as strings or integers.
fn code_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() { return Some(u.to_string()) }
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| format!("{f:.0}"))
        }
        _ => None,
    }
}
