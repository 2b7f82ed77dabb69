mod geo_type;
mod join_key;

pub use geo_type::{CodeField, GeoType, COUNTY_CODE, STATE_CODE};
pub use join_key::{normalize_code, JoinKey};
