mod collection;
mod source;
mod store;

pub use collection::{numeric_value, BoundaryCollection, Region};
pub(crate) use collection::regions_to_geojson;
pub use source::{BoundarySource, DirBoundarySource, MemBoundarySource};
#[cfg(feature = "http")]
pub use source::HttpBoundarySource;
pub use store::BoundaryStore;
