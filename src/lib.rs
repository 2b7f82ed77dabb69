#![doc = "census-map public API"]
pub mod backend;
pub mod boundary;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod geography;
pub mod join;
pub mod render;
pub mod scale;
pub mod session;

#[doc(inline)]
pub use boundary::{BoundaryCollection, BoundarySource, BoundaryStore, Region};

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use error::{BackendError, CensusError};

#[doc(inline)]
pub use geography::{GeoType, JoinKey};

#[doc(inline)]
pub use join::{join, DemographicRecord, EnrichedBoundaryCollection};

#[doc(inline)]
pub use scale::{ColorScale, Legend};

#[doc(inline)]
pub use session::{AppState, QueryOutcome, Session, View};
