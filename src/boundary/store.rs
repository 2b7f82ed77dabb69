use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use futures::future::try_join_all;

use crate::{error::CensusError, geography::GeoType};

use super::{collection::BoundaryCollection, source::BoundarySource};

/// Boundary collections for every loaded level, shared read-only.
#[derive(Debug, Clone, Default)]
pub struct BoundaryStore {
    layers: HashMap<GeoType, Arc<BoundaryCollection>>,
}

impl BoundaryStore {
    /// Load every level in `GeoType::order()`.
    pub async fn load_all(source: &dyn BoundarySource) -> Result<Self, CensusError> {
        Self::load(source, &GeoType::order()).await
    }

    /// Fetch and parse all `levels` concurrently. Fails on the first level that
    /// cannot be fetched or parsed; a partially loaded store is never returned.
    pub async fn load(source: &dyn BoundarySource, levels: &[GeoType]) -> Result<Self, CensusError> {
        let fetches = levels.iter().map(|&level| async move {
            let collection = source.fetch(level).await
                .and_then(|text| BoundaryCollection::from_geojson_str(level, &text))
                .with_context(|| format!("loading {level} boundaries"))
                .map_err(|e| CensusError::BoundaryLoad { layer: level, reason: format!("{e:#}") })?;

            tracing::info!(level = level.to_str(), regions = collection.len(), "loaded boundaries");
            Ok::<_, CensusError>((level, Arc::new(collection)))
        });

        let layers = try_join_all(fetches).await
            .inspect_err(|e| tracing::error!(error = %e, "boundary load failed"))?;

        Ok(Self { layers: layers.into_iter().collect() })
    }

    /// Builds a store from collections that are already in memory.
    pub fn from_collections(collections: impl IntoIterator<Item = BoundaryCollection>) -> Self {
        Self {
            layers: collections.into_iter()
                .map(|collection| (collection.ty, Arc::new(collection)))
                .collect(),
        }
    }

    pub fn get(&self, level: GeoType) -> Result<Arc<BoundaryCollection>, CensusError> {
        self.layers.get(&level).cloned()
            .ok_or_else(|| CensusError::UnsupportedGeographyLevel(level.to_string()))
    }

    pub fn has(&self, level: GeoType) -> bool { self.layers.contains_key(&level) }
}
