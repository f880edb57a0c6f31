mod bbox;
mod kind;
mod pbf;

pub use bbox::*;
pub use kind::*;
pub use pbf::*;

use crate::{error::ProviderError, layers::TagFilter, network::RoadNetwork};
use indexmap::IndexMap;
use serde::Serialize;

/// Source of OSM data for one area, fixed when the provider is created.
pub trait NetworkProvider {
    fn road_network(&self, kind: NetworkKind) -> Result<RoadNetwork, ProviderError>;

    fn features(&self, filter: &TagFilter) -> Result<Vec<Feature>, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Node,
    Way,
}

/// A tagged OSM element outside of the road network, such as a park or a river.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub kind: ElementKind,
    pub id: i64,
    pub tags: IndexMap<String, String>,
}

impl Feature {
    pub fn new<'a>(
        kind: ElementKind,
        id: i64,
        tags: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            kind,
            id,
            tags: tags
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .collect(),
        }
    }
}
