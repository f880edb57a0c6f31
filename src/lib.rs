//! Cycle infrastructure of OpenStreetMap road networks.
//!
//! [`select_cycle_network`] narrows a road network down to its cycleways and
//! [`edge_length_ratio`] compares the total length of two networks. The
//! [`provider`] module reads those networks from `.osm.pbf` extracts.
pub mod error;
pub mod layers;
pub mod network;
pub mod provider;
pub mod ratio;
pub mod select;
pub mod summary;
pub mod tags;
mod traits;

pub use error::{MalformedLength, NetworkError, ProviderError};
pub use network::{Edge, EdgeKey, NodeId, RoadNetwork, TagValue, Tags};
pub use ratio::{edge_length_ratio, RoadCyclewayRatio};
pub use select::select_cycle_network;
pub use tags::IsCycleway;
