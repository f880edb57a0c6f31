use crate::{
    error::ProviderError,
    layers::{Layer, Layers},
    network::RoadNetwork,
    provider::{NetworkKind, NetworkProvider},
    ratio::RoadCyclewayRatio,
    select::select_cycle_network,
};
use indexmap::IndexMap;
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetworkStats {
    pub nodes: usize,
    pub edges: usize,
    pub edge_length_total: f64,
}

impl From<&RoadNetwork> for NetworkStats {
    fn from(network: &RoadNetwork) -> Self {
        Self {
            nodes: network.node_count(),
            edges: network.edge_count(),
            edge_length_total: network.total_edge_length(),
        }
    }
}

/// What was loaded for an area, and how its roads compare to its cycleways.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub title: String,
    pub subtitle: Option<String>,
    pub layers: Layers,
    pub roads: Option<NetworkStats>,
    pub cycleways: Option<NetworkStats>,
    /// Number of matching features per feature layer.
    pub features: IndexMap<Layer, usize>,
    pub ratio: Option<RoadCyclewayRatio>,
}

/// Loads the enabled layers from `provider`.
///
/// Cycleways come from the bike network, roads from the drive network.
/// The ratio needs both layers; without them it is left out.
pub fn summarize(
    provider: &impl NetworkProvider,
    layers: Layers,
    title: impl Into<String>,
) -> Result<Summary, ProviderError> {
    let title = title.into();
    info!("Loading data for {title}");

    let roads = layers
        .roads
        .then(|| provider.road_network(NetworkKind::Drive))
        .transpose()?;

    let cycleways = layers
        .cycleways
        .then(|| {
            provider
                .road_network(NetworkKind::Bike)
                .map(|bike| select_cycle_network(&bike))
        })
        .transpose()?;

    let features = layers
        .enabled()
        .filter_map(|layer| layer.tag_filter().map(|filter| (layer, filter)))
        .map(|(layer, filter)| -> Result<_, ProviderError> {
            Ok((layer, provider.features(&filter)?.len()))
        })
        .collect::<Result<IndexMap<_, _>, _>>()?;

    let ratio = match (&roads, &cycleways) {
        (Some(roads), Some(cycleways)) => Some(RoadCyclewayRatio::new(roads, cycleways)),
        _ => {
            warn!("Roads and cycleways must be loaded, ratio not included");
            None
        }
    };

    let subtitle = ratio.as_ref().and_then(RoadCyclewayRatio::subtitle);

    if ratio.is_some() && subtitle.is_none() {
        warn!("{title} has no cycleway length to compare roads with");
    }

    Ok(Summary {
        title,
        subtitle,
        layers,
        roads: roads.as_ref().map(NetworkStats::from),
        cycleways: cycleways.as_ref().map(NetworkStats::from),
        features,
        ratio,
    })
}
