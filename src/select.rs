use crate::{network::RoadNetwork, tags::IsCycleway};
use log::debug;

/// Creates the cycle infrastructure of `network`: only edges tagged as
/// cycleways, and only the nodes that still touch one of them.
///
/// The input is left as it was so it can be reused, for example as the
/// road network of a ratio.
pub fn select_cycle_network(network: &RoadNetwork) -> RoadNetwork {
    let selected = network
        .filter_edges(|edge| edge.is_cycleway())
        .without_isolated_nodes();

    debug!(
        "selected {} of {} edges, {} of {} nodes",
        selected.edge_count(),
        network.edge_count(),
        selected.node_count(),
        network.node_count()
    );

    selected
}
