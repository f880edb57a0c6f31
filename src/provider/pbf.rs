use super::{BoundingBox, ElementKind, Feature, NetworkKind, NetworkProvider, Oneway};
use crate::{
    error::{NetworkError, ProviderError},
    layers::TagFilter,
    network::{Edge, NodeId, RoadNetwork, TagValue, Tags},
    traits::IntoNodeIdPoint,
};
use geo::{HaversineDistance, Point};
use itertools::Itertools;
use log::{debug, info};
use osmpbf::{Element, ElementReader};
use std::{
    collections::HashMap,
    fs::File,
    io::BufReader,
    path::PathBuf,
};

const PBF_BUFFER_CAPACITY: usize = 1024 * 1024;

pub type Points = HashMap<NodeId, Point>;

/// One direction of travel between two consecutive nodes of a way.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub way_id: i64,
    pub from: NodeId,
    pub to: NodeId,
    pub edge: Edge,
}

/// Reads networks and features from a local `.osm.pbf` extract, keeping
/// only what lies inside a bounding box.
#[derive(Debug, Clone)]
pub struct PbfProvider {
    path: PathBuf,
    bbox: BoundingBox,
}

impl PbfProvider {
    pub fn new(path: impl Into<PathBuf>, bbox: BoundingBox) -> Self {
        Self {
            path: path.into(),
            bbox,
        }
    }

    fn elements(&self) -> Result<ElementReader<BufReader<File>>, ProviderError> {
        let pbf = BufReader::with_capacity(PBF_BUFFER_CAPACITY, File::open(&self.path)?);
        Ok(ElementReader::new(pbf))
    }

    /// Locations of every node inside the bounding box.
    fn points(&self) -> Result<Points, ProviderError> {
        let bbox = self.bbox;

        let points = self.elements()?.par_map_reduce(
            |element| {
                element
                    .node_id_point()
                    .filter(|(_, point)| bbox.contains(point))
                    .map(|node_id_point| Points::from_iter([node_id_point]))
                    .unwrap_or_default()
            },
            Points::default,
            |mut accu, curr| {
                accu.extend(curr);
                accu
            },
        )?;

        debug!("{} nodes within {}", points.len(), bbox);
        Ok(points)
    }
}

impl NetworkProvider for PbfProvider {
    fn road_network(&self, kind: NetworkKind) -> Result<RoadNetwork, ProviderError> {
        info!(
            "reading {kind:?} network from {} within {}",
            self.path.display(),
            self.bbox
        );

        let points = self.points()?;

        let mut segments = self.elements()?.par_map_reduce(
            |element| match element {
                Element::Way(way) if kind.admits(way.tags()) => {
                    way_segments(way.id(), way.refs(), way.tags(), &points)
                }
                _ => Vec::new(),
            },
            Vec::new,
            |mut accu, curr| {
                accu.extend(curr);
                accu
            },
        )?;

        // Blocks arrive in any order, keys must not depend on it.
        segments.sort_by_key(|segment| (segment.from, segment.to, segment.way_id));

        let network = network_from_segments(segments)?;
        info!(
            "{kind:?} network has {} nodes and {} edges",
            network.node_count(),
            network.edge_count()
        );

        Ok(network)
    }

    fn features(&self, filter: &TagFilter) -> Result<Vec<Feature>, ProviderError> {
        let points = self.points()?;

        let mut features = self.elements()?.par_map_reduce(
            |element| {
                element_feature(&element, filter, &points)
                    .into_iter()
                    .collect::<Vec<_>>()
            },
            Vec::new,
            |mut accu, curr| {
                accu.extend(curr);
                accu
            },
        )?;

        features.sort_by_key(|feature| (feature.kind, feature.id));
        debug!("{} features matched", features.len());

        Ok(features)
    }
}

/// Splits a way into segments between consecutive nodes that both have a
/// location in `points`, honouring `oneway`.
///
/// Length is the haversine distance in metres. Way tags are copied onto
/// every edge along with the way id as `osmid`.
pub fn way_segments<'a>(
    way_id: i64,
    refs: impl IntoIterator<Item = NodeId>,
    tags: impl IntoIterator<Item = (&'a str, &'a str)>,
    points: &Points,
) -> Vec<Segment> {
    let tags = tags.into_iter().collect_vec();
    let oneway = Oneway::from_tags(tags.iter().copied());

    let edge_tags = tags
        .into_iter()
        .map(|(key, value)| (key.to_owned(), TagValue::from(value)))
        .chain([("osmid".to_owned(), TagValue::Text(way_id.to_string()))])
        .collect::<Tags>();

    refs.into_iter()
        .tuple_windows::<(_, _)>()
        .filter_map(|(from, to)| {
            let length = points.get(&from)?.haversine_distance(points.get(&to)?);
            Some((from, to, length))
        })
        .flat_map(|(from, to, length)| {
            let edge = Edge {
                length,
                tags: edge_tags.clone(),
            };

            let forward = oneway.forward().then(|| Segment {
                way_id,
                from,
                to,
                edge: edge.clone(),
            });

            let backward = oneway.backward().then(|| Segment {
                way_id,
                from: to,
                to: from,
                edge,
            });

            forward.into_iter().chain(backward)
        })
        .collect()
}

/// Parallel segments get keys 0, 1, ... in the order given.
pub fn network_from_segments(
    segments: impl IntoIterator<Item = Segment>,
) -> Result<RoadNetwork, NetworkError> {
    segments
        .into_iter()
        .try_fold(RoadNetwork::new(), |mut network, segment| {
            network.add_edge_auto_key(segment.from, segment.to, segment.edge)?;
            Ok(network)
        })
}

fn element_feature(element: &Element<'_>, filter: &TagFilter, points: &Points) -> Option<Feature> {
    match element {
        Element::Node(node) => (points.contains_key(&node.id()) && filter.matches(node.tags()))
            .then(|| Feature::new(ElementKind::Node, node.id(), node.tags())),
        Element::DenseNode(node) => (points.contains_key(&node.id())
            && filter.matches(node.tags()))
        .then(|| Feature::new(ElementKind::Node, node.id(), node.tags())),
        Element::Way(way) => (way.refs().any(|node_id| points.contains_key(&node_id))
            && filter.matches(way.tags()))
        .then(|| Feature::new(ElementKind::Way, way.id(), way.tags())),
        Element::Relation(_) => None,
    }
}

#[cfg(test)]
mod test {
    use super::{network_from_segments, way_segments, PbfProvider, Points};
    use crate::{
        error::ProviderError,
        layers::TagFilter,
        network::TagValue,
        provider::{BoundingBox, ElementKind, Feature, NetworkKind, NetworkProvider},
        select::select_cycle_network,
    };
    use geo::Point;

    const EXTRACT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/inner_north.osm.pbf");

    fn provider() -> PbfProvider {
        PbfProvider::new(EXTRACT, BoundingBox::new(144.9, -37.9, 145.0, -37.8).unwrap())
    }

    fn points() -> Points {
        Points::from_iter([
            (1, Point::new(145.0, -37.80)),
            (2, Point::new(145.0, -37.81)),
            (3, Point::new(145.01, -37.81)),
        ])
    }

    #[test]
    fn should_split_ways_in_both_directions() {
        let segments = way_segments(70, [1, 2, 3], [("highway", "residential")], &points());

        let pairs = segments
            .iter()
            .map(|segment| (segment.from, segment.to))
            .collect::<Vec<_>>();
        assert_eq!(pairs, vec![(1, 2), (2, 1), (2, 3), (3, 2)]);

        let edge = &segments[0].edge;
        assert_eq!(edge.tag("highway"), Some(&TagValue::from("residential")));
        assert_eq!(edge.tag("osmid"), Some(&TagValue::from("70")));
    }

    #[test]
    fn should_measure_in_metres() {
        let segments = way_segments(1, [1, 2], [("highway", "primary")], &points());

        // 0.01 degrees of latitude
        let length = segments[0].edge.length;
        assert!((length - 1_112.0).abs() < 5.0, "{length}");
    }

    #[test]
    fn should_follow_oneway() {
        let forward = way_segments(1, [1, 2, 3], [("oneway", "yes")], &points());
        let backward = way_segments(1, [1, 2, 3], [("oneway", "-1")], &points());

        assert!(forward.iter().all(|segment| segment.from < segment.to));
        assert_eq!(forward.len(), 2);
        assert!(backward.iter().all(|segment| segment.from > segment.to));
        assert_eq!(backward.len(), 2);
    }

    #[test]
    fn should_skip_segments_leaving_the_box() {
        let segments = way_segments(1, [1, 9, 2, 3], [("oneway", "yes")], &points());

        let pairs = segments
            .iter()
            .map(|segment| (segment.from, segment.to))
            .collect::<Vec<_>>();
        assert_eq!(pairs, vec![(2, 3)]);
    }

    #[test]
    fn should_key_parallel_segments() {
        let segments = [10, 11]
            .into_iter()
            .flat_map(|way_id| way_segments(way_id, [1, 2], [("oneway", "yes")], &points()));

        let network = network_from_segments(segments).unwrap();

        assert_eq!(network.edge_count(), 2);
        assert_eq!(
            network.edge(1, 2, 1).and_then(|edge| edge.tag("osmid")),
            Some(&TagValue::from("11"))
        );
    }

    #[test]
    fn should_read_drive_network_from_extract() {
        let network = provider().road_network(NetworkKind::Drive).unwrap();

        assert_eq!(network.node_count(), 2);
        assert_eq!(network.edge_count(), 3);

        let osmid = |from, to, key| network.edge(from, to, key).and_then(|edge| edge.tag("osmid"));
        assert_eq!(osmid(1, 2, 0), Some(&TagValue::from("100")));
        assert_eq!(osmid(1, 2, 1), Some(&TagValue::from("102")));
        assert_eq!(osmid(2, 1, 0), Some(&TagValue::from("100")));
        assert_eq!(osmid(2, 1, 1), None);
    }

    #[test]
    fn should_read_bike_network_from_extract() {
        let network = provider().road_network(NetworkKind::Bike).unwrap();

        assert_eq!(network.node_count(), 3);
        assert_eq!(network.edge_count(), 5);
        assert!(!network.contains_node(4));
        assert!(!network.contains_node(9));

        let cycleways = select_cycle_network(&network);
        assert_eq!(cycleways.edge_count(), 2);
        assert!(cycleways.edge(2, 3, 0).is_some());
        assert!(cycleways.edge(3, 2, 0).is_some());
    }

    #[test]
    fn should_read_features_within_the_box() {
        let provider = provider();

        let water = provider.features(&TagFilter::water()).unwrap();
        let green = provider.features(&TagFilter::green()).unwrap();

        let found = |features: &[Feature]| {
            features
                .iter()
                .map(|feature| (feature.kind, feature.id))
                .collect::<Vec<_>>()
        };
        assert_eq!(found(&water), vec![(ElementKind::Way, 104)]);
        assert_eq!(found(&green), vec![(ElementKind::Node, 20)]);
        assert_eq!(water[0].tags.get("waterway").map(String::as_str), Some("river"));
    }

    #[test]
    fn should_fail_on_missing_extract() {
        let bbox = BoundingBox::new(144.9, -37.9, 145.0, -37.8).unwrap();
        let provider = PbfProvider::new("/nonexistent/map.osm.pbf", bbox);

        let result = provider.road_network(NetworkKind::Drive);

        assert!(matches!(result, Err(ProviderError::Io(_))));
    }
}
