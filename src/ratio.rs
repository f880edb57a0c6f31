use crate::network::RoadNetwork;
use serde::{Serialize, Serializer};

/// Divides the total edge length of `numerator` by that of `denominator`.
///
/// An empty denominator gives `Some(f64::INFINITY)` while the numerator has
/// length, and `None` when both totals are zero.
pub fn edge_length_ratio(numerator: &RoadNetwork, denominator: &RoadNetwork) -> Option<f64> {
    divide_lengths(numerator.total_edge_length(), denominator.total_edge_length())
}

fn divide_lengths(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else if numerator > 0.0 {
        Some(f64::INFINITY)
    } else {
        None
    }
}

/// How many metres of road there are for every metre of cycleway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoadCyclewayRatio {
    pub road_length: f64,
    pub cycleway_length: f64,
    /// Written as `"inf"` when infinite and `null` when undefined.
    #[serde(serialize_with = "serialize_ratio")]
    pub ratio: Option<f64>,
}

fn serialize_ratio<S: Serializer>(ratio: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match ratio {
        Some(ratio) if ratio.is_infinite() => serializer.serialize_str("inf"),
        Some(ratio) => serializer.serialize_f64(*ratio),
        None => serializer.serialize_none(),
    }
}

impl RoadCyclewayRatio {
    pub fn new(roads: &RoadNetwork, cycleways: &RoadNetwork) -> Self {
        let road_length = roads.total_edge_length();
        let cycleway_length = cycleways.total_edge_length();

        Self {
            road_length,
            cycleway_length,
            ratio: divide_lengths(road_length, cycleway_length),
        }
    }

    /// Rounds half to even, `None` unless the ratio is finite.
    pub fn rounded(&self) -> Option<f64> {
        self.ratio
            .filter(|ratio| ratio.is_finite())
            .map(f64::round_ties_even)
    }

    pub fn subtitle(&self) -> Option<String> {
        self.rounded()
            .map(|ratio| format!("Road to Cycleway Ratio is {ratio}:1"))
    }
}

#[cfg(test)]
mod test {
    use super::{edge_length_ratio, RoadCyclewayRatio};
    use crate::{
        network::{Edge, RoadNetwork},
        select::select_cycle_network,
    };

    fn network(lengths: &[f64]) -> RoadNetwork {
        let mut network = RoadNetwork::new();
        for (index, length) in lengths.iter().enumerate() {
            let from = index as i64;
            network.add_edge(from, from + 1, 0, Edge::new(*length)).unwrap();
        }
        network
    }

    #[test]
    fn should_divide_road_length_by_cycleway_length() {
        let mut roads = RoadNetwork::new();
        roads
            .add_edge(1, 2, 0, Edge::new(100.0).with_tag("highway", "primary"))
            .unwrap();
        roads
            .add_edge(2, 3, 0, Edge::new(100.0).with_tag("highway", "cycleway"))
            .unwrap();
        roads
            .add_edge(3, 1, 0, Edge::new(100.0).with_tag("cycleway", "lane"))
            .unwrap();

        let cycleways = select_cycle_network(&roads);

        assert_eq!(edge_length_ratio(&roads, &cycleways), Some(1.5));
    }

    #[test]
    fn should_be_one_for_the_same_network() {
        let roads = network(&[3.5, 10.0, 0.25]);

        assert_eq!(edge_length_ratio(&roads, &roads), Some(1.0));
    }

    #[test]
    fn should_count_parallel_edges_and_both_directions() {
        let mut numerator = network(&[10.0]);
        numerator.add_edge(0, 1, 1, Edge::new(10.0)).unwrap();
        numerator.add_edge(1, 0, 0, Edge::new(10.0)).unwrap();

        assert_eq!(edge_length_ratio(&numerator, &network(&[10.0])), Some(3.0));
    }

    #[test]
    fn should_ignore_units_when_both_sides_scale() {
        let metres = edge_length_ratio(&network(&[1200.0, 300.0]), &network(&[500.0]));
        let kilometres = edge_length_ratio(&network(&[1.2, 0.3]), &network(&[0.5]));

        let (metres, kilometres) = (metres.unwrap(), kilometres.unwrap());
        assert!((metres - kilometres).abs() < 1e-9);
    }

    #[test]
    fn should_be_infinite_for_empty_denominator() {
        let ratio = edge_length_ratio(&network(&[5.0]), &RoadNetwork::new());

        assert_eq!(ratio, Some(f64::INFINITY));
    }

    #[test]
    fn should_be_undefined_when_both_are_empty() {
        assert_eq!(edge_length_ratio(&RoadNetwork::new(), &RoadNetwork::new()), None);
        assert_eq!(edge_length_ratio(&network(&[0.0]), &network(&[0.0])), None);
    }

    #[test]
    fn should_be_zero_for_empty_numerator() {
        assert_eq!(edge_length_ratio(&RoadNetwork::new(), &network(&[2.0])), Some(0.0));
    }

    #[test]
    fn should_format_subtitle() {
        let ratio = RoadCyclewayRatio::new(&network(&[750.0]), &network(&[100.0]));

        assert_eq!(ratio.rounded(), Some(8.0));
        assert_eq!(ratio.subtitle().as_deref(), Some("Road to Cycleway Ratio is 8:1"));
    }

    #[test]
    fn should_round_halves_to_even() {
        let ratio = RoadCyclewayRatio::new(&network(&[250.0]), &network(&[100.0]));

        assert_eq!(ratio.rounded(), Some(2.0));
    }

    #[test]
    fn should_skip_subtitle_without_cycleways() {
        let ratio = RoadCyclewayRatio::new(&network(&[250.0]), &RoadNetwork::new());

        assert_eq!(ratio.ratio, Some(f64::INFINITY));
        assert_eq!(ratio.subtitle(), None);
    }

    #[test]
    fn should_write_infinite_and_undefined_ratios_apart() {
        let infinite = RoadCyclewayRatio::new(&network(&[250.0]), &RoadNetwork::new());
        let undefined = RoadCyclewayRatio::new(&RoadNetwork::new(), &RoadNetwork::new());
        let finite = RoadCyclewayRatio::new(&network(&[250.0]), &network(&[100.0]));

        assert_eq!(serde_json::to_value(infinite).unwrap()["ratio"], "inf");
        assert!(serde_json::to_value(undefined).unwrap()["ratio"].is_null());
        assert_eq!(serde_json::to_value(finite).unwrap()["ratio"], 2.5);
    }
}
