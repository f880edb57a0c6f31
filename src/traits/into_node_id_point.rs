use crate::network::NodeId;
use geo::Point;
use osmpbf::Element;

pub trait IntoNodeIdPoint {
    /// Node id with its location as `(lon, lat)`, for node elements only.
    fn node_id_point(&self) -> Option<(NodeId, Point)>;
}

impl IntoNodeIdPoint for Element<'_> {
    fn node_id_point(&self) -> Option<(NodeId, Point)> {
        match self {
            Element::Node(node) => Some((node.id(), Point::new(node.lon(), node.lat()))),
            Element::DenseNode(node) => Some((node.id(), Point::new(node.lon(), node.lat()))),
            _ => None,
        }
    }
}
