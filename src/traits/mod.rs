mod into_node_id_point;

pub use into_node_id_point::*;
