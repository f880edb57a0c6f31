use crate::error::{MalformedLength, NetworkError};
use derive_more::From;
use indexmap::IndexMap;
use log::debug;
use petgraph::prelude::DiGraphMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

pub type NodeId = i64;
pub type EdgeKey = u32;
pub type Tags = IndexMap<String, TagValue>;

/// Every edge between one ordered pair of nodes, by key.
pub type ParallelEdges = IndexMap<EdgeKey, Edge>;

/// Value of an OSM tag once it has been attached to an edge.
#[derive(Debug, Clone, PartialEq, Eq, From, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

impl TagValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Text(value.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Metres.
    pub length: f64,
    #[serde(default)]
    pub tags: Tags,
}

impl Edge {
    pub fn new(length: f64) -> Self {
        Self {
            length,
            tags: Tags::default(),
        }
    }

    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<TagValue>) -> Self {
        self.tags.insert(name.into(), value.into());
        self
    }

    pub fn tag(&self, name: &str) -> Option<&TagValue> {
        self.tags.get(name)
    }
}

/// A directed multigraph of OSM nodes joined by tagged, measured edges.
///
/// Parallel edges between the same ordered pair of nodes are told apart by
/// their [`EdgeKey`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawNetwork", into = "RawNetwork")]
pub struct RoadNetwork {
    graph: DiGraphMap<NodeId, ParallelEdges>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: NodeId) {
        self.graph.add_node(node);
    }

    /// Adds an edge, adding either node when it isn't in the network yet.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        key: EdgeKey,
        edge: Edge,
    ) -> Result<(), NetworkError> {
        validate_length(edge.length).map_err(|reason| NetworkError::MalformedEdge {
            from,
            to,
            key,
            reason,
        })?;

        if self.edge(from, to, key).is_some() {
            return Err(NetworkError::DuplicateEdgeKey { from, to, key });
        }

        self.insert_edge(from, to, key, edge);
        Ok(())
    }

    /// Adds an edge under the next unused key for `(from, to)`, returning that key.
    pub fn add_edge_auto_key(
        &mut self,
        from: NodeId,
        to: NodeId,
        edge: Edge,
    ) -> Result<EdgeKey, NetworkError> {
        let key = self.next_key(from, to)?;

        self.add_edge(from, to, key, edge)?;
        Ok(key)
    }

    /// One past the largest key in use for `(from, to)`, or the lowest free
    /// key once that would overflow.
    fn next_key(&self, from: NodeId, to: NodeId) -> Result<EdgeKey, NetworkError> {
        let Some(parallel) = self.graph.edge_weight(from, to) else {
            return Ok(0);
        };

        parallel
            .keys()
            .max()
            .map_or(Some(0), |key| key.checked_add(1))
            .or_else(|| (0..=EdgeKey::MAX).find(|key| !parallel.contains_key(key)))
            .ok_or(NetworkError::EdgeKeysExhausted { from, to })
    }

    /// Callers must uphold the key and length invariants themselves.
    fn insert_edge(&mut self, from: NodeId, to: NodeId, key: EdgeKey, edge: Edge) {
        if let Some(parallel) = self.graph.edge_weight_mut(from, to) {
            parallel.insert(key, edge);
        } else {
            self.graph
                .add_edge(from, to, ParallelEdges::from_iter([(key, edge)]));
        }
    }

    pub fn contains_node(&self, node: NodeId) -> bool {
        self.graph.contains_node(node)
    }

    pub fn edge(&self, from: NodeId, to: NodeId, key: EdgeKey) -> Option<&Edge> {
        self.graph
            .edge_weight(from, to)
            .and_then(|parallel| parallel.get(&key))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Counts parallel edges individually.
    pub fn edge_count(&self) -> usize {
        self.graph
            .all_edges()
            .map(|(_, _, parallel)| parallel.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.nodes()
    }

    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, EdgeKey, &Edge)> + '_ {
        self.graph.all_edges().flat_map(|(from, to, parallel)| {
            parallel
                .iter()
                .map(move |(key, edge)| (from, to, *key, edge))
        })
    }

    /// Incoming plus outgoing edges, a self-loop counting once for each end.
    pub fn degree(&self, node: NodeId) -> usize {
        self.edges()
            .map(|(from, to, ..)| usize::from(from == node) + usize::from(to == node))
            .sum()
    }

    pub fn total_edge_length(&self) -> f64 {
        self.edges().map(|(.., edge)| edge.length).sum()
    }

    /// Creates a new network holding every node, but only the edges `predicate` accepts.
    pub fn filter_edges(&self, predicate: impl Fn(&Edge) -> bool) -> RoadNetwork {
        let mut filtered = RoadNetwork::new();

        for node in self.nodes() {
            filtered.add_node(node);
        }

        for (from, to, key, edge) in self.edges().filter(|(.., edge)| predicate(*edge)) {
            filtered.insert_edge(from, to, key, edge.clone());
        }

        filtered
    }

    /// Drops every node without an incoming or outgoing edge.
    pub fn without_isolated_nodes(mut self) -> RoadNetwork {
        let connected = self
            .edges()
            .flat_map(|(from, to, ..)| [from, to])
            .collect::<HashSet<_>>();

        let isolated = self
            .nodes()
            .filter(|node| !connected.contains(node))
            .collect::<Vec<_>>();

        debug!("removing {} isolated nodes", isolated.len());

        for node in isolated {
            self.graph.remove_node(node);
        }

        self
    }
}

impl PartialEq for RoadNetwork {
    fn eq(&self, other: &Self) -> bool {
        self.node_count() == other.node_count()
            && self.edge_count() == other.edge_count()
            && self.nodes().all(|node| other.contains_node(node))
            && self
                .edges()
                .all(|(from, to, key, edge)| other.edge(from, to, key) == Some(edge))
    }
}

fn validate_length(length: f64) -> Result<f64, MalformedLength> {
    if !length.is_finite() {
        Err(MalformedLength::NotFinite(length))
    } else if length < 0.0 {
        Err(MalformedLength::Negative(length))
    } else {
        Ok(length)
    }
}

/// Interchange shape for networks, where lengths haven't been checked yet.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawNetwork {
    #[serde(default)]
    nodes: Vec<NodeId>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawEdge {
    from: NodeId,
    to: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<EdgeKey>,
    #[serde(default)]
    length: Option<Value>,
    #[serde(default)]
    tags: Tags,
}

impl RawEdge {
    fn length(&self) -> Result<f64, MalformedLength> {
        match &self.length {
            None | Some(Value::Null) => Err(MalformedLength::Missing),
            Some(Value::Number(number)) => number
                .as_f64()
                .ok_or_else(|| MalformedLength::NonNumeric(number.to_string())),
            Some(other) => Err(MalformedLength::NonNumeric(other.to_string())),
        }
    }
}

impl TryFrom<RawNetwork> for RoadNetwork {
    type Error = NetworkError;

    fn try_from(raw: RawNetwork) -> Result<Self, Self::Error> {
        let mut network = RoadNetwork::new();

        for node in raw.nodes {
            network.add_node(node);
        }

        for raw_edge in raw.edges {
            let length = raw_edge.length();
            let RawEdge {
                from,
                to,
                key,
                tags,
                ..
            } = raw_edge;

            let key = match key {
                Some(key) => key,
                None => network.next_key(from, to)?,
            };

            let length = length.map_err(|reason| NetworkError::MalformedEdge {
                from,
                to,
                key,
                reason,
            })?;

            network.add_edge(from, to, key, Edge { length, tags })?;
        }

        Ok(network)
    }
}

impl From<RoadNetwork> for RawNetwork {
    fn from(network: RoadNetwork) -> Self {
        let edges = network
            .edges()
            .map(|(from, to, key, edge)| RawEdge {
                from,
                to,
                key: Some(key),
                length: Some(Value::from(edge.length)),
                tags: edge.tags.clone(),
            })
            .collect();

        Self {
            nodes: network.nodes().collect(),
            edges,
        }
    }
}
