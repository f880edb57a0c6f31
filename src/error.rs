use crate::network::{EdgeKey, NodeId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    #[error("edge ({from}, {to}, {key}) has a malformed length: {reason}")]
    MalformedEdge {
        from: NodeId,
        to: NodeId,
        key: EdgeKey,
        reason: MalformedLength,
    },

    #[error("edge ({from}, {to}, {key}) already exists")]
    DuplicateEdgeKey {
        from: NodeId,
        to: NodeId,
        key: EdgeKey,
    },

    #[error("every key between {from} and {to} is taken")]
    EdgeKeysExhausted { from: NodeId, to: NodeId },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedLength {
    #[error("length is missing")]
    Missing,

    #[error("length {0} is negative")]
    Negative(f64),

    #[error("length {0} is not finite")]
    NotFinite(f64),

    #[error("length `{0}` is not a number")]
    NonNumeric(String),
}

/// Failures while reading network or feature data from a source.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Pbf(#[from] osmpbf::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("invalid bounding box `{input}`: {reason}")]
    BoundingBox { input: String, reason: &'static str },
}
