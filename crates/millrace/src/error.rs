//! Error types for millrace.

use thiserror::Error;

use crate::node::NodeId;

/// A `Result` alias with [`enum@Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing graphs and process models.
///
/// All of these are construction-time errors. The stepping runtime itself
/// does not fail: unsatisfied conditions yield residuals, absent event
/// fields read as null, and duplicate steps vanish in deduplication. The
/// only way a runtime call surfaces an error is a lookup against a node
/// that is not in the model, which indicates a malformed model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A node with this id is already present in the graph.
    ///
    /// Combinators surface this when two composed models share a
    /// non-sentinel node id; callers treat it as a fatal construction
    /// failure.
    #[error("node already exists: {0}")]
    NodeAlreadyExists(NodeId),

    /// An edge with this `(from, to)` pair is already present.
    #[error("edge already exists: {from} -> {to}")]
    EdgeAlreadyExists {
        /// The edge's origin node.
        from: NodeId,
        /// The edge's target node.
        to: NodeId,
    },

    /// The edge's origin node is not in the graph.
    #[error("edge origin node missing: {0}")]
    FromNodeMissing(NodeId),

    /// The edge's target node is not in the graph.
    #[error("edge target node missing: {0}")]
    ToNodeMissing(NodeId),

    /// A queried node is not in the graph.
    #[error("node does not exist: {0}")]
    NodeDoesNotExist(NodeId),
}
