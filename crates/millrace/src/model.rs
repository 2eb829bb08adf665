//! Process models and the combinator algebra that builds them.
//!
//! A [`ProcessModel`] is an immutable directed graph with a unique Start and
//! a unique End node. Models are built only through the combinators here, so
//! well-formedness is a construction invariant rather than a runtime check:
//! sequential composition ([`ProcessModel::append`]) forms a monoid with
//! [`ProcessModel::neutral`] as identity, and [`ProcessModel::one_of`],
//! [`ProcessModel::both`] and [`ProcessModel::loop_while`] introduce
//! exclusive-choice, parallel-all and loop regions whose split and join
//! nodes are always minted as matched pairs.
//!
//! # Example
//!
//! ```
//! use millrace::{Activity, Condition, ProcessModel, SequenceIds};
//!
//! # fn main() -> millrace::Result<()> {
//! let mut ids = SequenceIds::new("gate");
//!
//! let review = ProcessModel::activity(Activity::new("review"))
//!     .with_end_condition(Condition::is_type("ReviewApproved"));
//! let audit = ProcessModel::activity(Activity::new("audit"))
//!     .with_end_condition(Condition::is_type("AuditPassed"));
//!
//! // Run both in parallel, then archive.
//! let archive = ProcessModel::activity(Activity::new("archive"))
//!     .with_end_condition(Condition::is_type("Archived"));
//! let model = review.both(audit, &mut ids)?.append(archive)?;
//! assert!(model.graph().has_node(&"archive".into()));
//! # Ok(()) }
//! ```

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::error::{Error, Result};
use crate::graph::{Edge, Graph};
use crate::id::NewId;
use crate::node::{Activity, NodeData, NodeId};

/// An immutable process model: a well-formed graph between Start and End.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessModel {
    graph: Graph,
}

enum SplitKind {
    Exclusive,
    Parallel,
}

impl ProcessModel {
    /// The identity model: `Start —always→ End`.
    pub fn neutral() -> Self {
        Self {
            graph: Graph::from_parts(
                vec![NodeData::Start, NodeData::End],
                vec![Edge::new(NodeId::Start, NodeId::End, Condition::always())],
            ),
        }
    }

    /// Wrap a single non-sentinel node between Start and End with
    /// always-true edges.
    pub fn make(data: NodeData) -> Self {
        let id = data.id();
        debug_assert!(
            !id.is_start() && !id.is_end(),
            "make wraps activity/split/join nodes, not sentinels"
        );
        Self {
            graph: Graph::from_parts(
                vec![NodeData::Start, NodeData::End, data],
                vec![
                    Edge::new(NodeId::Start, id.clone(), Condition::always()),
                    Edge::new(id, NodeId::End, Condition::always()),
                ],
            ),
        }
    }

    /// Wrap a single activity between Start and End.
    pub fn activity(activity: Activity) -> Self {
        Self::make(NodeData::Activity(activity))
    }

    /// Sequential composition.
    ///
    /// The incoming-to-End edges of `self` are bridged to the
    /// outgoing-from-Start edges of `other`, pairwise, each bridge carrying
    /// the staged composition `and_then(end_condition, start_condition)`.
    /// With [`ProcessModel::neutral`] as identity this forms a monoid.
    ///
    /// Fails with [`Error::NodeAlreadyExists`] if the two models share any
    /// non-sentinel node id; callers treat that as a fatal construction
    /// error.
    pub fn append(self, other: Self) -> Result<Self> {
        let mut left = self.graph;
        let mut right = other.graph;

        let end_edges: Vec<Edge> = left.incoming(&NodeId::End).into_iter().cloned().collect();
        let start_edges: Vec<Edge> = right.outgoing(&NodeId::Start).into_iter().cloned().collect();

        left.remove_node(&NodeId::End);
        right.remove_node(&NodeId::Start);

        let (nodes, edges) = right.into_parts();
        for node in nodes {
            left.add_node(node)?;
        }
        for edge in edges {
            left.add_edge(edge)?;
        }
        for end_edge in &end_edges {
            for start_edge in &start_edges {
                left.add_edge(Edge::new(
                    end_edge.from.clone(),
                    start_edge.to.clone(),
                    Condition::and_then(
                        end_edge.condition.clone(),
                        start_edge.condition.clone(),
                    ),
                ))?;
            }
        }

        Ok(Self { graph: left })
    }

    /// Exclusive choice: wrap both models' branches behind a fresh Or split
    /// and its mate Join. Exactly one branch will commit at runtime.
    ///
    /// Split and join ids are drawn from the injected [`NewId`] service.
    pub fn one_of(self, other: Self, ids: &mut impl NewId) -> Result<Self> {
        self.split(other, SplitKind::Exclusive, ids)
    }

    /// Parallel-all: wrap both models' branches behind a fresh And split and
    /// its mate Join. The join waits for every branch.
    pub fn both(self, other: Self, ids: &mut impl NewId) -> Result<Self> {
        self.split(other, SplitKind::Parallel, ids)
    }

    fn split(self, other: Self, kind: SplitKind, ids: &mut impl NewId) -> Result<Self> {
        let parallel = self.merge_onto_shared_sentinels(other)?;

        let split_id = ids.new_id();
        let join_id = ids.new_id();
        let split = match kind {
            SplitKind::Exclusive => NodeData::Or {
                id: split_id.clone(),
                join: join_id.clone(),
            },
            SplitKind::Parallel => NodeData::And {
                id: split_id.clone(),
                join: join_id.clone(),
            },
        };
        let join = NodeData::Join {
            id: join_id,
            for_node: split_id,
        };

        Self::make(split).append(parallel)?.append(Self::make(join))
    }

    /// Merge `other`'s nodes and edges into `self`, attaching both models'
    /// start-outgoings and end-incomings to the one shared Start and End.
    fn merge_onto_shared_sentinels(self, other: Self) -> Result<Self> {
        let mut merged = self.graph;
        let (nodes, edges) = other.graph.into_parts();
        for node in nodes {
            if !matches!(node, NodeData::Start | NodeData::End) {
                merged.add_node(node)?;
            }
        }
        for edge in edges {
            merged.add_edge(edge)?;
        }
        Ok(Self { graph: merged })
    }

    /// Loop: wrap the model with a Join in front and an Or behind, plus a
    /// back-edge from the Or to the Join carrying `condition`.
    ///
    /// The body repeats while `condition` keeps firing; the forward path to
    /// End runs when it does not (gate it with
    /// [`ProcessModel::with_end_condition`]).
    pub fn loop_while(self, condition: Condition, ids: &mut impl NewId) -> Result<Self> {
        let join_id = ids.new_id();
        let or_id = ids.new_id();
        let join = NodeData::Join {
            id: join_id.clone(),
            for_node: or_id.clone(),
        };
        let or = NodeData::Or {
            id: or_id.clone(),
            join: join_id.clone(),
        };

        let mut looped = Self::make(join).append(self)?.append(Self::make(or))?;
        looped
            .graph
            .add_edge(Edge::new(NodeId::key(or_id), NodeId::key(join_id), condition))?;
        Ok(looped)
    }

    /// Replace the condition of every outgoing-from-Start edge.
    pub fn with_start_condition(self, condition: Condition) -> Self {
        let graph = self.graph.map_edges(|edge| {
            if edge.from.is_start() {
                condition.clone()
            } else {
                edge.condition.clone()
            }
        });
        Self { graph }
    }

    /// Replace the condition of every incoming-to-End edge.
    pub fn with_end_condition(self, condition: Condition) -> Self {
        let graph = self.graph.map_edges(|edge| {
            if edge.to.is_end() {
                condition.clone()
            } else {
                edge.condition.clone()
            }
        });
        Self { graph }
    }

    /// `(condition, target)` for every outgoing edge of `id`.
    pub fn conditions_with_targets(&self, id: &NodeId) -> Vec<(Condition, NodeId)> {
        self.graph
            .outgoing(id)
            .into_iter()
            .map(|edge| (edge.condition.clone(), edge.to.clone()))
            .collect()
    }

    /// The node's data, or [`Error::NodeDoesNotExist`].
    pub fn node_data(&self, id: &NodeId) -> Result<&NodeData> {
        self.graph
            .get_node(id)
            .ok_or_else(|| Error::NodeDoesNotExist(id.clone()))
    }

    /// The underlying graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}
