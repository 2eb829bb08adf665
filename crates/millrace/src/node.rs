//! Node identifiers and node payloads for process graphs.

use serde::{Deserialize, Serialize};

/// Identifies a node in a process graph.
///
/// `Start` and `End` are reserved sentinels; every well-formed model has
/// exactly one of each. Ordering is total with `Start < End < Key(_)`, so
/// canonically sorted node and step sets always lead with the sentinels.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum NodeId {
    /// The unique entry node of a model.
    Start,
    /// The unique exit node of a model.
    End,
    /// Any other node, keyed by an opaque string.
    Key(String),
}

impl NodeId {
    /// A non-sentinel id.
    pub fn key(id: impl Into<String>) -> Self {
        NodeId::Key(id.into())
    }

    /// Whether this is the Start sentinel.
    pub fn is_start(&self) -> bool {
        matches!(self, NodeId::Start)
    }

    /// Whether this is the End sentinel.
    pub fn is_end(&self) -> bool {
        matches!(self, NodeId::End)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeId::Start => write!(f, "start"),
            NodeId::End => write!(f, "end"),
            NodeId::Key(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId::Key(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId::Key(id)
    }
}

/// A user-defined workflow step, identified by `(id, version)`.
///
/// The engine only reads this metadata: it surfaces an active activity via
/// [`ProcessInstance::currently_active_activities`](crate::ProcessInstance::currently_active_activities),
/// the caller executes it and feeds the emitted events back in. The
/// `required_events` and `output_events` lists declare what the activity
/// consumes and produces; `module` names the caller-side implementation.
///
/// # Example
///
/// ```
/// use millrace::Activity;
///
/// let activity = Activity::new("review")
///     .with_version(2)
///     .with_required_event("DocumentSubmitted")
///     .with_output_event("ReviewApproved")
///     .with_output_event("ReviewRejected")
///     .with_module("approvals::review");
///
/// assert_eq!(activity.id(), "review");
/// assert_eq!(activity.output_events().len(), 2);
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Activity {
    id: String,
    version: u32,
    required_events: Vec<String>,
    output_events: Vec<String>,
    module: String,
}

impl Activity {
    /// Create an activity at version 1 with no declared events.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: 1,
            required_events: vec![],
            output_events: vec![],
            module: String::new(),
        }
    }

    /// Set the activity version.
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Declare an event type this activity needs before it can run.
    pub fn with_required_event(mut self, event_type: impl Into<String>) -> Self {
        self.required_events.push(event_type.into());
        self
    }

    /// Declare an event type this activity emits.
    pub fn with_output_event(mut self, event_type: impl Into<String>) -> Self {
        self.output_events.push(event_type.into());
        self
    }

    /// Name the caller-side module implementing this activity.
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// The activity id. Doubles as its node id in the model graph.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The activity version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Event types this activity needs before it can run.
    pub fn required_events(&self) -> &[String] {
        &self.required_events
    }

    /// Event types this activity emits.
    pub fn output_events(&self) -> &[String] {
        &self.output_events
    }

    /// The caller-side module implementing this activity.
    pub fn module(&self) -> &str {
        &self.module
    }
}

/// The payload of a graph node.
///
/// Split nodes name their mate join and vice versa, so a well-formed model
/// always carries matched pairs.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum NodeData {
    /// The entry sentinel.
    Start,
    /// The exit sentinel.
    End,
    /// A user activity.
    Activity(Activity),
    /// Exclusive-choice split: exactly one branch commits.
    Or {
        /// This node's id.
        id: String,
        /// The id of the mate [`NodeData::Join`].
        join: String,
    },
    /// Parallel-all split: every branch runs.
    And {
        /// This node's id.
        id: String,
        /// The id of the mate [`NodeData::Join`].
        join: String,
    },
    /// Merge node closing an [`NodeData::Or`] or [`NodeData::And`] region.
    Join {
        /// This node's id.
        id: String,
        /// The id of the split this join closes.
        for_node: String,
    },
}

impl NodeData {
    /// The node id this data occupies in a graph.
    pub fn id(&self) -> NodeId {
        match self {
            NodeData::Start => NodeId::Start,
            NodeData::End => NodeId::End,
            NodeData::Activity(activity) => NodeId::key(activity.id()),
            NodeData::Or { id, .. } | NodeData::And { id, .. } | NodeData::Join { id, .. } => {
                NodeId::key(id.clone())
            }
        }
    }

    /// The activity payload, if this is an activity node.
    pub fn as_activity(&self) -> Option<&Activity> {
        match self {
            NodeData::Activity(activity) => Some(activity),
            _ => None,
        }
    }

    /// Whether this is an exclusive-choice split.
    pub fn is_or(&self) -> bool {
        matches!(self, NodeData::Or { .. })
    }

    /// Whether this is a parallel-all split.
    pub fn is_and(&self) -> bool {
        matches!(self, NodeData::And { .. })
    }

    /// Whether this is a join.
    pub fn is_join(&self) -> bool {
        matches!(self, NodeData::Join { .. })
    }
}
