//! Running process instances.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::event::Event;
use crate::id::NewId;
use crate::model::ProcessModel;
use crate::node::{Activity, NodeData, NodeId};
use crate::step::ProcessStep;
use crate::stepping;

/// A process instance identifier.
///
/// # Example
///
/// ```
/// use millrace::InstanceId;
///
/// let id = InstanceId::new("order-123");
/// assert_eq!(id.as_str(), "order-123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(String);

impl InstanceId {
    /// Create a new instance ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Consume the wrapper and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Borrow the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl From<String> for InstanceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for InstanceId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// A running execution of a process model: the ordered event log received so
/// far plus the deduplicated, canonically ordered set of pending steps.
///
/// Instances are immutable values: [`ProcessInstance::step`] consumes the
/// instance and returns the advanced one, so each call is a total function
/// of `(instance, event)`. The model is shared via [`Arc`] and never
/// changes for the life of the instance.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use millrace::{Activity, Condition, Event, ProcessInstance, ProcessModel, SequenceIds};
///
/// # fn main() -> millrace::Result<()> {
/// let model = Arc::new(
///     ProcessModel::activity(Activity::new("review"))
///         .with_end_condition(Condition::is_type("ReviewApproved")),
/// );
///
/// let mut ids = SequenceIds::new("instance");
/// let instance = ProcessInstance::start(model, &mut ids)?;
/// assert_eq!(instance.currently_active_activities()[0].id(), "review");
///
/// let instance = instance.step(Event::new("ReviewApproved"))?;
/// assert!(instance.is_done());
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInstance {
    id: InstanceId,
    model: Arc<ProcessModel>,
    current_steps: Vec<ProcessStep>,
    events: Vec<Event>,
}

impl ProcessInstance {
    /// Create an instance with an id drawn from the [`NewId`] service,
    /// positioned at Start and advanced to its initial fixed point.
    pub fn start(model: Arc<ProcessModel>, ids: &mut impl NewId) -> Result<Self> {
        Self::with_id(model, ids.new_id())
    }

    /// Create an instance with an explicit id.
    pub fn with_id(model: Arc<ProcessModel>, id: impl Into<InstanceId>) -> Result<Self> {
        let steps = ProcessStep::make(&model, &NodeId::Start)?;
        let current_steps = stepping::run(&model, steps, &[])?;
        Ok(Self {
            id: id.into(),
            model,
            current_steps,
            events: Vec::new(),
        })
    }

    /// Append an event to the log and advance to the next fixed point.
    pub fn step(mut self, event: Event) -> Result<Self> {
        debug!(
            instance = %self.id,
            event_type = event.event_type(),
            "stepping instance"
        );
        self.events.push(event);
        self.current_steps = stepping::run(
            &self.model,
            std::mem::take(&mut self.current_steps),
            &self.events,
        )?;
        Ok(self)
    }

    /// Whether the instance has reached End and nothing else is pending.
    pub fn is_done(&self) -> bool {
        matches!(
            self.current_steps.as_slice(),
            [only] if matches!(only.node_data(), NodeData::End)
        )
    }

    /// The data of every node with a pending step.
    pub fn currently_active(&self) -> Vec<&NodeData> {
        self.current_steps.iter().map(|s| s.node_data()).collect()
    }

    /// The currently active user activities, ready for the caller to run.
    pub fn currently_active_activities(&self) -> Vec<&Activity> {
        self.current_steps
            .iter()
            .filter_map(|s| s.node_data().as_activity())
            .collect()
    }

    /// The pending steps, deduplicated and canonically ordered.
    pub fn current_steps(&self) -> &[ProcessStep] {
        &self.current_steps
    }

    /// The event log, in exact arrival order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The instance id.
    pub fn id(&self) -> &InstanceId {
        &self.id
    }

    /// The model this instance executes.
    pub fn model(&self) -> &ProcessModel {
        &self.model
    }
}
