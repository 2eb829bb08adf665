//! Pending transitions out of the nodes an instance currently occupies.

use serde::{Deserialize, Serialize};

use crate::condition::{Condition, Eval};
use crate::error::Result;
use crate::event::Event;
use crate::model::ProcessModel;
use crate::node::{NodeData, NodeId};

/// One pending outgoing transition from an active node.
///
/// `condition` is the edge's original condition and never changes;
/// `rest_condition` is the residual obligation after partial evaluation
/// against the events seen so far. Steps are totally ordered (by origin
/// node, then target) so an instance's step set can be kept deduplicated
/// and canonically sorted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcessStep {
    node_id: NodeId,
    target: Option<NodeId>,
    condition: Condition,
    rest_condition: Condition,
    node_data: NodeData,
}

/// The result of offering an event to a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The condition fired; the instance advances to this node.
    Transition(NodeId),
    /// Still pending, possibly with a smaller residual.
    NoTransition(ProcessStep),
}

impl ProcessStep {
    /// The steps representing the pending transitions leaving `node_id`.
    ///
    /// The End node yields a single terminal step that never fires; any
    /// other node yields one step per outgoing edge.
    pub fn make(model: &ProcessModel, node_id: &NodeId) -> Result<Vec<ProcessStep>> {
        let node_data = model.node_data(node_id)?.clone();

        if matches!(node_data, NodeData::End) {
            return Ok(vec![ProcessStep {
                node_id: NodeId::End,
                target: None,
                condition: Condition::never(),
                rest_condition: Condition::never(),
                node_data,
            }]);
        }

        Ok(model
            .conditions_with_targets(node_id)
            .into_iter()
            .map(|(condition, target)| ProcessStep {
                node_id: node_id.clone(),
                target: Some(target),
                rest_condition: condition.clone(),
                condition,
                node_data: node_data.clone(),
            })
            .collect())
    }

    /// Offer the newest event to this step.
    ///
    /// Only the residual condition is evaluated; the original is kept
    /// untouched for inspection.
    pub fn step(&self, last_event: Option<&Event>) -> StepOutcome {
        match (self.rest_condition.eval(last_event), &self.target) {
            (Eval::Done, Some(target)) => StepOutcome::Transition(target.clone()),
            // Terminal steps carry `never()` and have no target.
            (Eval::Done, None) => StepOutcome::NoTransition(self.clone()),
            (Eval::Rest(rest_condition), _) => StepOutcome::NoTransition(ProcessStep {
                rest_condition,
                ..self.clone()
            }),
        }
    }

    /// The node this step leaves from.
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// The node this step transitions to, or `None` for the terminal step.
    pub fn target(&self) -> Option<&NodeId> {
        self.target.as_ref()
    }

    /// The edge's original condition.
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// The remaining obligation.
    pub fn rest_condition(&self) -> &Condition {
        &self.rest_condition
    }

    /// The data of the node this step leaves from.
    pub fn node_data(&self) -> &NodeData {
        &self.node_data
    }
}
