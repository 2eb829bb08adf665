//! The fixed-point stepping engine.
//!
//! Advancing an instance is a pure fold: given the previous step set and the
//! newest event, fire every firable transition, expand each target's
//! outgoing edges into fresh steps, and repeat until the step set stops
//! changing. Two rules go beyond the generic per-step evaluation:
//!
//! - an exclusive split drops its losing branch as soon as a sibling branch
//!   commits, and
//! - a join closing a parallel split holds until every node between the
//!   split and the join has drained from the step set.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::error::Result;
use crate::event::Event;
use crate::model::ProcessModel;
use crate::node::{NodeData, NodeId};
use crate::step::{ProcessStep, StepOutcome};

/// Run the step set to a fixed point against the newest event.
///
/// The fixed-point test is structural equality of the canonicalized step
/// set, so the result is deterministic given the model and the event log.
pub(crate) fn run(
    model: &ProcessModel,
    steps: Vec<ProcessStep>,
    events: &[Event],
) -> Result<Vec<ProcessStep>> {
    let mut state = canonical(steps);
    let mut iterations = 0usize;
    loop {
        let next = advance_once(model, &state, events.last())?;
        iterations += 1;
        if next == state {
            debug!(iterations, steps = state.len(), "stepping reached fixed point");
            return Ok(state);
        }
        state = next;
    }
}

/// One pass over the previous step set.
fn advance_once(
    model: &ProcessModel,
    previous: &[ProcessStep],
    last_event: Option<&Event>,
) -> Result<Vec<ProcessStep>> {
    let mut current: Vec<ProcessStep> = Vec::new();

    for step in previous {
        if step.node_data().is_or() && or_decided(step, &current, previous) {
            trace!(node = %step.node_id(), "exclusive split decided, dropping branch");
            continue;
        }

        if let NodeData::Join { for_node, .. } = step.node_data() {
            if joins_parallel_split(model, for_node)? && !and_done(model, previous, step)? {
                current.push(step.clone());
                continue;
            }
        }

        match step.step(last_event) {
            StepOutcome::NoTransition(waiting) => current.push(waiting),
            StepOutcome::Transition(target) => {
                trace!(from = %step.node_id(), to = %target, "transition fired");
                current.extend(ProcessStep::make(model, &target)?);
            }
        }
    }

    Ok(canonical(current))
}

/// Sort and deduplicate a step set into its canonical form.
fn canonical(mut steps: Vec<ProcessStep>) -> Vec<ProcessStep> {
    steps.sort();
    steps.dedup();
    steps
}

/// Whether an exclusive split has committed to a sibling of `step`, making
/// `step` the losing branch.
///
/// Splits are built binary, so the step set holds at most two steps per
/// split. The split is decided when `step` is the sole survivor of the pair
/// in the previous set (its sibling committed in an earlier pass), or when
/// it is the second of the pair and nothing for the split has accumulated
/// in the current set (its sibling committed earlier in this pass).
fn or_decided(step: &ProcessStep, current: &[ProcessStep], previous: &[ProcessStep]) -> bool {
    let siblings: Vec<&ProcessStep> = previous
        .iter()
        .filter(|s| s.node_id() == step.node_id())
        .collect();

    match siblings.as_slice() {
        [_lone] => true,
        [_, second] => {
            **second == *step && !current.iter().any(|s| s.node_id() == step.node_id())
        }
        _ => false,
    }
}

/// Whether `for_node` names a parallel (And) split.
fn joins_parallel_split(model: &ProcessModel, for_node: &str) -> Result<bool> {
    let mate = model.node_data(&NodeId::key(for_node))?;
    Ok(mate.is_and())
}

/// Whether every branch of the parallel split closed by `step`'s join has
/// reached the join.
///
/// Enumerates the (bounded) paths from the split to the join and checks
/// that no node on any of them still appears in the step set. The bounded
/// enumeration can only overestimate the set of intermediate nodes, which
/// can delay the join but never release it early.
fn and_done(model: &ProcessModel, previous: &[ProcessStep], step: &ProcessStep) -> Result<bool> {
    let NodeData::Join { id, for_node } = step.node_data() else {
        return Ok(true);
    };
    let split_id = NodeId::key(for_node.clone());
    let join_id = NodeId::key(id.clone());

    let mut pending: BTreeSet<NodeId> = BTreeSet::new();
    for path in model.graph().paths(&split_id, &join_id)? {
        pending.extend(path.into_iter().filter(|node| *node != join_id));
    }

    Ok(!previous.iter().any(|s| pending.contains(s.node_id())))
}
