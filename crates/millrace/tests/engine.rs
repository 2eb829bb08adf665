//! End-to-end scenarios.
//!
//! These tests drive complete instance lifecycles: model construction
//! through the combinators, then a stream of events stepped one at a time
//! until the instance reports done.

use std::sync::Arc;

use millrace::{
    Activity, Condition, Event, NodeData, ProcessInstance, ProcessModel, Result, SequenceIds,
};

fn activity(id: &str) -> ProcessModel {
    ProcessModel::activity(Activity::new(id))
}

fn drive(model: ProcessModel, events: &[&str]) -> Result<ProcessInstance> {
    let mut instance = ProcessInstance::with_id(Arc::new(model), "test-instance")?;
    for event_type in events {
        instance = instance.step(Event::new(*event_type))?;
    }
    Ok(instance)
}

fn active_ids(instance: &ProcessInstance) -> Vec<&str> {
    instance
        .currently_active_activities()
        .iter()
        .map(|a| a.id())
        .collect()
}

#[test]
fn neutral_model_is_done_immediately() -> Result<()> {
    let instance = drive(ProcessModel::neutral(), &[])?;

    assert!(instance.is_done());
    Ok(())
}

#[test]
fn unconditioned_activity_completes_at_creation() -> Result<()> {
    // All edges are always-true, so the instance runs straight to End.
    let model = activity("1");

    let instance = drive(model, &[])?;
    assert!(instance.is_done());

    Ok(())
}

#[test]
fn sequential_model_advances_one_activity_per_satisfying_event() -> Result<()> {
    let model = activity("first")
        .with_end_condition(Condition::is_type("A"))
        .append(activity("second").with_end_condition(Condition::is_type("B")))?;

    // B arrives before the first activity's gate: nothing moves.
    let instance = drive(model.clone(), &["B"])?;
    assert_eq!(active_ids(&instance), vec!["first"]);

    let instance = instance.step(Event::new("A"))?;
    assert_eq!(active_ids(&instance), vec!["second"]);
    assert!(!instance.is_done());

    let instance = instance.step(Event::new("B"))?;
    assert!(instance.is_done());

    Ok(())
}

#[test]
fn exclusive_choice_keeps_both_branches_until_one_commits() -> Result<()> {
    let mut ids = SequenceIds::new("gate");
    let model = activity("1")
        .with_start_condition(Condition::is_type("A"))
        .one_of(
            activity("2").with_start_condition(Condition::is_type("B")),
            &mut ids,
        )?;

    // An unrelated event leaves both branch steps pending at the split.
    let instance = drive(model, &["C"])?;
    let active = instance.currently_active();
    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|data| data.is_or()));

    // A commits branch 1; the losing branch is dropped, the join (mated to
    // an Or) passes immediately and the instance runs to End.
    let instance = instance.step(Event::new("A"))?;
    assert!(instance.is_done());

    Ok(())
}

#[test]
fn exclusive_choice_commits_whichever_branch_fires() -> Result<()> {
    let mut ids = SequenceIds::new("gate");
    let model = activity("1")
        .with_start_condition(Condition::is_type("A"))
        .one_of(
            activity("2").with_start_condition(Condition::is_type("B")),
            &mut ids,
        )?
        .with_end_condition(Condition::is_type("Finish"));

    // B commits branch 2, whose always-true exit cascades on the same
    // event: the instance parks at the join, gated by the end condition.
    let instance = drive(model, &["B"])?;
    assert!(instance
        .currently_active()
        .iter()
        .all(|data| data.is_join()));
    assert!(!instance.is_done());

    let instance = instance.step(Event::new("Finish"))?;
    assert!(instance.is_done());

    Ok(())
}

#[test]
fn parallel_branches_join_only_when_both_finish() -> Result<()> {
    let mut ids = SequenceIds::new("gate");
    let model = activity("1")
        .with_start_condition(Condition::is_type("A"))
        .both(
            activity("2").with_start_condition(Condition::is_type("B")),
            &mut ids,
        )?;

    // Both branch steps pend at the split.
    let instance = drive(model, &["C"])?;
    let active = instance.currently_active();
    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|data| data.is_and()));

    // One branch finishing is not enough: the join holds.
    let instance = instance.step(Event::new("A"))?;
    assert!(!instance.is_done());
    assert!(instance
        .currently_active()
        .iter()
        .any(|data| data.is_join()));

    let instance = instance.step(Event::new("B"))?;
    assert!(instance.is_done());

    Ok(())
}

#[test]
fn loop_repeats_while_its_condition_fires() -> Result<()> {
    let mut ids = SequenceIds::new("gate");
    let model = activity("work")
        .with_start_condition(Condition::is_type("A"))
        .loop_while(Condition::is_type("B"), &mut ids)?
        .with_end_condition(Condition::is_type("C"));

    // A runs the body; B takes the back edge instead of finishing.
    let instance = drive(model, &["A", "B"])?;
    assert!(!instance.is_done());
    // Back at the join in front of the body, waiting for the next A.
    assert!(instance
        .currently_active()
        .iter()
        .all(|data| data.is_join()));

    // A second round through the body, then C exits the loop.
    let instance = instance.step(Event::new("A"))?;
    assert!(!instance.is_done());
    let instance = instance.step(Event::new("C"))?;
    assert!(instance.is_done());

    Ok(())
}

#[test]
fn step_appends_events_in_caller_order() -> Result<()> {
    let model = activity("work").with_end_condition(Condition::is_type("Done"));

    let instance = drive(model, &["X", "Y", "Done", "Z"])?;

    let types: Vec<&str> = instance.events().iter().map(|e| e.event_type()).collect();
    assert_eq!(types, vec!["X", "Y", "Done", "Z"]);
    assert!(instance.is_done());

    Ok(())
}

#[test]
fn composed_model_runs_to_done_along_a_satisfying_path() -> Result<()> {
    let mut ids = SequenceIds::new("gate");

    let intake = activity("intake").with_end_condition(Condition::is_type("IntakeDone"));
    let fast = activity("fast").with_start_condition(Condition::is_type("Fast"));
    let slow = activity("slow").with_start_condition(Condition::is_type("Slow"));
    let ship = activity("ship").with_end_condition(Condition::is_type("Shipped"));

    let model = intake.append(fast.one_of(slow, &mut ids)?)?.append(ship)?;

    let instance = drive(model, &[])?;
    assert_eq!(active_ids(&instance), vec!["intake"]);

    let instance = instance.step(Event::new("IntakeDone"))?;
    assert!(instance.currently_active().iter().all(|data| data.is_or()));

    let instance = instance.step(Event::new("Fast"))?;
    assert_eq!(active_ids(&instance), vec!["ship"]);

    let instance = instance.step(Event::new("Shipped"))?;
    assert!(instance.is_done());

    Ok(())
}

#[test]
fn done_instances_report_the_end_node() -> Result<()> {
    let instance = drive(ProcessModel::neutral(), &[])?;

    assert_eq!(instance.currently_active(), vec![&NodeData::End]);
    assert!(instance.currently_active_activities().is_empty());

    Ok(())
}

#[test]
fn one_event_can_satisfy_a_chain_of_gates() -> Result<()> {
    // Steps expanded during a fixed-point run are offered the same event,
    // so consecutive gates satisfied by it all fire in one call.
    let model = activity("work")
        .with_start_condition(Condition::is_type("A"))
        .with_end_condition(Condition::is_type("A"));

    let instance = drive(model, &["A"])?;
    assert!(instance.is_done());

    Ok(())
}

#[test]
fn only_the_newest_event_is_consulted() -> Result<()> {
    // B is already in the log when `work`'s end gate comes up, but stepping
    // only ever offers the newest event: the gate waits for a fresh B.
    let model = activity("work")
        .with_start_condition(Condition::is_type("A"))
        .with_end_condition(Condition::is_type("B"));

    let instance = drive(model, &["B", "A"])?;
    assert_eq!(active_ids(&instance), vec!["work"]);
    assert!(!instance.is_done());

    let instance = instance.step(Event::new("B"))?;
    assert!(instance.is_done());

    Ok(())
}
