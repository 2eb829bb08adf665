//! Process-model engine for event-driven workflows.
//!
//! Millrace advances *process instances* — running executions of a
//! declarative process model — through their nodes as domain events arrive:
//!
//! - **Combinator-built models** — [`ProcessModel`] is a monoid under
//!   sequential [`append`](ProcessModel::append) with
//!   [`neutral`](ProcessModel::neutral) as identity, plus
//!   [`one_of`](ProcessModel::one_of) (exclusive choice),
//!   [`both`](ProcessModel::both) (parallel-all) and
//!   [`loop_while`](ProcessModel::loop_while). Every model is a well-formed
//!   graph with a unique Start, a unique End and matched split/join pairs.
//! - **Residual conditions** — transitions are gated by a small
//!   [`Condition`] language whose staged
//!   [`and_then`](Condition::and_then) operator consumes one event at a
//!   time, leaving only the *remaining* obligation on each pending step.
//! - **Pure functional core** — [`ProcessInstance::step`] is a
//!   deterministic total function of `(instance, event)` with no side
//!   effects; models are deeply immutable and safely shareable.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        ProcessInstance::step                            │
//! │                                                                         │
//! │   1. Append the event to the instance's log                             │
//! │   2. Offer the newest event to every pending ProcessStep                │
//! │   3. Fired transitions expand their target's outgoing edges             │
//! │   4. Exclusive splits drop their losing branch                          │
//! │   5. Parallel joins hold until every branch has drained                 │
//! │   6. Repeat from 2 until the step set stops changing                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use millrace::{Activity, Condition, Event, ProcessInstance, ProcessModel, SequenceIds};
//!
//! # fn main() -> millrace::Result<()> {
//! let review = ProcessModel::activity(Activity::new("review"))
//!     .with_end_condition(Condition::is_type("ReviewApproved"));
//! let publish = ProcessModel::activity(Activity::new("publish"))
//!     .with_end_condition(Condition::is_type("Published"));
//! let model = Arc::new(review.append(publish)?);
//!
//! let mut ids = SequenceIds::new("instance");
//! let instance = ProcessInstance::start(model, &mut ids)?;
//! assert_eq!(instance.currently_active_activities()[0].id(), "review");
//!
//! let instance = instance.step(Event::new("ReviewApproved"))?;
//! assert_eq!(instance.currently_active_activities()[0].id(), "publish");
//!
//! let instance = instance.step(Event::new("Published"))?;
//! assert!(instance.is_done());
//! # Ok(()) }
//! ```
//!
//! The engine only reads activity metadata. It surfaces runnable activities
//! via [`ProcessInstance::currently_active_activities`]; the caller executes
//! them and feeds the emitted events back through
//! [`ProcessInstance::step`].
//!
//! # Design Documentation
//!
//! See `DESIGN.md` for architectural decisions.

mod condition;
mod error;
mod event;
mod graph;
mod id;
mod instance;
mod model;
mod node;
mod step;
mod stepping;
mod value;

pub use condition::{Condition, Eval};
pub use error::{Error, Result};
pub use event::Event;
pub use graph::{Edge, Graph, Paths};
pub use id::{NewId, SequenceIds, UuidIds};
pub use instance::{InstanceId, ProcessInstance};
pub use model::ProcessModel;
pub use node::{Activity, NodeData, NodeId};
pub use nonempty::NonEmpty;
pub use step::{ProcessStep, StepOutcome};
pub use value::FieldValue;
