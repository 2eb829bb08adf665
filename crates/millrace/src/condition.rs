//! The condition language gating process-model transitions.
//!
//! A [`Condition`] is a small tree-shaped predicate over a single event.
//! Most predicates are all-or-nothing: evaluated against one event they are
//! either satisfied or handed back unchanged to be retried on the next
//! event. The staged [`Condition::and_then`] combinator is the exception.
//! Once its left side has been satisfied, the obligation shrinks to the
//! right side, so a pending transition only ever carries the *remaining*
//! obligation — never a history of what already matched.
//!
//! # Example
//!
//! ```
//! use millrace::{Condition, Eval, Event};
//!
//! let condition = Condition::and_then(
//!     Condition::is_type("OrderPlaced"),
//!     Condition::is_type("PaymentReceived"),
//! );
//!
//! // The first stage is not satisfied, the condition is unchanged.
//! let Eval::Rest(rest) = condition.eval(Some(&Event::new("Ping"))) else {
//!     panic!("expected a residual");
//! };
//! assert_eq!(rest, condition);
//!
//! // The first stage fires and the residual is the second stage alone.
//! let Eval::Rest(rest) = condition.eval(Some(&Event::new("OrderPlaced"))) else {
//!     panic!("expected a residual");
//! };
//! assert_eq!(rest, Condition::is_type("PaymentReceived"));
//! assert_eq!(rest.eval(Some(&Event::new("PaymentReceived"))), Eval::Done);
//! ```

use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::value::FieldValue;

/// A predicate tree over a single event.
///
/// Build conditions with the constructors on this type rather than the
/// variants: the constructors simplify on the fly and keep
/// `Literal(Bool(true))` the canonical form of "satisfied".
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Condition {
    /// A literal value.
    Literal(FieldValue),
    /// Reads the named field from the event under evaluation.
    Field(String),
    /// True iff the event's nominal type equals the argument.
    IsType(String),
    /// Structural equality of the two sub-evaluations.
    Equals(Box<Condition>, Box<Condition>),
    /// Logical conjunction.
    And(Box<Condition>, Box<Condition>),
    /// Logical disjunction.
    Or(Box<Condition>, Box<Condition>),
    /// Staged conjunction: the right side is only considered once the left
    /// side has been satisfied by some event.
    AndThen(Box<Condition>, Box<Condition>),
}

/// The outcome of evaluating a condition against one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eval {
    /// The condition is satisfied.
    Done,
    /// The remaining obligation, to be retried against the next event.
    Rest(Condition),
}

impl Condition {
    /// A literal condition.
    pub fn literal(value: impl Into<FieldValue>) -> Self {
        Condition::Literal(value.into())
    }

    /// Reads the named field from the event under evaluation.
    pub fn field(name: impl Into<String>) -> Self {
        Condition::Field(name.into())
    }

    /// True iff the event's nominal type equals `event_type`.
    pub fn is_type(event_type: impl Into<String>) -> Self {
        Condition::IsType(event_type.into())
    }

    /// The always-satisfied condition.
    pub fn always() -> Self {
        Condition::Literal(FieldValue::Bool(true))
    }

    /// The never-satisfied condition.
    pub fn never() -> Self {
        Condition::Literal(FieldValue::Bool(false))
    }

    /// Structural equality of two sub-conditions' evaluations.
    pub fn equals(left: Condition, right: Condition) -> Self {
        Condition::Equals(Box::new(left), Box::new(right))
    }

    /// Conjunction, simplified on build: `always` is dropped, `never` wins.
    pub fn and(left: Condition, right: Condition) -> Self {
        if left.is_never() || right.is_never() {
            return Condition::never();
        }
        if left.is_always() {
            return right;
        }
        if right.is_always() {
            return left;
        }
        Condition::And(Box::new(left), Box::new(right))
    }

    /// Disjunction, simplified on build: `never` is dropped, `always` wins.
    pub fn or(left: Condition, right: Condition) -> Self {
        if left.is_always() || right.is_always() {
            return Condition::always();
        }
        if left.is_never() {
            return right;
        }
        if right.is_never() {
            return left;
        }
        Condition::Or(Box::new(left), Box::new(right))
    }

    /// Staged conjunction: `second` only becomes active once `first` has
    /// been satisfied.
    ///
    /// `always` is an identity on either side. Chains stay right-leaning:
    /// `and_then(and_then(a, b), c)` builds the same tree as
    /// `and_then(a, and_then(b, c))`.
    pub fn and_then(first: Condition, second: Condition) -> Self {
        if first.is_always() {
            return second;
        }
        if second.is_always() {
            return first;
        }
        match first {
            Condition::AndThen(head, tail) => {
                Condition::and_then(*head, Condition::and_then(*tail, second))
            }
            first => Condition::AndThen(Box::new(first), Box::new(second)),
        }
    }

    /// The common "an event of this type with this field value" predicate.
    pub fn event_field_equals(
        event_type: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Self {
        Condition::and(
            Condition::is_type(event_type),
            Condition::equals(Condition::field(field), Condition::literal(value)),
        )
    }

    /// Whether this is the canonical always-satisfied condition.
    pub fn is_always(&self) -> bool {
        matches!(self, Condition::Literal(FieldValue::Bool(true)))
    }

    /// Whether this is the canonical never-satisfied condition.
    pub fn is_never(&self) -> bool {
        matches!(self, Condition::Literal(FieldValue::Bool(false)))
    }

    /// Number of nodes in the tree. A residual is never larger than the
    /// condition it came from.
    pub fn size(&self) -> usize {
        match self {
            Condition::Literal(_) | Condition::Field(_) | Condition::IsType(_) => 1,
            Condition::Equals(a, b)
            | Condition::And(a, b)
            | Condition::Or(a, b)
            | Condition::AndThen(a, b) => 1 + a.size() + b.size(),
        }
    }

    /// Evaluate against one event, producing either [`Eval::Done`] or the
    /// remaining obligation.
    ///
    /// Every variant except `AndThen` is all-or-nothing: satisfied, or
    /// returned unchanged. `AndThen` drops its left side once that side
    /// evaluates truthy, and the right side is evaluated (staged) against
    /// the same event — a chain of stages may collapse on a single event.
    ///
    /// Evaluation never errors: an absent event makes field reads null and
    /// type tests false.
    pub fn eval(&self, event: Option<&Event>) -> Eval {
        match self {
            Condition::AndThen(first, rest) => {
                if first.evaluate(event).is_truthy() {
                    rest.eval(event)
                } else {
                    Eval::Rest(self.clone())
                }
            }
            _ => {
                if self.evaluate(event).is_truthy() {
                    Eval::Done
                } else {
                    Eval::Rest(self.clone())
                }
            }
        }
    }

    /// Plain recursive evaluation to a value, with `AndThen` read as an
    /// ordinary conjunction.
    fn evaluate(&self, event: Option<&Event>) -> FieldValue {
        match self {
            Condition::Literal(value) => value.clone(),
            Condition::Field(name) => event.map(|e| e.field(name)).unwrap_or_default(),
            Condition::IsType(event_type) => {
                FieldValue::Bool(event.is_some_and(|e| e.has_type(event_type)))
            }
            Condition::Equals(left, right) => {
                FieldValue::Bool(left.evaluate(event) == right.evaluate(event))
            }
            Condition::And(left, right) | Condition::AndThen(left, right) => FieldValue::Bool(
                left.evaluate(event).is_truthy() && right.evaluate(event).is_truthy(),
            ),
            Condition::Or(left, right) => FieldValue::Bool(
                left.evaluate(event).is_truthy() || right.evaluate(event).is_truthy(),
            ),
        }
    }
}
