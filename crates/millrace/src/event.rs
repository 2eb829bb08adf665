//! Domain events consumed by process instances.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::value::FieldValue;

/// An opaque domain event: a nominal type plus named fields.
///
/// The engine never interprets events beyond comparing their type against
/// [`Condition::is_type`](crate::Condition::is_type) arguments and reading
/// named fields; an absent field resolves to [`FieldValue::Null`].
///
/// # Example
///
/// ```
/// use millrace::{Event, FieldValue};
///
/// let event = Event::new("OrderPlaced")
///     .with_field("order_id", "ord-123")
///     .with_field("total", 99);
///
/// assert_eq!(event.event_type(), "OrderPlaced");
/// assert_eq!(event.field("total"), FieldValue::Int(99));
/// assert_eq!(event.field("missing"), FieldValue::Null);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    event_type: String,
    occurred_at: OffsetDateTime,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    fields: BTreeMap<String, FieldValue>,
}

impl Event {
    /// Create an event stamped with the current time.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self::at(event_type, OffsetDateTime::now_utc())
    }

    /// Create an event with an explicit timestamp.
    pub fn at(event_type: impl Into<String>, occurred_at: OffsetDateTime) -> Self {
        Self {
            event_type: event_type.into(),
            occurred_at,
            fields: BTreeMap::new(),
        }
    }

    /// Attach a named field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The event's nominal type.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// When the event occurred (UTC).
    pub fn occurred_at(&self) -> OffsetDateTime {
        self.occurred_at
    }

    /// Read a field by name. Absent fields read as [`FieldValue::Null`].
    pub fn field(&self, name: &str) -> FieldValue {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// Whether the event's nominal type equals `event_type`.
    pub fn has_type(&self, event_type: &str) -> bool {
        self.event_type == event_type
    }
}
