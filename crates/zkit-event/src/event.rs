//! Event payloads.
//!
//! An [`Event`] is routed by its [`EventKey`], ordered in the dispatch queue
//! by its [`Priority`], and matched against subscription filters by its
//! attributes. Events are read-only once built.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{Attributes, Value};

/// Discriminator used to route an event to subscriptions.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKey(Cow<'static, str>);

impl EventKey {
    /// Create a key from a static name.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventKey({})", self.0)
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for EventKey {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for EventKey {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// Processing priority of a published event.
///
/// Smaller explicit values run first. [`Priority::Lowest`] sorts after every
/// explicit value and is what events get when no priority is given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum Priority {
    Explicit(i64),
    Lowest,
}

impl Priority {
    /// Priority of events published without one.
    pub const DEFAULT: Self = Self::Lowest;

    /// Check whether this is the default sentinel.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Lowest)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i64> for Priority {
    fn from(value: i64) -> Self {
        Self::Explicit(value)
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Self::Explicit(i64::from(value))
    }
}

impl From<Option<i64>> for Priority {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::DEFAULT, Self::Explicit)
    }
}

impl From<Priority> for Option<i64> {
    fn from(value: Priority) -> Self {
        match value {
            Priority::Explicit(v) => Some(v),
            Priority::Lowest => None,
        }
    }
}

/// An event with a key, a priority and named attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    key: EventKey,
    #[serde(default, skip_serializing_if = "Priority::is_default")]
    priority: Priority,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    attributes: Attributes,
}

impl Event {
    /// Create an event with no attributes and the default priority.
    #[must_use]
    pub fn new(key: impl Into<EventKey>) -> Self {
        Self {
            key: key.into(),
            priority: Priority::DEFAULT,
            attributes: Attributes::new(),
        }
    }

    /// Set an explicit priority.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Add a named attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Get the event key.
    #[must_use]
    pub const fn key(&self) -> &EventKey {
        &self.key
    }

    /// Get the event priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Get all attributes carried by the event.
    #[must_use]
    pub const fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Look up a single attribute.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }
}
