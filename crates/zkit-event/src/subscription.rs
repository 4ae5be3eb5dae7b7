//! Handler bindings and the subscriptions built from them.

use std::fmt;

use smallvec::SmallVec;

use crate::entity::Entity;
use crate::error::HandlerError;
use crate::event::{Event, EventKey};
use crate::group::Context;
use crate::value::Value;

/// Type-erased handler function.
///
/// Called with the owning member, the event, the frame's delta time and the
/// dispatch context.
pub(crate) type HandlerFn<L> =
    Box<dyn Fn(&mut L, &Event, f64, &mut Context<'_>) -> Result<(), HandlerError>>;

/// Exact-match attribute constraints.
pub type Filters = SmallVec<[(String, Value); 2]>;

/// Stable name of a handler on its entity type.
///
/// Together with the owner it identifies a subscription, so binding the
/// same handler twice for one member is a no-op.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(&'static str);

impl HandlerId {
    /// Create a handler id from its name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Get the handler name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Capability implemented by anything that can join an event group.
pub trait Listener: Sized + 'static {
    /// Enumerate the handlers this entity exposes.
    fn bindings(&self) -> Vec<Binding<Self>>;

    /// Whether the entity should stay in the group.
    ///
    /// Members reporting `false` are evicted at the start of the next tick.
    fn is_alive(&self) -> bool {
        true
    }
}

/// A handler declared by a listener: "route events with this key, matching
/// these filters, to this function".
///
/// # Example
///
/// ```
/// use zkit_event::{Binding, Listener};
///
/// struct Hero {
///     quits: u32,
/// }
///
/// impl Listener for Hero {
///     fn bindings(&self) -> Vec<Binding<Self>> {
///         vec![
///             Binding::new("on_escape_down", "KEYDOWN", |hero: &mut Hero, _, _, _| {
///                 hero.quits += 1;
///                 Ok(())
///             })
///             .with_filter("key", "K_ESCAPE"),
///         ]
///     }
/// }
/// ```
pub struct Binding<L> {
    pub(crate) id: HandlerId,
    pub(crate) key: EventKey,
    pub(crate) filters: Filters,
    pub(crate) handler: HandlerFn<L>,
}

impl<L: 'static> Binding<L> {
    /// Create a binding routing `key` events to `handler`.
    pub fn new<F>(id: &'static str, key: impl Into<EventKey>, handler: F) -> Self
    where
        F: Fn(&mut L, &Event, f64, &mut Context<'_>) -> Result<(), HandlerError> + 'static,
    {
        Self {
            id: HandlerId::new(id),
            key: key.into(),
            filters: Filters::new(),
            handler: Box::new(handler),
        }
    }

    /// Require `name` to be present on the event and equal to `value`.
    #[must_use]
    pub fn with_filter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((name.into(), value.into()));
        self
    }

    /// Get the handler id.
    #[must_use]
    pub const fn id(&self) -> HandlerId {
        self.id
    }

    /// Get the event key the handler listens on.
    #[must_use]
    pub const fn key(&self) -> &EventKey {
        &self.key
    }
}

impl<L> fmt::Debug for Binding<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

/// A binding attached to a specific group member.
pub struct Subscription<L> {
    owner: Entity,
    id: HandlerId,
    key: EventKey,
    filters: Filters,
    handler: HandlerFn<L>,
}

impl<L> Subscription<L> {
    pub(crate) fn new(owner: Entity, binding: Binding<L>) -> Self {
        let Binding {
            id,
            key,
            filters,
            handler,
        } = binding;
        Self {
            owner,
            id,
            key,
            filters,
            handler,
        }
    }

    /// Get the member that owns this subscription.
    #[must_use]
    pub const fn owner(&self) -> Entity {
        self.owner
    }

    /// Get the handler id.
    #[must_use]
    pub const fn id(&self) -> HandlerId {
        self.id
    }

    /// Get the event key the subscription listens on.
    #[must_use]
    pub const fn key(&self) -> &EventKey {
        &self.key
    }

    /// Get the attribute filters, in the order they were added.
    #[must_use]
    pub fn filters(&self) -> &[(String, Value)] {
        &self.filters
    }

    /// Identity used to reject duplicate registrations.
    #[must_use]
    pub const fn identity(&self) -> (Entity, HandlerId) {
        (self.owner, self.id)
    }

    /// Check whether `event` should be routed here.
    ///
    /// A filter on an attribute the event does not carry fails the match.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        self.key == *event.key()
            && self
                .filters
                .iter()
                .all(|(name, expected)| event.attr(name) == Some(expected))
    }

    /// Run the handler against its owner.
    pub fn execute(
        &self,
        owner: &mut L,
        event: &Event,
        delta_time: f64,
        ctx: &mut Context<'_>,
    ) -> Result<(), HandlerError> {
        (self.handler)(owner, event, delta_time, ctx)
    }
}

impl<L> fmt::Debug for Subscription<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("owner", &self.owner)
            .field("id", &self.id)
            .field("key", &self.key)
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Roster;

    struct Stub;

    fn escape_subscription() -> Subscription<Stub> {
        let owner = Roster::new().insert(Stub);
        let binding = Binding::new("on_escape", "KEYDOWN", |_: &mut Stub, _, _, _| Ok(()))
            .with_filter("key", "K_ESCAPE");
        Subscription::new(owner, binding)
    }

    #[test]
    fn test_filter_matches_exact_value() {
        let sub = escape_subscription();
        assert!(sub.matches(&Event::new("KEYDOWN").with_attr("key", "K_ESCAPE")));
    }

    #[test]
    fn test_filter_rejects_other_value() {
        let sub = escape_subscription();
        assert!(!sub.matches(&Event::new("KEYDOWN").with_attr("key", "K_SPACE")));
    }

    #[test]
    fn test_filter_rejects_missing_attribute() {
        let sub = escape_subscription();
        assert!(!sub.matches(&Event::new("KEYDOWN")));
        assert!(!sub.matches(&Event::new("KEYDOWN").with_attr("unicode", "K_ESCAPE")));
    }

    #[test]
    fn test_key_must_match() {
        let sub = escape_subscription();
        assert!(!sub.matches(&Event::new("KEYUP").with_attr("key", "K_ESCAPE")));
    }

    #[test]
    fn test_extra_attributes_are_ignored() {
        let sub = escape_subscription();
        let event = Event::new("KEYDOWN")
            .with_attr("key", "K_ESCAPE")
            .with_attr("mod", 0);
        assert!(sub.matches(&event));
    }

    #[test]
    fn test_filter_compares_by_variant() {
        let owner = Roster::new().insert(Stub);
        let sub = Subscription::new(
            owner,
            Binding::new("on_level", "LEVEL", |_: &mut Stub, _, _, _| Ok(()))
                .with_filter("index", 1),
        );
        assert!(sub.matches(&Event::new("LEVEL").with_attr("index", 1)));
        assert!(!sub.matches(&Event::new("LEVEL").with_attr("index", 1.0)));
    }
}
