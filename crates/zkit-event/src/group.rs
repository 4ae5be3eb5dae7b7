//! The per-tick driver.
//!
//! # Tick Execution Model
//!
//! ```text
//! update(frame_events, dt):
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Phase 1: Prune                                             │
//! │    - apply removals requested through Context::remove       │
//! │    - evict members whose is_alive() is false                │
//! │    - drop subscriptions of non-members                      │
//! │  Phase 2: Dispatch frame events in arrival order            │
//! │  Phase 3: Drain the dispatch queue                          │
//! │    - pop (priority asc, newest first), dispatch, count      │
//! │    - handlers may publish more; count > cap aborts the tick │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dispatch is a loop, never handler → group → handler recursion, so stack
//! depth stays flat no matter how many events handlers publish.

use core::fmt;

use smallvec::SmallVec;
use tracing::{debug, error, trace};

use crate::config::GroupConfig;
use crate::entity::{Entity, Roster};
use crate::error::{DispatchError, DispatchResult};
use crate::event::Event;
use crate::queue::DispatchQueue;
use crate::registry::SubscriptionRegistry;
use crate::subscription::Listener;

/// Handle given to handlers while they run.
pub struct Context<'a> {
    queue: &'a mut DispatchQueue,
    removals: &'a mut Vec<Entity>,
    owner: Entity,
    tick: u64,
}

impl Context<'_> {
    /// Member whose handler is running.
    #[must_use]
    pub const fn owner(&self) -> Entity {
        self.owner
    }

    /// Number of the tick being dispatched.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Queue an event for later in this tick, published by the running
    /// member.
    pub fn publish(&mut self, event: Event) {
        self.queue.push(Some(self.owner), event);
    }

    /// Queue an event on behalf of another source.
    pub fn publish_from(&mut self, source: impl Into<Option<Entity>>, event: Event) {
        self.queue.push(source.into(), event);
    }

    /// Ask for `entity` to leave the group.
    ///
    /// The member keeps receiving events for the rest of this tick and is
    /// removed when the next tick prunes.
    pub fn remove(&mut self, entity: Entity) {
        self.removals.push(entity);
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("owner", &self.owner)
            .field("tick", &self.tick)
            .field("pending", &self.queue.len())
            .finish_non_exhaustive()
    }
}

/// Work done by one [`EventGroup::update`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub tick: u64,
    /// Members removed or evicted while pruning.
    pub evicted: usize,
    /// Subscriptions dropped while pruning.
    pub pruned: usize,
    /// Frame events dispatched.
    pub external: usize,
    /// Queued events dispatched.
    pub drained: usize,
}

/// A set of listeners and the events routed to them.
pub struct EventGroup<L: Listener> {
    members: Roster<L>,
    registry: SubscriptionRegistry<L>,
    queue: DispatchQueue,
    removals: Vec<Entity>,
    config: GroupConfig,
    tick: u64,
}

impl<L: Listener> Default for EventGroup<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Listener> EventGroup<L> {
    /// Create a group with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GroupConfig::default())
    }

    /// Create a group with the given configuration.
    #[must_use]
    pub fn with_config(config: GroupConfig) -> Self {
        Self {
            members: Roster::new(),
            registry: SubscriptionRegistry::new(),
            queue: DispatchQueue::new(),
            removals: Vec::new(),
            config,
            tick: 0,
        }
    }

    /// Join the group and bind the listener's handlers.
    ///
    /// The new subscriptions are matched from the next dispatch on.
    pub fn add(&mut self, listener: L) -> Entity {
        let entity = self.members.insert(listener);
        let bound = self.bind(entity);
        debug!(%entity, bound, "member joined");
        entity
    }

    /// Add several listeners, returning their handles in order.
    pub fn add_all(&mut self, listeners: impl IntoIterator<Item = L>) -> Vec<Entity> {
        listeners.into_iter().map(|l| self.add(l)).collect()
    }

    /// Bind any of the member's handlers that are not bound yet.
    ///
    /// Returns the number of new subscriptions; `0` for non-members.
    pub fn bind(&mut self, entity: Entity) -> usize {
        let Some(member) = self.members.get(entity) else {
            return 0;
        };
        let bindings = member.bindings();
        self.registry.bind(entity, bindings)
    }

    /// Take a member out of the group.
    ///
    /// Its subscriptions are dropped at the next prune and never fire again.
    pub fn remove(&mut self, entity: Entity) -> Option<L> {
        let member = self.members.remove(entity)?;
        debug!(%entity, "member left");
        Some(member)
    }

    /// Queue an event for the drain phase.
    ///
    /// The source is not checked for membership. Events published between
    /// ticks wait for the next [`update`](Self::update).
    pub fn publish(&mut self, source: impl Into<Option<Entity>>, event: Event) {
        self.queue.push(source.into(), event);
    }

    /// Run one tick.
    ///
    /// On error the rest of the tick is abandoned and the queue is cleared.
    /// Effects of handlers that already ran are kept.
    pub fn update(&mut self, frame_events: &[Event], delta_time: f64) -> DispatchResult<TickStats> {
        self.tick += 1;
        let tick = self.tick;
        let _span = tracing::trace_span!("tick", tick).entered();

        let (evicted, pruned) = self.prune();
        let mut stats = TickStats {
            tick,
            evicted,
            pruned,
            ..TickStats::default()
        };

        for event in frame_events {
            if let Err(e) = self.dispatch(event, delta_time) {
                self.queue.clear();
                return Err(e);
            }
            stats.external += 1;
        }

        let limit = self.config.max_events_per_tick.get();
        while let Some(queued) = self.queue.pop() {
            if stats.drained >= limit {
                let dropped = self.queue.len() + 1;
                self.queue.clear();
                error!(tick, limit, dropped, "possible infinite event loop, aborting tick");
                return Err(DispatchError::InfiniteLoopSuspected { tick, limit });
            }
            stats.drained += 1;

            trace!(
                key = %queued.event.key(),
                priority = ?queued.priority(),
                source = ?queued.source,
                "draining"
            );
            if let Err(e) = self.dispatch(&queued.event, delta_time) {
                self.queue.clear();
                return Err(e);
            }
        }

        Ok(stats)
    }

    /// Remove departed members and their subscriptions.
    fn prune(&mut self) -> (usize, usize) {
        let mut evicted = 0;

        for entity in std::mem::take(&mut self.removals) {
            if self.members.remove(entity).is_some() {
                debug!(%entity, "member removed");
                evicted += 1;
            }
        }

        let dead: SmallVec<[Entity; 8]> = self
            .members
            .iter()
            .filter(|(_, member)| !member.is_alive())
            .map(|(entity, _)| entity)
            .collect();
        for entity in dead {
            self.members.remove(entity);
            debug!(%entity, "member no longer alive, evicted");
            evicted += 1;
        }

        let members = &self.members;
        let pruned = self.registry.unbind_stale(|owner| members.contains(owner));
        if pruned > 0 {
            debug!(pruned, "dropped stale subscriptions");
        }
        (evicted, pruned)
    }

    /// Run every subscription matching `event`, in registration order.
    fn dispatch(&mut self, event: &Event, delta_time: f64) -> DispatchResult<()> {
        let matches = self.registry.matching(event);
        if matches.is_empty() {
            trace!(key = %event.key(), "no subscribers");
            return Ok(());
        }

        for index in matches {
            let Some(sub) = self.registry.get(index) else {
                continue;
            };
            let owner = sub.owner();
            let Some(member) = self.members.get_mut(owner) else {
                continue;
            };

            let mut ctx = Context {
                queue: &mut self.queue,
                removals: &mut self.removals,
                owner,
                tick: self.tick,
            };
            sub.execute(member, event, delta_time, &mut ctx)
                .map_err(|source| DispatchError::Handler {
                    owner,
                    handler: sub.id(),
                    key: event.key().clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Get a member by handle.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&L> {
        self.members.get(entity)
    }

    /// Get a member mutably by handle.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut L> {
        self.members.get_mut(entity)
    }

    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.members.contains(entity)
    }

    /// Members with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &L)> + '_ {
        self.members.iter()
    }

    /// Get the number of members.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Subscriptions currently held, including ones awaiting pruning.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.registry.len()
    }

    /// Get the subscription registry.
    #[must_use]
    pub const fn registry(&self) -> &SubscriptionRegistry<L> {
        &self.registry
    }

    /// Events queued for the next drain.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of the last tick started.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Get the group configuration.
    #[must_use]
    pub const fn config(&self) -> &GroupConfig {
        &self.config
    }
}

impl<L: Listener> fmt::Debug for EventGroup<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventGroup")
            .field("members", &self.members.len())
            .field("subscriptions", &self.registry.len())
            .field("pending", &self.queue.len())
            .field("tick", &self.tick)
            .field("config", &self.config)
            .finish()
    }
}
