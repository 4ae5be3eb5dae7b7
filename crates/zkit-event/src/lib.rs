//! zkit event groups
//!
//! Per-tick event dispatch for frame-stepped simulations.
//!
//! # Core Concepts
//!
//! - **Listener**: an entity type that enumerates its handlers as
//!   [`Binding`]s and reports whether it is still alive.
//! - **EventGroup**: owns its listeners, binds their handlers as
//!   subscriptions, and routes events to them once per tick.
//! - **Frame events**: input for the tick, dispatched in arrival order.
//! - **Published events**: queued by handlers (or between ticks) and drained
//!   by priority, newest first among equal priorities, until the queue is
//!   empty or the per-tick cap trips.
//!
//! # Example
//!
//! ```
//! use zkit_event::{Binding, Event, EventGroup, Listener};
//!
//! struct Hero {
//!     jumps: u32,
//! }
//!
//! impl Listener for Hero {
//!     fn bindings(&self) -> Vec<Binding<Self>> {
//!         vec![
//!             Binding::new("on_space_down", "KEYDOWN", |hero: &mut Hero, _, _, ctx| {
//!                 hero.jumps += 1;
//!                 ctx.publish(Event::new("jumped").with_priority(1));
//!                 Ok(())
//!             })
//!             .with_filter("key", "K_SPACE"),
//!         ]
//!     }
//! }
//!
//! let mut group = EventGroup::new();
//! let hero = group.add(Hero { jumps: 0 });
//!
//! let stats = group
//!     .update(&[Event::new("KEYDOWN").with_attr("key", "K_SPACE")], 16.0)
//!     .unwrap();
//!
//! assert_eq!(group.get(hero).unwrap().jumps, 1);
//! assert_eq!(stats.drained, 1);
//! ```

mod config;
mod entity;
mod error;
mod event;
mod group;
mod queue;
mod registry;
mod subscription;
mod value;

pub use config::{DEFAULT_MAX_EVENTS_PER_TICK, GroupConfig, MAX_EVENTS_ENV};
pub use entity::{Entity, Generation, Roster};
pub use error::{ConfigError, DispatchError, DispatchResult, HandlerError};
pub use event::{Event, EventKey, Priority};
pub use group::{Context, EventGroup, TickStats};
pub use queue::{DispatchQueue, QueuedEvent};
pub use registry::{Matches, SubscriptionRegistry};
pub use subscription::{Binding, Filters, HandlerId, Listener, Subscription};
pub use value::{Attributes, Value};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Binding, Context, DispatchError, Entity, Event, EventGroup, GroupConfig, HandlerError,
        Listener, Priority, Value,
    };
}
