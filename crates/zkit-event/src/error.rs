//! Dispatch error types.

use thiserror::Error;

use crate::entity::Entity;
use crate::event::EventKey;
use crate::subscription::HandlerId;

/// Error returned by event handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort a tick.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// More queued events were processed in one tick than the configured cap.
    #[error("possible infinite event loop: tick {tick} processed more than {limit} queued events")]
    InfiniteLoopSuspected { tick: u64, limit: usize },

    /// A handler failed. The rest of the tick was abandoned.
    #[error("handler {handler} on {owner} failed for {key}: {source}")]
    Handler {
        owner: Entity,
        handler: HandlerId,
        key: EventKey,
        #[source]
        source: HandlerError,
    },
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held something unparsable.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    /// The per-tick cap must be positive.
    #[error("max_events_per_tick must be at least 1")]
    ZeroLimit,
}
