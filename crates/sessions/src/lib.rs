//! Session state for Concierge.
//!
//! Sessions live in memory only. Each one carries its detected language,
//! bounded conversation history, topic trail and the scenario sub-records
//! (arrival delay, booking changes, seasonal state) the pipeline consults
//! on every turn.

pub mod context;
pub mod lifecycle;
pub mod session_key;
pub mod store;

pub use context::{
    BookingChangeUpdate, ContextUpdate, DelayUpdate, HistoryLimits, Season, SessionContext,
    SessionSeed,
};
pub use lifecycle::ExpiryPolicy;
pub use session_key::{is_valid_session_id, resolve_session_id};
pub use store::SessionStore;
