//! Event Bus - the public publish/subscribe surface.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          EventBus                            │
//! │  publish(event) ──► Registry::matching ──► Dispatcher        │
//! │                         (snapshot)          │                │
//! │                                             ├─ Inline        │
//! │                                             └─ Queued(queue) │
//! │  subscribe / subscribe_once / subscribe_with ──► Registry    │
//! │  unsubscribe / unsubscribe_all / unsubscribe_event           │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//!                 global:: free functions over one
//!                 process-wide EventBus (OnceLock)
//! ```

mod bus;
pub mod global;
mod stats;

pub use bus::EventBus;
pub use stats::StatsSnapshot;
