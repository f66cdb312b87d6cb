//! Subscription registry.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        Registry                           │
//! │  RwLock<Table>                                            │
//! │    by_name : "login" -> [sub-1, sub-4, sub-7]  (ordered)  │
//! │    by_token: sub-4   -> "login"                           │
//! └──────────────────────────────────────────────────────────┘
//!        │ matching(event)            ▲ subscribe / unsubscribe
//!        ▼                            │ retire / prune
//!   Matches { live, stale }  ──► Dispatcher
//! ```
//!
//! Every mutation takes the write side of one lock; `matching` takes the read
//! side and hands back a detached snapshot.

mod matches;
mod registry;

pub use matches::Matches;
pub use registry::Registry;
