//! In-process publish/subscribe event bus.
//!
//! Any component can announce a named [`Event`], optionally attributed to the
//! object that raised it and carrying a payload. Any other component can
//! register interest in that name, globally or for one publisher only, and is
//! called back when a matching event is published.
//!
//! - Subscribers are tracked through weak [`ObjectRef`] handles: dropping a
//!   subscriber silences its subscriptions without an explicit unsubscribe.
//! - Once-subscriptions retire after their first invocation, exactly once
//!   even under concurrent publishes.
//! - Callbacks run inline on the publishing thread, or on an
//!   [`ExecutionQueue`] such as [`ThreadQueue`].
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use pubsub_rust::{EventBus, SubscribeOptions};
//!
//! let bus = EventBus::new();
//! let screen = Arc::new("ready-screen");
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let counter = hits.clone();
//! bus.subscribe_with("ready", SubscribeOptions::new().subscriber(&screen), move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! })
//! .unwrap();
//!
//! bus.publish_named("ready").unwrap();
//! drop(screen);
//! bus.publish_named("ready").unwrap();
//!
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

pub mod bus;
mod config;
pub mod dispatch;
mod error;
mod event;
pub mod registry;
mod subscription;

pub use bus::global::{self, global_bus, init_global_bus};
pub use bus::{EventBus, StatsSnapshot};
pub use config::{BusConfig, ExecutionConfig};
pub use dispatch::{
    DispatchReport, Dispatcher, ExecutionMode, ExecutionQueue, QueueStats, Task, ThreadQueue,
};
#[cfg(feature = "tokio")]
pub use dispatch::TokioQueue;
pub use error::PubSubError;
pub use event::{Event, ObjectRef, Payload};
pub use registry::{Matches, Registry};
pub use subscription::{Callback, SubscribeOptions, Subscription, SubscriptionToken};
