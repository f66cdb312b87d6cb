//! Process-wide bus.
//!
//! The global bus is created on first use with inline execution, or with
//! [`init_global_bus`] when the first caller wants a specific configuration.
//! It lives for the rest of the process; nothing needs to tear it down.
//!
//! ```
//! use pubsub_rust::global;
//!
//! let token = global::subscribe("app.ready", |event| {
//!     println!("{} fired", event.name());
//! })
//! .unwrap();
//!
//! global::publish_named("app.ready").unwrap();
//! global::unsubscribe(token);
//! ```

use std::sync::{Arc, OnceLock};

use super::EventBus;
use crate::config::BusConfig;
use crate::dispatch::{DispatchReport, ExecutionQueue};
use crate::error::PubSubError;
use crate::event::{Event, ObjectRef};
use crate::subscription::{SubscribeOptions, SubscriptionToken};

static GLOBAL_BUS: OnceLock<EventBus> = OnceLock::new();

/// Configure the global bus, if it has not been created yet.
///
/// Returns the global bus either way; a configuration passed after first use
/// is ignored.
pub fn init_global_bus(config: &BusConfig) -> Result<&'static EventBus, PubSubError> {
    if let Some(bus) = GLOBAL_BUS.get() {
        return Ok(bus);
    }
    let bus = EventBus::with_config(config)?;
    Ok(GLOBAL_BUS.get_or_init(|| bus))
}

/// The global bus, created with defaults on first use.
pub fn global_bus() -> &'static EventBus {
    GLOBAL_BUS.get_or_init(EventBus::new)
}

pub fn set_execution_queue(queue: Option<Arc<dyn ExecutionQueue>>) {
    global_bus().set_execution_queue(queue)
}

pub fn publish(event: Event) -> Result<DispatchReport, PubSubError> {
    global_bus().publish(event)
}

pub fn publish_named(name: &str) -> Result<DispatchReport, PubSubError> {
    global_bus().publish_named(name)
}

pub fn subscribe<F>(name: &str, callback: F) -> Result<SubscriptionToken, PubSubError>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    global_bus().subscribe(name, callback)
}

pub fn subscribe_once<F>(name: &str, callback: F) -> Result<SubscriptionToken, PubSubError>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    global_bus().subscribe_once(name, callback)
}

pub fn subscribe_with<F>(
    name: &str,
    options: SubscribeOptions,
    callback: F,
) -> Result<SubscriptionToken, PubSubError>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    global_bus().subscribe_with(name, options, callback)
}

pub fn unsubscribe(token: SubscriptionToken) -> bool {
    global_bus().unsubscribe(token)
}

pub fn unsubscribe_all(subscriber: &ObjectRef) -> usize {
    global_bus().unsubscribe_all(subscriber)
}

pub fn unsubscribe_event(subscriber: &ObjectRef, name: &str) -> usize {
    global_bus().unsubscribe_event(subscriber, name)
}
