//! Event bus - registry, execution mode and dispatch behind one handle.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::stats::{BusStats, StatsSnapshot};
use crate::config::{BusConfig, ExecutionConfig};
use crate::dispatch::{DispatchReport, Dispatcher, ExecutionMode, ExecutionQueue, ThreadQueue};
use crate::error::PubSubError;
use crate::event::{Event, ObjectRef};
use crate::registry::Registry;
use crate::subscription::{SubscribeOptions, SubscriptionToken};

/// In-process publish/subscribe bus.
///
/// Callbacks registered for an event name run whenever an event of that name
/// is published, optionally only for one publisher, optionally only once,
/// and only while their subscriber (if any) is still alive.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use pubsub_rust::{Event, EventBus, SubscribeOptions};
///
/// let bus = EventBus::new();
/// let user_a = Arc::new("userA");
/// let user_b = Arc::new("userB");
///
/// let logins = Arc::new(AtomicUsize::new(0));
/// let counter = logins.clone();
/// bus.subscribe_with("login", SubscribeOptions::new().publisher(&user_a), move |_| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// })
/// .unwrap();
///
/// bus.publish(Event::new("login").from_publisher(&user_a)).unwrap();
/// bus.publish(Event::new("login").from_publisher(&user_b)).unwrap();
/// assert_eq!(logins.load(Ordering::SeqCst), 1);
/// ```
pub struct EventBus {
    registry: Registry,
    mode: RwLock<ExecutionMode>,
    dispatcher: Dispatcher,
    stats: BusStats,
}

impl EventBus {
    /// A bus with inline execution.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            mode: RwLock::new(ExecutionMode::Inline),
            dispatcher: Dispatcher::default(),
            stats: BusStats::default(),
        }
    }

    /// A bus built from configuration, spawning a worker thread if asked to.
    pub fn with_config(config: &BusConfig) -> Result<Self, PubSubError> {
        let mode = match &config.execution {
            ExecutionConfig::Inline => ExecutionMode::Inline,
            ExecutionConfig::Thread { name } => {
                ExecutionMode::queued(ThreadQueue::spawn(name.as_str())?)
            }
        };

        debug!(?mode, trace_dispatch = config.trace_dispatch, "Created event bus");

        Ok(Self {
            registry: Registry::new(),
            mode: RwLock::new(mode),
            dispatcher: Dispatcher::new(config.trace_dispatch),
            stats: BusStats::default(),
        })
    }

    /// Route callbacks through `queue`, or back inline with `None`.
    ///
    /// Only affects events published after the call.
    pub fn set_execution_queue(&self, queue: Option<Arc<dyn ExecutionQueue>>) {
        self.set_execution_mode(ExecutionMode::from(queue));
    }

    pub fn set_execution_mode(&self, mode: ExecutionMode) {
        debug!(?mode, "Execution mode changed");
        *self.mode.write() = mode;
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.mode.read().clone()
    }

    /// Publish `event` to every live, matching subscription.
    ///
    /// Inline mode returns after every callback has run; queued mode returns
    /// once they have all been submitted.
    pub fn publish(&self, event: Event) -> Result<DispatchReport, PubSubError> {
        if event.name().is_empty() {
            return Err(PubSubError::EmptyEventName);
        }

        let matches = self.registry.matching(&event);
        let mode = self.execution_mode();
        let report = self.dispatcher.dispatch(&self.registry, event, matches, &mode);
        self.stats.record(&report);
        Ok(report)
    }

    /// Publish an event with no publisher and no payload.
    pub fn publish_named(&self, name: &str) -> Result<DispatchReport, PubSubError> {
        self.publish(Event::new(name))
    }

    /// Ambient, persistent subscription to `name` from any publisher.
    pub fn subscribe<F>(&self, name: &str, callback: F) -> Result<SubscriptionToken, PubSubError>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.registry.subscribe(name, SubscribeOptions::new(), callback)
    }

    /// Ambient subscription that retires after its first invocation.
    pub fn subscribe_once<F>(&self, name: &str, callback: F) -> Result<SubscriptionToken, PubSubError>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.registry.subscribe(name, SubscribeOptions::new().once(), callback)
    }

    /// Subscription with a publisher filter, an owning subscriber or once
    /// semantics.
    pub fn subscribe_with<F>(
        &self,
        name: &str,
        options: SubscribeOptions,
        callback: F,
    ) -> Result<SubscriptionToken, PubSubError>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.registry.subscribe(name, options, callback)
    }

    /// Cancel one subscription. Stale tokens are ignored.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.registry.unsubscribe(token)
    }

    /// Cancel everything `subscriber` owns.
    pub fn unsubscribe_all(&self, subscriber: &ObjectRef) -> usize {
        self.registry.unsubscribe_all(subscriber)
    }

    /// Cancel what `subscriber` owns for one event name.
    pub fn unsubscribe_event(&self, subscriber: &ObjectRef, name: &str) -> usize {
        self.registry.unsubscribe_event(subscriber, name)
    }

    /// Drop subscriptions whose subscriber no longer exists.
    pub fn prune(&self) -> usize {
        let pruned = self.registry.prune();
        self.stats.add_pruned(pruned);
        pruned
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
