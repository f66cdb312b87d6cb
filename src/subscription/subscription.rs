use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{SubscribeOptions, SubscriptionToken};
use crate::event::{Event, ObjectRef};

/// Handler invoked for each matching event.
pub type Callback = Arc<dyn Fn(&Event) + Send + Sync>;

/// One registered interest in an event name.
///
/// Owned by the [`Registry`](crate::Registry); callers only ever see the
/// [`SubscriptionToken`]. The `alive` flag only ever goes from `true` to
/// `false`, and whoever performs that transition owns the teardown.
pub struct Subscription {
    token: SubscriptionToken,
    event_name: Arc<str>,
    publisher: Option<ObjectRef>,
    subscriber: Option<ObjectRef>,
    callback: Callback,
    once: bool,
    alive: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(event_name: Arc<str>, options: SubscribeOptions, callback: Callback) -> Self {
        Self {
            token: SubscriptionToken::next(),
            event_name,
            publisher: options.publisher,
            subscriber: options.subscriber,
            callback,
            once: options.once,
            alive: AtomicBool::new(true),
        }
    }

    pub fn token(&self) -> SubscriptionToken {
        self.token
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn publisher(&self) -> Option<&ObjectRef> {
        self.publisher.as_ref()
    }

    pub fn subscriber(&self) -> Option<&ObjectRef> {
        self.subscriber.as_ref()
    }

    pub fn is_once(&self) -> bool {
        self.once
    }

    /// Not yet cancelled or retired.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// The owning subscriber, if any, still exists.
    pub fn subscriber_alive(&self) -> bool {
        self.subscriber.as_ref().map_or(true, ObjectRef::is_alive)
    }

    /// Eligible for dispatch right now.
    pub fn is_live(&self) -> bool {
        self.is_alive() && self.subscriber_alive()
    }

    /// Cancelled, or abandoned by its subscriber.
    pub(crate) fn is_stale(&self) -> bool {
        !self.is_live()
    }

    pub fn is_owned_by(&self, subscriber: &ObjectRef) -> bool {
        self.subscriber
            .as_ref()
            .is_some_and(|owner| owner.same_object(subscriber))
    }

    /// Name and publisher filter both accept `event`.
    pub fn matches(&self, event: &Event) -> bool {
        if &*self.event_name != event.name() {
            return false;
        }
        match &self.publisher {
            Some(filter) => event.is_from(filter),
            None => true,
        }
    }

    /// Atomically flip `alive` to `false`. Only the first caller gets `true`.
    pub(crate) fn claim(&self) -> bool {
        self.alive
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Run the callback with the subscriber pinned for the whole call.
    ///
    /// Returns `false`, without running anything, when the subscriber is
    /// already gone.
    pub(crate) fn invoke(&self, event: &Event) -> bool {
        let _pinned = match &self.subscriber {
            Some(subscriber) => match subscriber.pin() {
                Some(pinned) => Some(pinned),
                None => return false,
            },
            None => None,
        };
        (self.callback)(event);
        true
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("token", &self.token)
            .field("event_name", &self.event_name)
            .field("publisher", &self.publisher)
            .field("subscriber", &self.subscriber)
            .field("once", &self.once)
            .field("alive", &self.is_alive())
            .finish()
    }
}
