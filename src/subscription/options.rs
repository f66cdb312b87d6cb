use std::any::Any;
use std::sync::Arc;

use crate::event::ObjectRef;

/// How a subscription is scoped and owned.
///
/// The default is an ambient, persistent subscription that matches the event
/// name from any publisher.
///
/// ```
/// use std::sync::Arc;
/// use pubsub_rust::SubscribeOptions;
///
/// let user_a = Arc::new("userA");
/// let screen = Arc::new("login-screen");
///
/// let options = SubscribeOptions::new()
///     .publisher(&user_a)
///     .subscriber(&screen)
///     .once();
/// assert!(options.is_once());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SubscribeOptions {
    pub(crate) publisher: Option<ObjectRef>,
    pub(crate) subscriber: Option<ObjectRef>,
    pub(crate) once: bool,
}

impl SubscribeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only match events raised by `publisher`.
    pub fn publisher<T>(self, publisher: &Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        self.publisher_ref(ObjectRef::new(publisher))
    }

    pub fn publisher_ref(mut self, publisher: ObjectRef) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Tie the subscription to `subscriber`'s lifetime.
    pub fn subscriber<T>(self, subscriber: &Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        self.subscriber_ref(ObjectRef::new(subscriber))
    }

    pub fn subscriber_ref(mut self, subscriber: ObjectRef) -> Self {
        self.subscriber = Some(subscriber);
        self
    }

    /// Retire the subscription after its first invocation.
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    pub fn is_once(&self) -> bool {
        self.once
    }
}
