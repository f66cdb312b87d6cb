use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::ObjectRef;

/// Shared, type-erased event payload.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// An event announced on the bus.
///
/// Carries a name, optionally the identity of the object that raised it and
/// optionally a payload of any type. Events are immutable and cheap to clone,
/// so queued callbacks can share one instance.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use pubsub_rust::Event;
///
/// let user = Arc::new("alice");
/// let event = Event::new("login")
///     .from_publisher(&user)
///     .with_payload(42u32);
///
/// assert_eq!(event.name(), "login");
/// assert_eq!(event.data::<u32>(), Some(&42));
/// assert!(event.publisher().is_some());
/// ```
#[derive(Clone)]
pub struct Event {
    name: Arc<str>,
    publisher: Option<ObjectRef>,
    payload: Option<Payload>,
}

impl Event {
    /// Create an event with no publisher and no payload.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            publisher: None,
            payload: None,
        }
    }

    /// Attribute the event to `publisher`.
    pub fn from_publisher<T>(self, publisher: &Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        self.with_publisher(ObjectRef::new(publisher))
    }

    /// Attribute the event to an already-observed publisher.
    pub fn with_publisher(mut self, publisher: ObjectRef) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Attach a payload.
    pub fn with_payload<T>(self, payload: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.with_shared_payload(Arc::new(payload))
    }

    /// Attach a payload that is already shared.
    pub fn with_shared_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn publisher(&self) -> Option<&ObjectRef> {
        self.publisher.as_ref()
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// The payload downcast to `T`, if there is one of that type.
    pub fn data<T>(&self) -> Option<&T>
    where
        T: Any,
    {
        self.payload.as_deref()?.downcast_ref::<T>()
    }

    /// Whether this event was raised by `object` (identity match).
    pub fn is_from(&self, object: &ObjectRef) -> bool {
        self.publisher
            .as_ref()
            .is_some_and(|publisher| publisher.same_object(object))
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("publisher", &self.publisher)
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}
