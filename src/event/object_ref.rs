//! Non-owning object identity.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};

/// A weak, identity-comparable handle to a shared object.
///
/// `ObjectRef` is how the bus names publishers and subscribers without
/// keeping them alive. It observes an `Arc<T>` through a [`Weak`], so
/// dropping the last strong handle makes [`is_alive`](Self::is_alive)
/// return `false` and every subscription owned by that object goes quiet.
///
/// Two handles are the same object when they point at the same allocation;
/// the value inside is never compared. The weak count keeps the allocation
/// reserved, so its address cannot be reused by another object while any
/// `ObjectRef` to it exists.
///
/// ```
/// use std::sync::Arc;
/// use pubsub_rust::ObjectRef;
///
/// let user = Arc::new(String::from("alice"));
/// let handle = ObjectRef::new(&user);
/// assert!(handle.is_alive());
///
/// drop(user);
/// assert!(!handle.is_alive());
/// ```
#[derive(Clone)]
pub struct ObjectRef {
    target: Weak<dyn Any + Send + Sync>,
}

impl ObjectRef {
    /// Observe `object` without extending its lifetime.
    pub fn new<T>(object: &Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        let strong: Arc<dyn Any + Send + Sync> = object.clone();
        Self {
            target: Arc::downgrade(&strong),
        }
    }

    /// Whether the observed object still exists.
    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// Identity comparison: true when both handles observe the same allocation.
    pub fn same_object(&self, other: &ObjectRef) -> bool {
        Weak::ptr_eq(&self.target, &other.target)
    }

    /// Identity comparison against a live `Arc`.
    pub fn is<T>(&self, object: &Arc<T>) -> bool
    where
        T: Any + Send + Sync,
    {
        std::ptr::addr_eq(self.target.as_ptr(), Arc::as_ptr(object))
    }

    /// Address-derived identity, stable for as long as this handle exists.
    pub fn id(&self) -> usize {
        self.target.as_ptr() as *const () as usize
    }

    /// Untyped strong access, keeping the object alive while the result is
    /// held.
    pub fn pin(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.target.upgrade()
    }

    /// Typed strong access, if the object is alive and is a `T`.
    pub fn upgrade<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.target.upgrade()?.downcast::<T>().ok()
    }
}

impl<T> From<&Arc<T>> for ObjectRef
where
    T: Any + Send + Sync,
{
    fn from(object: &Arc<T>) -> Self {
        ObjectRef::new(object)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.same_object(other)
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("id", &format_args!("{:#x}", self.id()))
            .field("alive", &self.is_alive())
            .finish()
    }
}
