//! Events and the object identities attached to them.

mod event;
mod object_ref;

pub use event::{Event, Payload};
pub use object_ref::ObjectRef;
