//! Subscription records and the tokens that name them.

mod options;
mod subscription;
mod token;

pub use options::SubscribeOptions;
pub use subscription::{Callback, Subscription};
pub use token::SubscriptionToken;
