use std::sync::Arc;

use crate::subscription::{Subscription, SubscriptionToken};

/// Snapshot produced by [`Registry::matching`](super::Registry::matching).
///
/// `live` is what dispatch iterates; it is detached from the registry, so
/// concurrent subscribes and unsubscribes never disturb it. `stale` lists
/// subscriptions whose subscriber was found dead, for pruning afterwards.
#[derive(Debug, Default)]
pub struct Matches {
    pub live: Vec<Arc<Subscription>>,
    pub stale: Vec<SubscriptionToken>,
}

impl Matches {
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn tokens(&self) -> Vec<SubscriptionToken> {
        self.live.iter().map(|sub| sub.token()).collect()
    }
}
