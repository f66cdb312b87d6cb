use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::error::PubSubError;
use crate::event::{Event, ObjectRef};
use crate::subscription::{Callback, SubscribeOptions, Subscription, SubscriptionToken};

use super::Matches;

#[derive(Default)]
struct Table {
    /// Event name -> subscriptions in insertion order.
    by_name: HashMap<Arc<str>, Vec<Arc<Subscription>>>,
    /// Token -> event name, for O(1) unsubscribe lookup.
    by_token: HashMap<SubscriptionToken, Arc<str>>,
}

impl Table {
    /// Kill and remove every subscription under `name` that satisfies `pred`.
    fn remove_where<P>(&mut self, name: &str, mut pred: P) -> Vec<Arc<Subscription>>
    where
        P: FnMut(&Subscription) -> bool,
    {
        let Some(subs) = self.by_name.get_mut(name) else {
            return Vec::new();
        };

        let mut removed = Vec::new();
        subs.retain(|sub| {
            if pred(sub) {
                // Entries in the table are always alive; claiming here just
                // publishes the death to snapshots still holding the Arc.
                sub.claim();
                removed.push(Arc::clone(sub));
                false
            } else {
                true
            }
        });

        if subs.is_empty() {
            self.by_name.remove(name);
        }
        for sub in &removed {
            self.by_token.remove(&sub.token());
        }
        removed
    }

    fn remove_token(&mut self, token: SubscriptionToken) -> Option<Arc<Subscription>> {
        let name = self.by_token.get(&token)?.clone();
        self.remove_where(&name, |sub| sub.token() == token).pop()
    }

    fn names(&self) -> Vec<Arc<str>> {
        self.by_name.keys().cloned().collect()
    }
}

/// The subscription table: event name to ordered subscriptions.
///
/// A `Registry` owns every [`Subscription`] record and serialises all
/// mutation behind one lock. Matching takes the shared side of the lock and
/// returns a snapshot, so callbacks never run while the lock is held and are
/// free to subscribe, unsubscribe or publish re-entrantly.
///
/// Most code uses a registry through [`EventBus`](crate::EventBus); tests
/// can build independent instances with [`Registry::new`].
///
/// ## Example
///
/// ```
/// use pubsub_rust::{Event, Registry, SubscribeOptions};
///
/// let registry = Registry::new();
/// let token = registry
///     .subscribe("tick", SubscribeOptions::new(), |_event| {})
///     .unwrap();
///
/// assert_eq!(registry.matching(&Event::new("tick")).len(), 1);
/// registry.unsubscribe(token);
/// assert!(registry.matching(&Event::new("tick")).is_empty());
/// ```
#[derive(Default)]
pub struct Registry {
    table: RwLock<Table>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `event_name`.
    ///
    /// Identical registrations are not merged: subscribing the same callback
    /// twice yields two tokens and two invocations per event.
    pub fn subscribe<F>(
        &self,
        event_name: &str,
        options: SubscribeOptions,
        callback: F,
    ) -> Result<SubscriptionToken, PubSubError>
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.insert(event_name, options, Arc::new(callback))
    }

    /// Register an already-shared callback.
    pub fn insert(
        &self,
        event_name: &str,
        options: SubscribeOptions,
        callback: Callback,
    ) -> Result<SubscriptionToken, PubSubError> {
        if event_name.is_empty() {
            return Err(PubSubError::EmptyEventName);
        }

        let mut table = self.table.write();
        let name = match table.by_name.get_key_value(event_name) {
            Some((existing, _)) => Arc::clone(existing),
            None => Arc::from(event_name),
        };

        // Abandoned entries under this name go before the bucket grows.
        let pruned = table.remove_where(&name, Subscription::is_stale).len();

        let sub = Arc::new(Subscription::new(Arc::clone(&name), options, callback));
        let token = sub.token();

        debug!(
            %token,
            event = %name,
            once = sub.is_once(),
            filtered = sub.publisher().is_some(),
            owned = sub.subscriber().is_some(),
            pruned,
            "Subscribed"
        );

        table.by_token.insert(token, Arc::clone(&name));
        table.by_name.entry(name).or_default().push(sub);
        Ok(token)
    }

    /// Cancel one subscription.
    ///
    /// Unknown and already-cancelled tokens are ignored. Returns whether
    /// anything was removed.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let removed = self.table.write().remove_token(token).is_some();
        if removed {
            debug!(%token, "Unsubscribed");
        }
        removed
    }

    /// Cancel every subscription owned by `subscriber`, across all names.
    ///
    /// The same pass drops stale subscriptions of any owner. Only the ones
    /// owned by `subscriber` are counted in the result.
    pub fn unsubscribe_all(&self, subscriber: &ObjectRef) -> usize {
        let mut table = self.table.write();
        let mut removed = 0;
        let mut pruned = 0;
        for name in table.names() {
            let swept = table.remove_where(&name, |sub| {
                sub.is_owned_by(subscriber) || sub.is_stale()
            });
            for sub in swept {
                if sub.is_owned_by(subscriber) {
                    removed += 1;
                } else {
                    pruned += 1;
                }
            }
        }

        debug!(subscriber = subscriber.id(), removed, pruned, "Unsubscribed all");
        removed
    }

    /// Cancel the subscriptions `subscriber` holds for one event name.
    pub fn unsubscribe_event(&self, subscriber: &ObjectRef, event_name: &str) -> usize {
        let removed = self
            .table
            .write()
            .remove_where(event_name, |sub| sub.is_owned_by(subscriber))
            .len();

        debug!(
            subscriber = subscriber.id(),
            event = event_name,
            removed,
            "Unsubscribed event"
        );
        removed
    }

    /// Subscriptions that should see `event`, in insertion order.
    ///
    /// A pure read: subscriptions whose subscriber has gone away are left in
    /// place and reported in [`Matches::stale`] for the caller to prune.
    pub fn matching(&self, event: &Event) -> Matches {
        let table = self.table.read();
        let mut matches = Matches::default();

        let Some(subs) = table.by_name.get(event.name()) else {
            return matches;
        };

        for sub in subs {
            if sub.is_stale() {
                matches.stale.push(sub.token());
            } else if sub.matches(event) {
                matches.live.push(Arc::clone(sub));
            }
        }
        matches
    }

    /// Claim and remove `sub` in one step.
    ///
    /// Exactly one caller ever gets `true` for a given subscription, no
    /// matter how many threads race here or in [`unsubscribe`](Self::unsubscribe).
    ///
    /// A subscription whose subscriber is already gone is not retired; it is
    /// left for pruning.
    pub fn retire(&self, sub: &Subscription) -> bool {
        let mut table = self.table.write();
        if !sub.is_live() {
            return false;
        }
        table.remove_token(sub.token()).is_some()
    }

    /// Remove the listed subscriptions if they are still stale.
    pub fn prune_tokens(&self, tokens: &[SubscriptionToken]) -> usize {
        if tokens.is_empty() {
            return 0;
        }

        let mut table = self.table.write();
        let mut pruned = 0;
        for &token in tokens {
            let Some(name) = table.by_token.get(&token).cloned() else {
                continue;
            };
            pruned += table
                .remove_where(&name, |sub| sub.token() == token && sub.is_stale())
                .len();
        }

        if pruned > 0 {
            trace!(pruned, "Pruned stale subscriptions");
        }
        pruned
    }

    /// Remove every subscription whose subscriber no longer exists.
    pub fn prune(&self) -> usize {
        let mut table = self.table.write();
        let pruned: usize = table
            .names()
            .iter()
            .map(|name| table.remove_where(name, Subscription::is_stale).len())
            .sum();

        if pruned > 0 {
            trace!(pruned, "Pruned stale subscriptions");
        }
        pruned
    }

    /// Whether `token` still names a registered subscription.
    pub fn contains(&self, token: SubscriptionToken) -> bool {
        self.table.read().by_token.contains_key(&token)
    }

    /// Number of registered subscriptions, stale ones included.
    pub fn len(&self) -> usize {
        self.table.read().by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().by_token.is_empty()
    }

    /// Number of registered subscriptions for one event name.
    pub fn count(&self, event_name: &str) -> usize {
        self.table
            .read()
            .by_name
            .get(event_name)
            .map_or(0, Vec::len)
    }

    /// Event names that currently have at least one subscription.
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .table
            .read()
            .by_name
            .keys()
            .map(|name| name.to_string())
            .collect();
        names.sort();
        names
    }

    /// Cancel everything.
    pub fn clear(&self) {
        let mut table = self.table.write();
        for sub in table.by_name.values().flatten() {
            sub.claim();
        }
        let cleared = table.by_token.len();
        table.by_name.clear();
        table.by_token.clear();
        debug!(cleared, "Cleared registry");
    }
}
