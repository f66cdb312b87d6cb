//! Subscriber lifetimes and teardown.

use std::sync::Arc;

use parking_lot::Mutex;
use pubsub_rust::{EventBus, ObjectRef, SubscribeOptions};

use crate::support::{user, Hits};

#[test]
fn dropped_subscriber_is_not_invoked() {
    let bus = EventBus::new();
    let screen = user("screen");
    let hits = Hits::new();

    bus.subscribe_with(
        "ready",
        SubscribeOptions::new().subscriber(&screen),
        hits.handler(),
    )
    .unwrap();

    drop(screen);
    let report = bus.publish_named("ready").unwrap();

    assert_eq!(hits.count(), 0);
    assert_eq!(report.pruned, 1);
    assert!(bus.registry().is_empty());
}

#[test]
fn subscription_does_not_extend_subscriber_lifetime() {
    let bus = EventBus::new();
    let screen = user("screen");

    bus.subscribe_with(
        "ready",
        SubscribeOptions::new().subscriber(&screen).publisher(&screen),
        |_| {},
    )
    .unwrap();

    assert_eq!(Arc::strong_count(&screen), 1);
}

#[test]
fn unsubscribe_after_subscriber_dropped_is_harmless() {
    let bus = EventBus::new();
    let screen = user("screen");
    let hits = Hits::new();
    let token = bus
        .subscribe_with(
            "ready",
            SubscribeOptions::new().subscriber(&screen),
            hits.handler(),
        )
        .unwrap();
    let handle = ObjectRef::new(&screen);

    drop(screen);
    bus.publish_named("ready").unwrap();

    assert!(!bus.unsubscribe(token));
    assert!(!bus.unsubscribe(token));
    assert_eq!(bus.unsubscribe_all(&handle), 0);
}

#[test]
fn unsubscribe_twice_is_a_no_op() {
    let bus = EventBus::new();
    let hits = Hits::new();
    let token = bus.subscribe("tick", hits.handler()).unwrap();

    assert!(bus.unsubscribe(token));
    assert!(!bus.unsubscribe(token));

    bus.publish_named("tick").unwrap();
    assert_eq!(hits.count(), 0);
}

#[test]
fn unsubscribe_all_covers_every_event_name() {
    let bus = EventBus::new();
    let screen = user("screen");
    let other = user("other");
    let mine = Hits::new();
    let theirs = Hits::new();

    for name in ["login", "logout", "tick"] {
        bus.subscribe_with(name, SubscribeOptions::new().subscriber(&screen), mine.handler())
            .unwrap();
        bus.subscribe_with(name, SubscribeOptions::new().subscriber(&other), theirs.handler())
            .unwrap();
    }
    bus.subscribe_with(
        "tick",
        SubscribeOptions::new().subscriber(&screen).once(),
        mine.handler(),
    )
    .unwrap();

    assert_eq!(bus.unsubscribe_all(&ObjectRef::new(&screen)), 4);

    for name in ["login", "logout", "tick"] {
        bus.publish_named(name).unwrap();
    }
    assert_eq!(mine.count(), 0);
    assert_eq!(theirs.count(), 3);
}

#[test]
fn unsubscribe_event_keeps_other_names() {
    let bus = EventBus::new();
    let screen = user("screen");
    let login = Hits::new();
    let logout = Hits::new();
    let options = SubscribeOptions::new().subscriber(&screen);

    bus.subscribe_with("login", options.clone(), login.handler())
        .unwrap();
    bus.subscribe_with("logout", options, logout.handler())
        .unwrap();

    assert_eq!(bus.unsubscribe_event(&ObjectRef::new(&screen), "login"), 1);

    bus.publish_named("login").unwrap();
    bus.publish_named("logout").unwrap();
    assert_eq!(login.count(), 0);
    assert_eq!(logout.count(), 1);
}

#[test]
fn ambient_subscriptions_survive_owner_teardown() {
    let bus = EventBus::new();
    let screen = user("screen");
    let ambient = Hits::new();

    bus.subscribe("tick", ambient.handler()).unwrap();
    bus.subscribe_with("tick", SubscribeOptions::new().subscriber(&screen), |_| {})
        .unwrap();

    bus.unsubscribe_all(&ObjectRef::new(&screen));
    drop(screen);
    bus.publish_named("tick").unwrap();

    assert_eq!(ambient.count(), 1);
}

#[test]
fn dropped_publisher_filter_matches_nothing() {
    let bus = EventBus::new();
    let source = user("source");
    let hits = Hits::new();
    bus.subscribe_with(
        "tick",
        SubscribeOptions::new().publisher(&source),
        hits.handler(),
    )
    .unwrap();

    drop(source);
    let stranger = user("stranger");
    bus.publish(pubsub_rust::Event::new("tick").from_publisher(&stranger))
        .unwrap();
    bus.publish_named("tick").unwrap();

    assert_eq!(hits.count(), 0);
}

#[test]
fn prune_sweeps_all_names() {
    let bus = EventBus::new();
    let screen = user("screen");
    for name in ["a", "b", "c"] {
        bus.subscribe_with(name, SubscribeOptions::new().subscriber(&screen), |_| {})
            .unwrap();
    }
    bus.subscribe("a", |_| {}).unwrap();

    drop(screen);
    assert_eq!(bus.prune(), 3);
    assert_eq!(bus.registry().event_names(), vec!["a".to_string()]);
}

#[test]
fn churned_subscribers_do_not_accumulate() {
    let bus = EventBus::new();
    let bystander = user("bystander");

    for i in 0..1000 {
        let screen = user("screen");
        let options = SubscribeOptions::new().subscriber(&screen);
        bus.subscribe_with("screen.closed", options.clone(), |_| {})
            .unwrap();
        bus.subscribe_with(&format!("n{}", i % 3), options, |_| {})
            .unwrap();
        drop(screen);

        bus.unsubscribe_all(&ObjectRef::new(&bystander));
    }
    bus.publish_named("other").unwrap();

    assert_eq!(bus.registry().len(), 0);
    assert!(bus.registry().event_names().is_empty());
}

#[test]
fn resubscribing_a_name_clears_abandoned_entries() {
    let bus = EventBus::new();
    for _ in 0..100 {
        let screen = user("screen");
        bus.subscribe_with(
            "screen.closed",
            SubscribeOptions::new().subscriber(&screen),
            |_| {},
        )
        .unwrap();
    }

    assert_eq!(bus.registry().count("screen.closed"), 1);
}

#[test]
fn subscriber_stays_alive_for_the_whole_callback() {
    let bus = EventBus::new();
    let screen = user("screen");
    let handle = ObjectRef::new(&screen);
    let slot = Arc::new(Mutex::new(Some(screen)));
    let seen_alive = Arc::new(Mutex::new(None));

    let owner = handle.clone();
    let taken = Arc::clone(&slot);
    let seen = Arc::clone(&seen_alive);
    bus.subscribe_with(
        "close",
        SubscribeOptions::new().subscriber_ref(handle.clone()),
        move |_| {
            // Drop the last outside strong handle mid-callback.
            drop(taken.lock().take());
            *seen.lock() = Some(owner.is_alive());
        },
    )
    .unwrap();

    let report = bus.publish_named("close").unwrap();
    assert_eq!(report.invoked, 1);
    assert_eq!(*seen_alive.lock(), Some(true));
    assert!(!handle.is_alive());
}
