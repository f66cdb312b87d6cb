//! Matching: names, publisher filters, isolation, duplicates.

use pubsub_rust::{Event, EventBus, ObjectRef, PubSubError, SubscribeOptions};

use crate::support::{user, Hits, Log};

#[test]
fn login_filtered_to_one_user() {
    let bus = EventBus::new();
    let user_a = user("userA");
    let user_b = user("userB");
    let hits = Hits::new();

    bus.subscribe_with(
        "login",
        SubscribeOptions::new().publisher(&user_a),
        hits.handler(),
    )
    .unwrap();

    bus.publish(Event::new("login").from_publisher(&user_a)).unwrap();
    bus.publish(Event::new("login").from_publisher(&user_a)).unwrap();
    assert_eq!(hits.count(), 2);

    bus.publish(Event::new("login").from_publisher(&user_b)).unwrap();
    assert_eq!(hits.count(), 2);
}

#[test]
fn filtered_subscription_ignores_anonymous_events() {
    let bus = EventBus::new();
    let user_a = user("userA");
    let hits = Hits::new();

    bus.subscribe_with(
        "login",
        SubscribeOptions::new().publisher(&user_a),
        hits.handler(),
    )
    .unwrap();

    bus.publish_named("login").unwrap();
    assert_eq!(hits.count(), 0);
}

#[test]
fn filter_is_identity_not_equality() {
    let bus = EventBus::new();
    let first = user("same-name");
    let twin = user("same-name");
    let hits = Hits::new();

    bus.subscribe_with(
        "login",
        SubscribeOptions::new().publisher(&first),
        hits.handler(),
    )
    .unwrap();

    bus.publish(Event::new("login").from_publisher(&twin)).unwrap();
    assert_eq!(hits.count(), 0);
    bus.publish(Event::new("login").with_publisher(ObjectRef::new(&first)))
        .unwrap();
    assert_eq!(hits.count(), 1);
}

#[test]
fn unfiltered_subscription_hears_every_publisher() {
    let bus = EventBus::new();
    let hits = Hits::new();
    bus.subscribe("login", hits.handler()).unwrap();

    bus.publish(Event::new("login").from_publisher(&user("a"))).unwrap();
    bus.publish(Event::new("login").from_publisher(&user("b"))).unwrap();
    bus.publish_named("login").unwrap();
    assert_eq!(hits.count(), 3);
}

#[test]
fn events_are_isolated_by_name() {
    let bus = EventBus::new();
    let a = Hits::new();
    let b = Hits::new();
    bus.subscribe("A", a.handler()).unwrap();
    bus.subscribe("B", b.handler()).unwrap();

    bus.publish_named("A").unwrap();
    bus.publish_named("A").unwrap();
    assert_eq!(a.count(), 2);
    assert_eq!(b.count(), 0);

    // Names are exact, not prefixes.
    bus.publish_named("AB").unwrap();
    bus.publish_named("a").unwrap();
    assert_eq!(a.count(), 2);
}

#[test]
fn duplicate_registrations_both_fire() {
    let bus = EventBus::new();
    let hits = Hits::new();

    let first = bus.subscribe("tick", hits.handler()).unwrap();
    let second = bus.subscribe("tick", hits.handler()).unwrap();
    assert_ne!(first, second);

    bus.publish_named("tick").unwrap();
    assert_eq!(hits.count(), 2);

    bus.unsubscribe(first);
    bus.publish_named("tick").unwrap();
    assert_eq!(hits.count(), 3);
}

#[test]
fn dispatch_follows_subscription_order() {
    let bus = EventBus::new();
    let log = Log::new();
    for label in ["first", "second", "third"] {
        bus.subscribe("ordered", log.handler(label)).unwrap();
    }

    bus.publish_named("ordered").unwrap();
    assert_eq!(log.entries(), vec!["first", "second", "third"]);
}

#[test]
fn payload_reaches_handler() {
    #[derive(Debug, PartialEq)]
    struct Login {
        attempts: u32,
    }

    let bus = EventBus::new();
    let log = Log::new();
    let sink = log.clone();
    bus.subscribe("login", move |event| {
        let login = event.data::<Login>().expect("login payload");
        sink.push(format!("{}:{}", event.name(), login.attempts));
    })
    .unwrap();

    bus.publish(Event::new("login").with_payload(Login { attempts: 3 }))
        .unwrap();
    assert_eq!(log.entries(), vec!["login:3"]);
}

#[test]
fn handler_sees_publisher() {
    let bus = EventBus::new();
    let alice = user("alice");
    let log = Log::new();
    let sink = log.clone();

    bus.subscribe("login", move |event| {
        let name = event
            .publisher()
            .and_then(|p| p.upgrade::<crate::support::User>())
            .map(|u| u.name)
            .unwrap_or("anonymous");
        sink.push(name);
    })
    .unwrap();

    bus.publish(Event::new("login").from_publisher(&alice)).unwrap();
    bus.publish_named("login").unwrap();
    assert_eq!(log.entries(), vec!["alice", "anonymous"]);
}

#[test]
fn empty_names_are_rejected() {
    let bus = EventBus::new();
    let hits = Hits::new();

    assert!(matches!(
        bus.subscribe("", hits.handler()),
        Err(PubSubError::EmptyEventName)
    ));
    assert!(matches!(
        bus.publish(Event::new("")),
        Err(PubSubError::EmptyEventName)
    ));
    assert!(bus.registry().is_empty());
}
