//! Real-time delivery through the presence hub.

use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::mpsc::error::TryRecvError;

use social_presence::application::services::DeliveryReport;
use social_presence::config::PresenceSettings;
use social_presence::domain::{Connection, ContentBody, Source};

use crate::common::{connect, hub_over, next_push, InMemoryStore};

#[tokio::test]
async fn test_followed_author_post_reaches_online_follower_only() {
    let store = InMemoryStore::new();
    let a = store.add_user(1, "A");
    let b = store.add_user(2, "B");
    let c = store.add_user(3, "C");
    store.follow(a.id, b.id);
    store.follow(c.id, b.id);
    let hub = hub_over(&store, &PresenceSettings::default());

    let (_a, mut a_rx) = connect(&hub, &a).await;

    store.add_post(b.id);
    let report = hub
        .on_post_created(&b, None, ContentBody::text("hi"))
        .await
        .unwrap();

    assert_eq!(
        report,
        DeliveryReport {
            delivered: 1,
            absent: 1,
            failed: 0
        }
    );
    assert_eq!(
        next_push(&mut a_rx),
        Some(json!({ "type": "post", "userId": 2, "login": "B", "text": "hi" }))
    );
    assert_eq!(next_push(&mut a_rx), None);

    // C was offline and learns about the post by pulling
    let missed = hub.query_missed(c.id, &[Source::Author(b.id)]).await;
    assert_eq!(missed.get(&Source::Author(b.id)), Some(&1));
}

#[tokio::test]
async fn test_room_message_reaches_every_other_online_member() {
    let store = InMemoryStore::new();
    let u1 = store.add_user(1, "u1");
    let u2 = store.add_user(2, "u2");
    let u3 = store.add_user(3, "u3");
    store.add_room(10, "general", &[1, 2, 3]);
    let hub = hub_over(&store, &PresenceSettings::default());

    let (_c1, mut rx1) = connect(&hub, &u1).await;
    let (_c2, mut rx2) = connect(&hub, &u2).await;
    let (_c3, mut rx3) = connect(&hub, &u3).await;

    store.add_message(10);
    let report = hub
        .on_message_created(10, &u3, ContentBody::text("yo"))
        .await
        .unwrap();

    assert_eq!(
        report,
        DeliveryReport {
            delivered: 2,
            absent: 0,
            failed: 0
        }
    );
    let expected = json!({ "type": "msg", "roomId": 10, "userId": 3, "login": "u3", "text": "yo" });
    assert_eq!(next_push(&mut rx1), Some(expected.clone()));
    assert_eq!(next_push(&mut rx2), Some(expected));
    assert_eq!(next_push(&mut rx3), None);
}

#[tokio::test]
async fn test_offline_room_member_catches_up_by_pulling() {
    let store = InMemoryStore::new();
    let u1 = store.add_user(1, "u1");
    let u2 = store.add_user(2, "u2");
    store.add_room(10, "general", &[1, 2]);
    let hub = hub_over(&store, &PresenceSettings::default());

    let (_c1, _rx1) = connect(&hub, &u1).await;

    store.add_message(10);
    let report = hub
        .on_message_created(10, &u1, ContentBody::text("yo"))
        .await
        .unwrap();

    assert_eq!(report.absent, 1);
    let missed = hub.missed_for_rooms(u2.id).await.unwrap();
    assert_eq!(missed.get(&10), Some(&1));
}

#[tokio::test]
async fn test_comment_push_carries_post_id() {
    let store = InMemoryStore::new();
    let a = store.add_user(1, "A");
    let b = store.add_user(2, "B");
    store.follow(a.id, b.id);
    let hub = hub_over(&store, &PresenceSettings::default());

    let (_a, mut a_rx) = connect(&hub, &a).await;
    hub.on_comment_created(&b, "p-1".into(), ContentBody::text("nice"))
        .await
        .unwrap();

    assert_eq!(
        next_push(&mut a_rx),
        Some(json!({ "type": "comment", "postId": "p-1", "userId": 2, "login": "B", "text": "nice" }))
    );
}

#[tokio::test]
async fn test_reconnect_moves_delivery_to_new_connection() {
    let store = InMemoryStore::new();
    let a = store.add_user(1, "A");
    let b = store.add_user(2, "B");
    store.follow(a.id, b.id);
    let hub = hub_over(&store, &PresenceSettings::default());

    let (old, mut old_rx) = connect(&hub, &a).await;
    let (_new, mut new_rx) = connect(&hub, &a).await;

    hub.on_post_created(&b, None, ContentBody::text("one"))
        .await
        .unwrap();

    assert_eq!(next_push(&mut new_rx).unwrap()["text"], "one");

    // The replaced connection got nothing but was not closed either
    assert_eq!(old_rx.try_recv(), Err(TryRecvError::Empty));
    assert!(!old.is_closed());

    // Its late disconnect leaves the new session in place
    assert!(!hub.on_disconnect(a.id, old.id()));
    assert!(hub.presence().is_online(a.id));
}

#[tokio::test]
async fn test_room_snapshot_until_membership_change_is_reported() {
    let store = InMemoryStore::new();
    let u1 = store.add_user(1, "u1");
    let u2 = store.add_user(2, "u2");
    let u4 = store.add_user(4, "u4");
    store.add_room(10, "general", &[1, 2]);
    let hub = hub_over(&store, &PresenceSettings::default());

    let (_c1, _rx1) = connect(&hub, &u1).await;
    let (_c2, mut rx2) = connect(&hub, &u2).await;
    let (_c4, mut rx4) = connect(&hub, &u4).await;

    // u4 joins in the store after the room was cached
    store.set_room_members(10, &[1, 2, 4]);
    hub.on_message_created(10, &u1, ContentBody::text("before"))
        .await
        .unwrap();
    assert_eq!(next_push(&mut rx4), None);
    assert_eq!(next_push(&mut rx2).unwrap()["text"], "before");

    hub.on_room_membership_changed(10);
    hub.on_message_created(10, &u1, ContentBody::text("after"))
        .await
        .unwrap();
    assert_eq!(next_push(&mut rx4).unwrap()["text"], "after");
}

#[tokio::test]
async fn test_disconnected_socket_is_evicted_on_next_push() {
    let store = InMemoryStore::new();
    let a = store.add_user(1, "A");
    let b = store.add_user(2, "B");
    store.follow(a.id, b.id);
    let hub = hub_over(&store, &PresenceSettings::default());

    let (connection, rx) = Connection::channel(4);
    hub.on_connect(&a, &connection).await;
    drop(rx);

    let report = hub
        .on_post_created(&b, None, ContentBody::text("lost"))
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    assert!(!hub.presence().is_online(a.id));
}
