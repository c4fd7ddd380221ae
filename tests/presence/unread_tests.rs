//! Pull-based reconciliation of missed content.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;

use social_presence::config::PresenceSettings;
use social_presence::domain::Source;

use crate::common::{hub_over, InMemoryStore};

#[tokio::test]
async fn test_fetch_resets_then_new_item_counts_one() {
    let store = InMemoryStore::new();
    let viewer = store.add_user(1, "viewer");
    let author = store.add_user(2, "author");
    store.follow(viewer.id, author.id);
    let hub = hub_over(&store, &PresenceSettings::default());
    let source = Source::Author(author.id);

    store.add_post(author.id);
    store.add_post(author.id);
    store.add_post(author.id);
    assert_eq!(hub.query_missed(viewer.id, &[source]).await[&source], 3);

    assert_eq!(hub.on_fetch(viewer.id, source).await.unwrap().count, 3);
    assert_eq!(store.marker(viewer.id, source), Some(3));
    assert_eq!(hub.query_missed(viewer.id, &[source]).await[&source], 0);

    store.add_post(author.id);
    assert_eq!(hub.query_missed(viewer.id, &[source]).await[&source], 1);
}

#[tokio::test]
async fn test_deleted_content_clamps_to_zero() {
    let store = InMemoryStore::new();
    let viewer = store.add_user(1, "viewer");
    let author = store.add_user(2, "author");
    let hub = hub_over(&store, &PresenceSettings::default());
    let source = Source::Author(author.id);

    store.add_post(author.id);
    store.add_post(author.id);
    hub.on_fetch(viewer.id, source).await.unwrap();
    store.delete_post(author.id);

    assert_eq!(hub.query_missed(viewer.id, &[source]).await[&source], 0);
}

#[tokio::test]
async fn test_negative_counts_pass_through_when_clamp_disabled() {
    let store = InMemoryStore::new();
    let viewer = store.add_user(1, "viewer");
    let author = store.add_user(2, "author");
    let settings = PresenceSettings {
        clamp_negative_unread: false,
        ..PresenceSettings::default()
    };
    let hub = hub_over(&store, &settings);
    let source = Source::Author(author.id);

    store.add_post(author.id);
    hub.on_fetch(viewer.id, source).await.unwrap();
    store.delete_post(author.id);

    assert_eq!(hub.query_missed(viewer.id, &[source]).await[&source], -1);
}

#[tokio::test]
async fn test_missed_for_followed_keys_by_author_login() {
    let store = InMemoryStore::new();
    let viewer = store.add_user(1, "viewer");
    let alice = store.add_user(2, "alice");
    let bob = store.add_user(3, "bob");
    store.follow(viewer.id, alice.id);
    store.follow(viewer.id, bob.id);
    let hub = hub_over(&store, &PresenceSettings::default());

    store.add_post(alice.id);
    store.add_post(alice.id);

    let missed = hub.missed_for_followed(viewer.id).await.unwrap();
    assert_eq!(
        missed,
        BTreeMap::from([("alice".to_string(), 2), ("bob".to_string(), 0)])
    );
}

#[tokio::test]
async fn test_created_room_starts_with_zero_unread() {
    let store = InMemoryStore::new();
    let u1 = store.add_user(1, "u1");
    store.add_user(2, "u2");
    let hub = hub_over(&store, &PresenceSettings::default());

    let room = hub
        .create_room("pair", &["u1".to_string(), "u2".to_string(), "ghost".to_string()])
        .await
        .unwrap();

    assert_eq!(room.members.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(store.marker(u1.id, Source::Room(room.id)), Some(0));
    assert_eq!(hub.missed_for_rooms(u1.id).await.unwrap(), BTreeMap::from([(room.id, 0)]));
}
