//! Engine integration tests
//!
//! Registration scenarios, serialized concurrent access, persistence
//! failures and hydration behavior.

mod helpers;

use std::sync::Arc;

use assert_matches::assert_matches;
use campus_events::models::{EventId, EventStatus, UpdateEventRequest};
use campus_events::services::{EngineOptions, EngineStats, EventEngine, SeedSource};
use campus_events::storage::PersistenceAdapter;
use campus_events::state::seed;
use campus_events::utils::errors::{ActionResult, CampusEventsError, ErrorKind};
use helpers::*;

#[tokio::test]
async fn test_full_event_scenario() {
    let engine = empty_engine().await;
    let event = engine.create_event(event_request("Chess Finals", "2026-11-02", 1)).await.unwrap();

    engine.register_for_event(&event.id, student("a")).await.unwrap();
    assert_eq!(engine.get_event_by_id(&event.id).await.unwrap().remaining_seats, 0);

    let result = engine.register_for_event(&event.id, student("b")).await;
    assert_matches!(result, Err(CampusEventsError::EventFull { .. }));

    engine.unregister_from_event(&event.id, "a").await.unwrap();
    assert_eq!(engine.get_event_by_id(&event.id).await.unwrap().remaining_seats, 1);

    engine.register_for_event(&event.id, student("b")).await.unwrap();
    let participants = engine.get_participants(&event.id).await;
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0].student.id, "b");
}

#[tokio::test]
async fn test_cancelled_event_stays_listed_and_rejects_registration() {
    let engine = empty_engine().await;
    let event = engine.create_event(event_request("Robotics Demo", "2026-11-03", 30)).await.unwrap();

    let cancelled = engine.cancel_event(&event.id).await.unwrap();
    assert_eq!(cancelled.status, EventStatus::Cancelled);
    assert!(engine.list_events().await.iter().any(|e| e.id == event.id));

    let result = engine.register_for_event(&event.id, student("a")).await;
    assert_matches!(result, Err(CampusEventsError::EventNotActive { .. }));
    assert_eq!(engine.get_event_by_id(&event.id).await.unwrap().remaining_seats, 30);

    // Cancelling again is a no-op
    let again = engine.cancel_event(&event.id).await.unwrap();
    assert_eq!(again.status, EventStatus::Cancelled);
}

#[tokio::test]
async fn test_duplicate_registration_keeps_single_record() {
    let engine = empty_engine().await;
    let event = engine.create_event(event_request("Debate", "2026-11-04", 10)).await.unwrap();
    let alice = fake_student();

    engine.register_for_event(&event.id, alice.clone()).await.unwrap();
    let again = engine.register_for_event(&event.id, alice.clone()).await;
    assert_matches!(again, Err(CampusEventsError::AlreadyRegistered { .. }));

    assert_eq!(engine.get_my_registered_events(&alice.id).await.len(), 1);
    assert_eq!(engine.get_event_by_id(&event.id).await.unwrap().remaining_seats, 9);
}

#[tokio::test]
async fn test_create_event_reports_every_invalid_field() {
    let engine = empty_engine().await;
    let mut request = event_request("", "not-a-date", 0);
    request.venue = "  ".to_string();

    let result = engine.create_event(request).await;
    let action = ActionResult::from_result(&result);
    assert!(!action.success);
    assert_eq!(action.kind, Some(ErrorKind::Validation));
    for field in ["title", "venue", "date", "capacity"] {
        assert!(action.field_errors.contains_key(field), "missing {}", field);
    }
    assert!(engine.list_events().await.is_empty());
}

#[tokio::test]
async fn test_edit_capacity_reconciles_remaining_seats() {
    let engine = empty_engine().await;
    let event = engine.create_event(event_request("Hack Night", "2026-11-05", 5)).await.unwrap();
    engine.register_for_event(&event.id, student("a")).await.unwrap();
    engine.register_for_event(&event.id, student("b")).await.unwrap();

    let grown = engine
        .edit_event(
            &event.id,
            UpdateEventRequest {
                capacity: Some(10),
                venue: Some("Auditorium".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(grown.capacity, 10);
    assert_eq!(grown.remaining_seats, 8);
    assert_eq!(grown.venue, "Auditorium");

    let shrink = engine
        .edit_event(
            &event.id,
            UpdateEventRequest {
                capacity: Some(1),
                ..Default::default()
            },
        )
        .await;
    assert_matches!(shrink, Err(CampusEventsError::Validation(e)) if e.contains("capacity"));
    assert_eq!(engine.get_event_by_id(&event.id).await.unwrap().capacity, 10);

    let missing = engine.edit_event(&EventId::from("missing"), UpdateEventRequest::default()).await;
    assert_matches!(missing, Err(CampusEventsError::EventNotFound { .. }));
}

#[tokio::test]
async fn test_postpone_changes_only_the_date() {
    let engine = empty_engine().await;
    let event = engine.create_event(timed_event_request("Open Mic", "2026-11-06", "6:00 PM")).await.unwrap();
    engine.register_for_event(&event.id, student("a")).await.unwrap();

    let moved = engine.postpone_event(&event.id, "2026-11-20").await.unwrap();
    assert_eq!(moved.date, "2026-11-20");
    assert_eq!(moved.time.as_deref(), Some("6:00 PM"));
    assert_eq!(moved.remaining_seats, 49);
    assert_eq!(engine.get_participants(&event.id).await.len(), 1);

    let invalid = engine.postpone_event(&event.id, "someday").await;
    assert_matches!(invalid, Err(CampusEventsError::Validation(_)));
}

#[tokio::test]
async fn test_interest_and_favorites_do_not_touch_seats() {
    let engine = empty_engine().await;
    let event = engine.create_event(event_request("Film Club", "2026-11-07", 3)).await.unwrap();

    assert!(engine.mark_interested(&event.id, student("a")).await.unwrap());
    assert!(!engine.mark_interested(&event.id, student("a")).await.unwrap());
    assert!(engine.toggle_favorite(&event.id, "a").await.unwrap());
    assert!(engine.is_favorite(&event.id, "a").await);
    assert!(engine.is_interested(&event.id, "a").await);
    assert_eq!(engine.get_event_by_id(&event.id).await.unwrap().remaining_seats, 3);

    assert!(!engine.toggle_favorite(&event.id, "a").await.unwrap());
    assert!(!engine.is_favorite(&event.id, "a").await);
    assert!(engine.remove_interest(&event.id, "a").await.unwrap());
    assert!(!engine.remove_interest(&event.id, "a").await.unwrap());

    let missing = engine.mark_interested(&EventId::from("missing"), student("a")).await;
    assert_matches!(missing, Err(CampusEventsError::EventNotFound { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_for_last_seat() {
    let engine = Arc::new(empty_engine().await);
    let event = engine.create_event(event_request("Limited Seminar", "2026-11-08", 1)).await.unwrap();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let event_id = event.id.clone();
            tokio::spawn(async move { engine.register_for_event(&event_id, student(&format!("s{}", i))).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert_matches!(e, CampusEventsError::EventFull { .. }),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(engine.get_event_by_id(&event.id).await.unwrap().remaining_seats, 0);
    assert_eq!(engine.get_participants(&event.id).await.len(), 1);
}

#[tokio::test]
async fn test_write_failure_keeps_in_memory_change() {
    let store = FailingStore::new();
    let engine = engine_on(store.clone());
    engine.initialize().await.unwrap();
    let event = engine.create_event(event_request("Quiz", "2026-11-09", 2)).await.unwrap();

    store.fail_writes(true);
    let result = engine.register_for_event(&event.id, student("a")).await;
    assert_matches!(result, Err(CampusEventsError::Persistence(_)));
    assert_eq!(ActionResult::from_result(&result).message.as_deref(), Some("Failed to save changes"));

    // Applied in memory despite the failed write
    assert!(engine.is_registered(&event.id, "a").await);
    assert_eq!(engine.get_event_by_id(&event.id).await.unwrap().remaining_seats, 1);

    // Storage still holds the pre-registration state until the next good write
    let stored = PersistenceAdapter::new(store.clone(), "test:").load_all().await.unwrap();
    assert!(stored.registrations.is_empty());

    store.fail_writes(false);
    engine.toggle_favorite(&event.id, "a").await.unwrap();
    let stored = PersistenceAdapter::new(store, "test:").load_all().await.unwrap();
    assert_eq!(stored.registrations.len(), 1);
    assert_eq!(stored.events[0].remaining_seats, 1);
}

#[tokio::test]
async fn test_load_failure_degrades_to_empty_state() {
    let store = FailingStore::new();
    let writer = engine_on(store.clone());
    writer.initialize().await.unwrap();
    writer.create_event(event_request("Quiz", "2026-11-09", 2)).await.unwrap();

    store.fail_reads(true);
    let engine = engine_on(store.clone());
    assert!(engine.is_loading());
    engine.initialize().await.unwrap();
    assert!(!engine.is_loading());
    assert!(!engine.is_hydrated());
    assert!(engine.list_events().await.is_empty());

    store.fail_reads(false);
    engine.refresh().await.unwrap();
    assert!(engine.is_hydrated());
    assert_eq!(engine.list_events().await.len(), 1);
}

#[tokio::test]
async fn test_failed_startup_read_never_overwrites_stored_data() {
    let store = FailingStore::new();
    let writer = engine_on(store.clone());
    writer.initialize().await.unwrap();
    let mine = writer.create_event(event_request("Alumni Meet", "2026-12-20", 80)).await.unwrap();
    writer.register_for_event(&mine.id, student("a")).await.unwrap();

    store.fail_reads(true);
    let engine = seeded_engine_on(store.clone(), SeedSource::Defaults);
    let added = engine.initialize().await.unwrap();
    assert_eq!(added, seed::default_events().len());
    assert!(!engine.is_hydrated());

    // Mutations apply in memory but are not written over the unread store
    let first_seed = engine.list_events().await[0].id.clone();
    let result = engine.toggle_favorite(&first_seed, "a").await;
    assert_matches!(result, Err(CampusEventsError::Persistence(_)));
    assert!(engine.is_favorite(&first_seed, "a").await);

    store.fail_reads(false);
    let stored = PersistenceAdapter::new(store.clone(), "test:").load_all().await.unwrap();
    assert_eq!(stored.events.len(), 1);
    assert_eq!(stored.events[0].id, mine.id);
    assert_eq!(stored.registrations.len(), 1);
    assert!(stored.favorites.is_empty());

    engine.refresh().await.unwrap();
    assert!(engine.is_hydrated());
    assert!(engine.is_registered(&mine.id, "a").await);
    engine.toggle_favorite(&mine.id, "a").await.unwrap();
    let stored = PersistenceAdapter::new(store, "test:").load_all().await.unwrap();
    assert_eq!(stored.favorites.len(), 1);
    assert_eq!(stored.registrations.len(), 1);
}

#[tokio::test]
async fn test_refresh_replaces_state_without_merging() {
    let store = FailingStore::new();
    let first = engine_on(store.clone());
    first.initialize().await.unwrap();
    let second = engine_on(store.clone());
    second.initialize().await.unwrap();

    first.create_event(event_request("From first", "2026-11-10", 5)).await.unwrap();
    assert!(second.list_events().await.is_empty());

    second.refresh().await.unwrap();
    let events = second.list_events().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "From first");
}

#[tokio::test]
async fn test_seeding_preserves_user_events() {
    let adapter = PersistenceAdapter::in_memory();
    let options = || EngineOptions {
        seed: SeedSource::Defaults,
        ..Default::default()
    };

    let engine = EventEngine::new(adapter.clone(), options());
    engine.initialize().await.unwrap();
    let mine = engine.create_event(event_request("Alumni Meet", "2026-12-20", 80)).await.unwrap();

    let restarted = EventEngine::new(adapter, options());
    assert_eq!(restarted.initialize().await.unwrap(), 0);
    let events = restarted.list_events().await;
    assert_eq!(events.len(), seed::default_events().len() + 1);
    assert!(events.iter().any(|e| e.id == mine.id));
}

#[tokio::test]
async fn test_created_ids_are_unique_and_increasing() {
    let engine = empty_engine().await;
    let mut ids = Vec::new();
    for i in 0..20 {
        let event = engine
            .create_event(event_request(&format!("Event {}", i), "2026-11-11", 5))
            .await
            .unwrap();
        ids.push(event.id.as_str().parse::<i64>().unwrap());
    }
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn test_reset_clears_memory_and_storage() {
    let store = FailingStore::new();
    let engine = engine_on(store.clone());
    engine.initialize().await.unwrap();
    let event = engine.create_event(event_request("Quiz", "2026-11-09", 2)).await.unwrap();
    engine.register_for_event(&event.id, student("a")).await.unwrap();

    engine.reset("admin@campus.edu").await.unwrap();
    assert_eq!(engine.stats().await, EngineStats::default());
    assert_eq!(store.inner().len().await, 0);
}
