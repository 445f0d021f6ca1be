mod common;

use engine::{
    CategoryNew, DayNew, DayPatch, EngineError, ItemNew, ItemPatch, Money, ShareRole,
    TransactionNew, TripNew, TripPatch, TripStatus, parse_time,
};

use common::{date, engine_with_db, trip_with_budget};

#[tokio::test]
async fn create_and_list_trips_by_start_date() {
    let (engine, _db) = engine_with_db().await;
    engine
        .create_trip("alice", TripNew::new("Rome", date(2026, 9, 1), date(2026, 9, 3)))
        .await
        .unwrap();
    engine
        .create_trip("alice", TripNew::new("Paris", date(2026, 3, 1), date(2026, 3, 3)))
        .await
        .unwrap();

    let names: Vec<String> = engine
        .list_trips("alice")
        .await
        .unwrap()
        .into_iter()
        .map(|trip| trip.destination)
        .collect();
    assert_eq!(names, vec!["Paris", "Rome"]);
    assert!(engine.list_trips("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn trip_validation() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .create_trip("alice", TripNew::new("Rome", date(2026, 9, 3), date(2026, 9, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDate(_)));

    let err = engine
        .create_trip(
            "alice",
            TripNew::new("Rome", date(2026, 9, 1), date(2026, 9, 3)).travelers(0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .create_trip("alice", TripNew::new("  ", date(2026, 9, 1), date(2026, 9, 3)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));

    let err = engine
        .create_trip("nobody", TripNew::new("Rome", date(2026, 9, 1), date(2026, 9, 3)))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn update_trip_applies_only_given_fields() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 1000_00).await;

    let updated = engine
        .update_trip(
            trip.id,
            TripPatch {
                status: Some(TripStatus::InProgress),
                budget: Some(Money::new(1500_00)),
                ..TripPatch::default()
            },
            "alice",
        )
        .await
        .unwrap();
    assert_eq!(updated.status, TripStatus::InProgress);
    assert_eq!(updated.budget, Money::new(1500_00));
    assert_eq!(updated.destination, trip.destination);
    assert_eq!(updated.travelers, trip.travelers);

    let err = engine
        .update_trip(
            trip.id,
            TripPatch {
                end_date: Some(date(2026, 5, 1)),
                ..TripPatch::default()
            },
            "alice",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDate(_)));

    let err = engine
        .update_trip(trip.id, TripPatch::default(), "alice")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::EmptyPatch);
    assert!(err.is_validation());
}

#[tokio::test]
async fn delete_trip_cascades() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 1000_00).await;
    let category = engine
        .create_category(CategoryNew::new(trip.id, "Food"), "alice")
        .await
        .unwrap();
    engine
        .add_transaction(
            TransactionNew::new(category.id, "Lunch", Money::new(100), date(2026, 6, 1)),
            "alice",
        )
        .await
        .unwrap();
    let day = engine
        .add_day(
            trip.id,
            DayNew {
                day_number: 1,
                ..DayNew::default()
            },
            "alice",
        )
        .await
        .unwrap();

    engine.delete_trip(trip.id, "alice").await.unwrap();

    assert!(matches!(
        engine.trip(trip.id, "alice").await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    assert!(matches!(
        engine.list_transactions(category.id, "alice").await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    assert!(matches!(
        engine.delete_day(day.id, "alice").await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
}

#[tokio::test]
async fn strangers_cannot_see_trips() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 1000_00).await;

    assert!(matches!(
        engine.trip(trip.id, "bob").await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    assert!(matches!(
        engine.delete_trip(trip.id, "bob").await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    assert!(engine.trip(trip.id, "alice").await.is_ok());
}

#[tokio::test]
async fn viewer_reads_editor_writes() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 1000_00).await;
    engine
        .share_trip(trip.id, "bob", ShareRole::Viewer, "alice")
        .await
        .unwrap();

    assert_eq!(engine.list_trips("bob").await.unwrap().len(), 1);
    assert!(engine.itinerary(trip.id, "bob").await.unwrap().is_empty());
    let patch = || TripPatch {
        notes: Some("bring umbrella".to_string()),
        ..TripPatch::default()
    };
    assert!(matches!(
        engine.update_trip(trip.id, patch(), "bob").await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));

    engine
        .share_trip(trip.id, "bob", ShareRole::Editor, "alice")
        .await
        .unwrap();
    let updated = engine.update_trip(trip.id, patch(), "bob").await.unwrap();
    assert_eq!(updated.notes.as_deref(), Some("bring umbrella"));
    assert!(matches!(
        engine.delete_trip(trip.id, "bob").await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));

    let shares = engine.list_trip_shares(trip.id, "alice").await.unwrap();
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0].role, ShareRole::Editor);

    engine.unshare_trip(trip.id, "bob", "alice").await.unwrap();
    assert!(engine.list_trips("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn sharing_rules() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 0).await;

    assert!(matches!(
        engine
            .share_trip(trip.id, "alice", ShareRole::Viewer, "alice")
            .await
            .unwrap_err(),
        EngineError::InvalidName(_)
    ));
    assert!(matches!(
        engine
            .share_trip(trip.id, "carol", ShareRole::Viewer, "alice")
            .await
            .unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    assert!(matches!(
        engine.list_trip_shares(trip.id, "bob").await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    assert!(matches!(
        engine.unshare_trip(trip.id, "bob", "alice").await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
}

#[tokio::test]
async fn itinerary_days_and_items() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 1000_00).await;

    let day2 = engine
        .add_day(
            trip.id,
            DayNew {
                day_number: 2,
                date: Some(date(2026, 6, 2)),
                title: Some("Sintra".to_string()),
                ..DayNew::default()
            },
            "alice",
        )
        .await
        .unwrap();
    let day1 = engine
        .add_day(
            trip.id,
            DayNew {
                day_number: 1,
                ..DayNew::default()
            },
            "alice",
        )
        .await
        .unwrap();

    let err = engine
        .add_day(
            trip.id,
            DayNew {
                day_number: 1,
                ..DayNew::default()
            },
            "alice",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let err = engine
        .add_day(
            trip.id,
            DayNew {
                day_number: 3,
                date: Some(date(2026, 7, 1)),
                ..DayNew::default()
            },
            "alice",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDate(_)));

    let castle = engine
        .add_item(
            day2.id,
            ItemNew {
                title: "Pena Palace".to_string(),
                start_time: Some(parse_time("10:00").unwrap()),
                cost: Money::new(20_00),
                ..ItemNew::default()
            },
            "alice",
        )
        .await
        .unwrap();
    let lunch = engine
        .add_item(
            day2.id,
            ItemNew {
                title: "Lunch".to_string(),
                ..ItemNew::default()
            },
            "alice",
        )
        .await
        .unwrap();
    assert_eq!(castle.position, 0);
    assert_eq!(lunch.position, 1);

    engine
        .update_item(
            lunch.id,
            ItemPatch {
                position: Some(0),
                ..ItemPatch::default()
            },
            "alice",
        )
        .await
        .unwrap();
    engine
        .update_item(
            castle.id,
            ItemPatch {
                position: Some(1),
                ..ItemPatch::default()
            },
            "alice",
        )
        .await
        .unwrap();

    let itinerary = engine.itinerary(trip.id, "alice").await.unwrap();
    assert_eq!(itinerary.len(), 2);
    assert_eq!(itinerary[0].id, day1.id);
    assert!(itinerary[0].items.is_empty());
    let titles: Vec<&str> = itinerary[1]
        .items
        .iter()
        .map(|item| item.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Lunch", "Pena Palace"]);

    let renamed = engine
        .update_day(
            day1.id,
            DayPatch {
                title: Some("Arrival".to_string()),
                ..DayPatch::default()
            },
            "alice",
        )
        .await
        .unwrap();
    assert_eq!(renamed.title.as_deref(), Some("Arrival"));

    engine.delete_day(day2.id, "alice").await.unwrap();
    assert!(matches!(
        engine.delete_item(castle.id, "alice").await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    assert_eq!(engine.itinerary(trip.id, "alice").await.unwrap().len(), 1);
}
