mod common;

use engine::{
    CategoryNew, CategoryPatch, EngineError, Money, TransactionKind, TransactionNew, TripNew,
};

use std::sync::Arc;

use common::{date, engine_with_db, engine_with_file_db, trip_with_budget};

#[tokio::test]
async fn expense_income_delete_scenario() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 5000_00).await;
    let food = engine
        .create_category(
            CategoryNew::new(trip.id, "Food").allocated(Money::new(1000_00)),
            "alice",
        )
        .await
        .unwrap();
    assert_eq!(food.spent, Money::ZERO);

    let dinner = engine
        .add_transaction(
            TransactionNew::new(food.id, "Dinner", Money::new(200_00), date(2026, 6, 1)),
            "alice",
        )
        .await
        .unwrap();
    let summary = engine.trip_budget_summary(trip.id, "alice").await.unwrap();
    assert_eq!(summary.categories[0].spent, Money::new(200_00));
    assert_eq!(summary.categories[0].remaining(), Money::new(800_00));

    engine
        .add_transaction(
            TransactionNew::new(food.id, "Refund", Money::new(50_00), date(2026, 6, 2))
                .kind(TransactionKind::Income),
            "alice",
        )
        .await
        .unwrap();
    let summary = engine.trip_budget_summary(trip.id, "alice").await.unwrap();
    assert_eq!(summary.categories[0].spent, Money::new(150_00));

    engine.delete_transaction(dinner.id, "alice").await.unwrap();
    let summary = engine.trip_budget_summary(trip.id, "alice").await.unwrap();
    assert_eq!(summary.categories[0].spent, Money::new(-50_00));
    assert_eq!(summary.total_spent, Money::new(-50_00));
}

#[tokio::test]
async fn summary_totals_over_two_categories() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 5000_00).await;

    for name in ["Lodging", "Transport"] {
        let category = engine
            .create_category(
                CategoryNew::new(trip.id, name).allocated(Money::new(1000_00)),
                "alice",
            )
            .await
            .unwrap();
        engine
            .add_transaction(
                TransactionNew::new(category.id, "Ticket", Money::new(300_00), date(2026, 6, 1)),
                "alice",
            )
            .await
            .unwrap();
    }

    let summary = engine.trip_budget_summary(trip.id, "alice").await.unwrap();
    assert_eq!(summary.trip_budget, Money::new(5000_00));
    assert_eq!(summary.total_allocated, Money::new(2000_00));
    assert_eq!(summary.total_spent, Money::new(600_00));
    assert_eq!(summary.remaining, Money::new(4400_00));
    let sum: Money = summary
        .categories
        .iter()
        .fold(Money::ZERO, |acc, category| acc + category.spent);
    assert_eq!(summary.total_spent, sum);
}

#[tokio::test]
async fn spent_matches_replay_after_mixed_history() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 0).await;
    let category = engine
        .create_category(CategoryNew::new(trip.id, "Misc"), "alice")
        .await
        .unwrap();

    let history = [
        (TransactionKind::Expense, 1999),
        (TransactionKind::Income, 500),
        (TransactionKind::Expense, 1),
        (TransactionKind::Expense, 7250),
        (TransactionKind::Income, 20),
    ];
    let mut ids = Vec::new();
    for (kind, amount) in history {
        let tx = engine
            .add_transaction(
                TransactionNew::new(category.id, "x", Money::new(amount), date(2026, 6, 3))
                    .kind(kind),
                "alice",
            )
            .await
            .unwrap();
        ids.push(tx.id);
    }
    engine.delete_transaction(ids[1], "alice").await.unwrap();
    engine.delete_transaction(ids[3], "alice").await.unwrap();

    let remaining = engine.list_transactions(category.id, "alice").await.unwrap();
    let replayed: i64 = remaining
        .iter()
        .map(|tx| match tx.kind {
            TransactionKind::Expense => tx.amount.minor(),
            TransactionKind::Income => -tx.amount.minor(),
        })
        .sum();
    let categories = engine.list_categories(trip.id, "alice").await.unwrap();
    assert_eq!(categories[0].spent, Money::new(replayed));
    assert_eq!(replayed, 1999 + 1 - 20);

    let report = engine.reconcile_budget(trip.id, false, "alice").await.unwrap();
    assert!(report.is_consistent());
    assert_eq!(report.checked, 1);
}

#[tokio::test]
async fn add_then_delete_restores_state() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 1000_00).await;
    let category = engine
        .create_category(CategoryNew::new(trip.id, "Food"), "alice")
        .await
        .unwrap();
    engine
        .add_transaction(
            TransactionNew::new(category.id, "Lunch", Money::new(12_34), date(2026, 6, 2)),
            "alice",
        )
        .await
        .unwrap();
    let before_spent = engine.list_categories(trip.id, "alice").await.unwrap()[0].spent;
    let before_list = engine.list_transactions(category.id, "alice").await.unwrap();

    let tx = engine
        .add_transaction(
            TransactionNew::new(category.id, "Snack", Money::new(3_99), date(2026, 6, 3)),
            "alice",
        )
        .await
        .unwrap();
    engine.delete_transaction(tx.id, "alice").await.unwrap();

    assert_eq!(
        engine.list_categories(trip.id, "alice").await.unwrap()[0].spent,
        before_spent
    );
    assert_eq!(
        engine.list_transactions(category.id, "alice").await.unwrap(),
        before_list
    );
}

#[tokio::test]
async fn zero_amount_is_recorded_without_changing_spent() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 1000_00).await;
    let category = engine
        .create_category(CategoryNew::new(trip.id, "Food"), "alice")
        .await
        .unwrap();
    engine
        .add_transaction(
            TransactionNew::new(category.id, "Free tour", Money::ZERO, date(2026, 6, 2)),
            "alice",
        )
        .await
        .unwrap();

    assert_eq!(
        engine.list_categories(trip.id, "alice").await.unwrap()[0].spent,
        Money::ZERO
    );
    assert_eq!(
        engine
            .list_transactions(category.id, "alice")
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn invalid_input_leaves_ledger_untouched() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 1000_00).await;
    let category = engine
        .create_category(CategoryNew::new(trip.id, "Food"), "alice")
        .await
        .unwrap();

    let err = engine
        .add_transaction(
            TransactionNew::new(category.id, "Oops", Money::new(-1), date(2026, 6, 2)),
            "alice",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .add_transaction(
            TransactionNew::new(category.id, "   ", Money::new(1), date(2026, 6, 2)),
            "alice",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));

    assert!(
        engine
            .list_transactions(category.id, "alice")
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        engine.list_categories(trip.id, "alice").await.unwrap()[0].spent,
        Money::ZERO
    );
}

#[tokio::test]
async fn transactions_are_listed_newest_first() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 1000_00).await;
    let category = engine
        .create_category(CategoryNew::new(trip.id, "Food"), "alice")
        .await
        .unwrap();
    for (description, day) in [("first", 1), ("third", 3), ("second", 2)] {
        engine
            .add_transaction(
                TransactionNew::new(category.id, description, Money::new(100), date(2026, 6, day)),
                "alice",
            )
            .await
            .unwrap();
    }

    let listed: Vec<String> = engine
        .list_transactions(category.id, "alice")
        .await
        .unwrap()
        .into_iter()
        .map(|tx| tx.description)
        .collect();
    assert_eq!(listed, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn ledger_is_owner_only() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 1000_00).await;
    let category = engine
        .create_category(CategoryNew::new(trip.id, "Food"), "alice")
        .await
        .unwrap();
    let tx = engine
        .add_transaction(
            TransactionNew::new(category.id, "Lunch", Money::new(900), date(2026, 6, 2)),
            "alice",
        )
        .await
        .unwrap();
    engine
        .share_trip(trip.id, "bob", engine::ShareRole::Editor, "alice")
        .await
        .unwrap();

    let not_found = |err: EngineError| matches!(err, EngineError::KeyNotFound(_));
    assert!(not_found(
        engine
            .add_transaction(
                TransactionNew::new(category.id, "Sneaky", Money::new(1), date(2026, 6, 2)),
                "bob",
            )
            .await
            .unwrap_err()
    ));
    assert!(not_found(engine.delete_transaction(tx.id, "bob").await.unwrap_err()));
    assert!(not_found(
        engine.trip_budget_summary(trip.id, "bob").await.unwrap_err()
    ));
    assert!(not_found(
        engine
            .create_category(CategoryNew::new(trip.id, "Mine"), "bob")
            .await
            .unwrap_err()
    ));
    assert!(not_found(
        engine.list_transactions(category.id, "bob").await.unwrap_err()
    ));

    assert_eq!(
        engine.list_categories(trip.id, "alice").await.unwrap()[0].spent,
        Money::new(900)
    );
}

#[tokio::test]
async fn reconcile_detects_and_repairs_manual_override() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 1000_00).await;
    let category = engine
        .create_category(CategoryNew::new(trip.id, "Food"), "alice")
        .await
        .unwrap();
    engine
        .add_transaction(
            TransactionNew::new(category.id, "Lunch", Money::new(25_00), date(2026, 6, 2)),
            "alice",
        )
        .await
        .unwrap();
    engine
        .update_category(
            category.id,
            CategoryPatch {
                spent: Some(Money::new(99_00)),
                ..CategoryPatch::default()
            },
            "alice",
        )
        .await
        .unwrap();

    let report = engine.reconcile_budget(trip.id, false, "alice").await.unwrap();
    assert_eq!(report.drifted.len(), 1);
    assert_eq!(report.drifted[0].cached, Money::new(99_00));
    assert_eq!(report.drifted[0].recomputed, Money::new(25_00));
    assert!(!report.repaired);

    let report = engine.reconcile_budget(trip.id, true, "alice").await.unwrap();
    assert!(report.repaired);
    assert_eq!(
        engine.list_categories(trip.id, "alice").await.unwrap()[0].spent,
        Money::new(25_00)
    );
    assert!(
        engine
            .reconcile_budget(trip.id, false, "alice")
            .await
            .unwrap()
            .is_consistent()
    );
}

#[tokio::test]
async fn delete_category_removes_transactions() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 1000_00).await;
    let category = engine
        .create_category(CategoryNew::new(trip.id, "Food"), "alice")
        .await
        .unwrap();
    let tx = engine
        .add_transaction(
            TransactionNew::new(category.id, "Lunch", Money::new(500), date(2026, 6, 2)),
            "alice",
        )
        .await
        .unwrap();

    engine.delete_category(category.id, "alice").await.unwrap();

    assert!(matches!(
        engine.delete_transaction(tx.id, "alice").await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    let summary = engine.trip_budget_summary(trip.id, "alice").await.unwrap();
    assert!(summary.categories.is_empty());
    assert_eq!(summary.remaining, Money::new(1000_00));
}

#[tokio::test]
async fn trip_without_categories_has_zero_totals() {
    let (engine, _db) = engine_with_db().await;
    let trip = engine
        .create_trip(
            "alice",
            TripNew::new("Oslo", date(2026, 1, 1), date(2026, 1, 2)).budget(Money::new(300_00)),
        )
        .await
        .unwrap();
    let summary = engine.trip_budget_summary(trip.id, "alice").await.unwrap();
    assert_eq!(summary.total_allocated, Money::ZERO);
    assert_eq!(summary.total_spent, Money::ZERO);
    assert_eq!(summary.remaining, Money::new(300_00));
}

#[tokio::test]
async fn revert_that_would_overflow_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 0).await;
    let category = engine
        .create_category(CategoryNew::new(trip.id, "Food"), "alice")
        .await
        .unwrap();
    let lunch = engine
        .add_transaction(
            TransactionNew::new(category.id, "Lunch", Money::new(5_00), date(2026, 6, 2)),
            "alice",
        )
        .await
        .unwrap();
    engine
        .update_category(
            category.id,
            CategoryPatch {
                spent: Some(Money::new(i64::MIN + 100)),
                ..CategoryPatch::default()
            },
            "alice",
        )
        .await
        .unwrap();

    let err = engine.delete_transaction(lunch.id, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    // The row is untouched and still readable.
    let categories = engine.list_categories(trip.id, "alice").await.unwrap();
    assert_eq!(categories[0].spent, Money::new(i64::MIN + 100));
    let listed = engine.list_transactions(category.id, "alice").await.unwrap();
    assert_eq!(listed.len(), 1);
    engine.trip_budget_summary(trip.id, "alice").await.unwrap();
}

#[tokio::test]
async fn add_that_would_overflow_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_budget(&engine, "alice", 0).await;
    let category = engine
        .create_category(CategoryNew::new(trip.id, "Food"), "alice")
        .await
        .unwrap();
    engine
        .add_transaction(
            TransactionNew::new(category.id, "Refund", Money::new(i64::MAX), date(2026, 6, 2))
                .kind(TransactionKind::Income),
            "alice",
        )
        .await
        .unwrap();

    let err = engine
        .add_transaction(
            TransactionNew::new(category.id, "Refund", Money::new(2), date(2026, 6, 2))
                .kind(TransactionKind::Income),
            "alice",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let categories = engine.list_categories(trip.id, "alice").await.unwrap();
    assert_eq!(categories[0].spent, Money::new(-i64::MAX));
    let listed = engine.list_transactions(category.id, "alice").await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_keep_spent_consistent() {
    const WRITERS: i64 = 40;

    let (engine, _file) = engine_with_file_db().await;
    let engine = Arc::new(engine);
    let trip = trip_with_budget(&engine, "alice", 0).await;
    let category = engine
        .create_category(CategoryNew::new(trip.id, "Snacks"), "alice")
        .await
        .unwrap();

    let category_id = category.id;
    let mut tasks = tokio::task::JoinSet::new();
    for n in 0..WRITERS {
        let engine = Arc::clone(&engine);
        tasks.spawn(async move {
            engine
                .add_transaction(
                    TransactionNew::new(
                        category_id,
                        format!("Snack {n}"),
                        Money::new(1),
                        date(2026, 6, 3),
                    ),
                    "alice",
                )
                .await
        });
    }
    let mut added = 0;
    while let Some(result) = tasks.join_next().await {
        result.unwrap().unwrap();
        added += 1;
    }
    assert_eq!(added, WRITERS);

    let categories = engine.list_categories(trip.id, "alice").await.unwrap();
    assert_eq!(categories[0].spent, Money::new(WRITERS));
    let listed = engine.list_transactions(category.id, "alice").await.unwrap();
    assert_eq!(listed.len() as i64, WRITERS);
    let report = engine.reconcile_budget(trip.id, false, "alice").await.unwrap();
    assert!(report.is_consistent());
}
