#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, Money, Trip, TripNew};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    engine_at("sqlite::memory:").await
}

/// Engine over an on-disk database, so several pooled connections can write
/// concurrently. The file is removed when the returned guard drops.
pub async fn engine_with_file_db() -> (Engine, TempDb) {
    let path = std::env::temp_dir().join(format!("itinera-{}.db", uuid::Uuid::new_v4()));
    let (engine, _db) = engine_at(&format!("sqlite://{}?mode=rwc", path.display())).await;
    (engine, TempDb(path))
}

pub struct TempDb(PathBuf);

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let mut file = self.0.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

async fn engine_at(url: &str) -> (Engine, DatabaseConnection) {
    let db = Database::connect(url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    engine.create_user("alice", "alice-token").await.unwrap();
    engine.create_user("bob", "bob-token").await.unwrap();
    (engine, db)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn trip_with_budget(engine: &Engine, owner: &str, budget: i64) -> Trip {
    engine
        .create_trip(
            owner,
            TripNew::new("Lisbon", date(2026, 6, 1), date(2026, 6, 5))
                .travelers(2)
                .budget(Money::new(budget)),
        )
        .await
        .unwrap()
}
