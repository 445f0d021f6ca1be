//! Itinera engine: trips, itineraries, budget ledger, catalog,
//! recommendations, expense splits and sharing over a `sea-orm` database.
//!
//! Every public operation on [`Engine`] runs inside a single database
//! transaction and checks ownership through the trip's `user_id`. Records the
//! caller cannot see are reported as [`EngineError::KeyNotFound`].

pub use activities::Activity;
pub use budget_categories::BudgetCategory;
pub use budget_transactions::BudgetTransaction;
pub use cities::{City, CityDetail};
pub use commands::{
    ActivityNew, CategoryNew, CategoryPatch, CityNew, DayNew, DayPatch, ItemNew, ItemPatch,
    SplitNew, TransactionNew, TripNew, TripPatch,
};
pub use error::EngineError;
pub use expense_splits::{ExpenseSplit, SplitType};
pub use itinerary_days::ItineraryDay;
pub use itinerary_items::ItineraryItem;
pub use ledger::{BudgetTotals, CategoryDrift, ReconcileReport, TransactionKind};
pub use money::Money;
pub use ops::{BudgetSummary, Engine, EngineBuilder, TripAccess, TripShare};
pub use recommend::Recommendation;
pub use split::{ParticipantBalance, ParticipantInput};
pub use split_shares::SplitShare;
pub use trip_shares::ShareRole;
pub use trips::{Trip, TripStatus};
pub use users::Model as User;
pub use util::parse_time;

pub mod activities;
pub mod budget_categories;
pub mod budget_transactions;
pub mod cities;
mod commands;
mod error;
pub mod expense_splits;
pub mod itinerary_days;
pub mod itinerary_items;
pub mod ledger;
mod money;
mod ops;
pub mod recommend;
pub mod split;
pub mod split_shares;
pub mod trip_shares;
pub mod trips;
pub mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
