//! Command and patch structs for engine operations.
//!
//! Creation commands group the parameters of write operations, keeping call
//! sites readable. Patch structs carry one `Option` per updatable column: only
//! the fields that are `Some` are written, every other column is left alone.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{Money, ParticipantInput, SplitType, TransactionKind, TripStatus};

/// Create a trip.
#[derive(Clone, Debug)]
pub struct TripNew {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub travelers: u32,
    pub budget: Money,
    pub status: TripStatus,
    pub notes: Option<String>,
}

impl TripNew {
    #[must_use]
    pub fn new(destination: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            destination: destination.into(),
            start_date,
            end_date,
            travelers: 1,
            budget: Money::ZERO,
            status: TripStatus::default(),
            notes: None,
        }
    }

    #[must_use]
    pub fn travelers(mut self, travelers: u32) -> Self {
        self.travelers = travelers;
        self
    }

    #[must_use]
    pub fn budget(mut self, budget: Money) -> Self {
        self.budget = budget;
        self
    }

    #[must_use]
    pub fn status(mut self, status: TripStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial trip update. A blank `notes` clears the notes.
#[derive(Clone, Debug, Default)]
pub struct TripPatch {
    pub destination: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub travelers: Option<u32>,
    pub budget: Option<Money>,
    pub status: Option<TripStatus>,
    pub notes: Option<String>,
}

impl TripPatch {
    pub fn is_empty(&self) -> bool {
        self.destination.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.travelers.is_none()
            && self.budget.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}

/// Create a budget category under a trip.
#[derive(Clone, Debug)]
pub struct CategoryNew {
    pub trip_id: Uuid,
    pub name: String,
    pub allocated: Money,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl CategoryNew {
    #[must_use]
    pub fn new(trip_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            trip_id,
            name: name.into(),
            allocated: Money::ZERO,
            color: None,
            icon: None,
        }
    }

    #[must_use]
    pub fn allocated(mut self, allocated: Money) -> Self {
        self.allocated = allocated;
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Partial category update.
///
/// `spent` overwrites the cached total directly; `reconcile_budget` reports
/// such manual adjustments as drift.
#[derive(Clone, Debug, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub allocated: Option<Money>,
    pub spent: Option<Money>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.allocated.is_none()
            && self.spent.is_none()
            && self.color.is_none()
            && self.icon.is_none()
    }
}

/// Record a transaction against a budget category.
#[derive(Clone, Debug)]
pub struct TransactionNew {
    pub category_id: Uuid,
    pub description: String,
    pub amount: Money,
    pub transaction_date: NaiveDate,
    pub kind: TransactionKind,
}

impl TransactionNew {
    #[must_use]
    pub fn new(
        category_id: Uuid,
        description: impl Into<String>,
        amount: Money,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            category_id,
            description: description.into(),
            amount,
            transaction_date,
            kind: TransactionKind::Expense,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Add a day to a trip itinerary.
#[derive(Clone, Debug, Default)]
pub struct DayNew {
    pub day_number: u32,
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct DayPatch {
    pub day_number: Option<u32>,
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub notes: Option<String>,
}

impl DayPatch {
    pub fn is_empty(&self) -> bool {
        self.day_number.is_none()
            && self.date.is_none()
            && self.title.is_none()
            && self.notes.is_none()
    }
}

/// Add an item to an itinerary day.
#[derive(Clone, Debug, Default)]
pub struct ItemNew {
    pub title: String,
    pub start_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub activity_id: Option<Uuid>,
    pub cost: Money,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub cost: Option<Money>,
    pub notes: Option<String>,
    pub position: Option<u32>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.start_time.is_none()
            && self.location.is_none()
            && self.cost.is_none()
            && self.notes.is_none()
            && self.position.is_none()
    }
}

/// Add a city to the catalog.
#[derive(Clone, Debug)]
pub struct CityNew {
    pub name: String,
    pub country: String,
    pub description: Option<String>,
    pub avg_daily_cost: Money,
}

/// Add an activity to a city's catalog.
#[derive(Clone, Debug)]
pub struct ActivityNew {
    pub city_id: Uuid,
    pub name: String,
    pub category: String,
    pub price: Money,
    pub rating_tenths: u8,
    pub duration_minutes: Option<u32>,
    pub description: Option<String>,
}

/// Split a shared expense between participants.
#[derive(Clone, Debug)]
pub struct SplitNew {
    pub description: String,
    pub total: Money,
    pub paid_by: String,
    pub split_type: SplitType,
    pub participants: Vec<ParticipantInput>,
}
