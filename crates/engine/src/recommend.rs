//! Activity recommendation scoring.
//!
//! Each candidate gets a score from three parts:
//!
//! - rating: `rating_tenths * 2`, so 0..=100;
//! - interest: `+30` when the activity category is one of the traveler's
//!   interests;
//! - budget fit against the daily per-traveler budget `d`: `+20` when the
//!   price fits in `d`, `+5` within `2d`, `-20` above. Trips without a budget
//!   get no adjustment.
//!
//! Ties are broken by rating, then by name.

use std::collections::HashSet;

use crate::{Activity, Money, Trip};

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;

const INTEREST_BONUS: i64 = 30;
const FITS_BUDGET_BONUS: i64 = 20;
const STRETCHES_BUDGET_BONUS: i64 = 5;
const OVER_BUDGET_PENALTY: i64 = -20;

/// A scored activity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recommendation {
    pub activity: Activity,
    pub score: i64,
    pub matches_interest: bool,
}

/// Budget available per traveler per day, `None` when the trip has no budget.
pub fn daily_budget_per_traveler(trip: &Trip) -> Option<Money> {
    if trip.budget.minor() <= 0 {
        return None;
    }
    let days = trip.days().max(1);
    let travelers = i64::from(trip.travelers.max(1));
    Some(Money::new(trip.budget.minor() / (days * travelers)))
}

fn budget_fit(price: Money, daily: Option<Money>) -> i64 {
    let Some(daily) = daily else {
        return 0;
    };
    if price <= daily {
        FITS_BUDGET_BONUS
    } else if price.minor() <= daily.minor().saturating_mul(2) {
        STRETCHES_BUDGET_BONUS
    } else {
        OVER_BUDGET_PENALTY
    }
}

/// Normalizes free-text interests to the lower-case tags used by activities.
pub fn normalize_interests<I, S>(interests: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    interests
        .into_iter()
        .map(|interest| interest.as_ref().trim().to_lowercase())
        .filter(|interest| !interest.is_empty())
        .collect()
}

/// Scores and orders `candidates`, keeping at most `limit` of them.
///
/// `limit` is clamped to `1..=MAX_LIMIT`; `None` means [`DEFAULT_LIMIT`].
pub fn rank(
    trip: &Trip,
    candidates: Vec<Activity>,
    interests: &HashSet<String>,
    limit: Option<usize>,
) -> Vec<Recommendation> {
    let daily = daily_budget_per_traveler(trip);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let mut scored: Vec<Recommendation> = candidates
        .into_iter()
        .map(|activity| {
            let matches_interest = interests.contains(&activity.category.to_lowercase());
            let mut score = i64::from(activity.rating_tenths) * 2;
            if matches_interest {
                score += INTEREST_BONUS;
            }
            score += budget_fit(activity.price, daily);
            Recommendation {
                activity,
                score,
                matches_interest,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.activity.rating_tenths.cmp(&a.activity.rating_tenths))
            .then_with(|| a.activity.name.cmp(&b.activity.name))
    });
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::TripStatus;

    fn trip(budget: i64, travelers: u32) -> Trip {
        Trip {
            id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            destination: "Kyoto".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 4, 5).unwrap(),
            travelers,
            budget: Money::new(budget),
            status: TripStatus::Planned,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn activity(name: &str, category: &str, price: i64, rating: u8) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            city_id: Uuid::new_v4(),
            name: name.to_string(),
            category: category.to_string(),
            price: Money::new(price),
            rating_tenths: rating,
            duration_minutes: None,
            description: None,
        }
    }

    #[test]
    fn daily_budget_divides_by_days_and_travelers() {
        // 5 days, 2 travelers.
        assert_eq!(
            daily_budget_per_traveler(&trip(1000_00, 2)),
            Some(Money::new(100_00))
        );
        assert_eq!(daily_budget_per_traveler(&trip(0, 2)), None);
    }

    #[test]
    fn interest_match_outranks_slightly_better_rating() {
        let interests = normalize_interests([" Food "]);
        let ranked = rank(
            &trip(0, 1),
            vec![
                activity("Temple tour", "culture", 0, 48),
                activity("Nishiki market", "food", 0, 42),
            ],
            &interests,
            None,
        );
        assert_eq!(ranked[0].activity.name, "Nishiki market");
        assert!(ranked[0].matches_interest);
        assert_eq!(ranked[0].score, 84 + 30);
        assert_eq!(ranked[1].score, 96);
    }

    #[test]
    fn budget_fit_adjusts_scores() {
        let trip = trip(1000_00, 2);
        let ranked = rank(
            &trip,
            vec![
                activity("cheap", "x", 50_00, 40),
                activity("stretch", "x", 150_00, 40),
                activity("pricey", "x", 500_00, 40),
            ],
            &HashSet::new(),
            None,
        );
        let scores: Vec<(String, i64)> = ranked
            .iter()
            .map(|r| (r.activity.name.clone(), r.score))
            .collect();
        assert_eq!(
            scores,
            vec![
                ("cheap".to_string(), 100),
                ("stretch".to_string(), 85),
                ("pricey".to_string(), 60),
            ]
        );
    }

    #[test]
    fn ties_break_by_rating_then_name_and_limit_is_clamped() {
        let ranked = rank(
            &trip(0, 1),
            vec![
                activity("b", "x", 0, 40),
                activity("a", "x", 0, 40),
                activity("c", "x", 0, 10),
            ],
            &HashSet::new(),
            Some(0),
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].activity.name, "a");
    }
}
