use std::collections::HashSet;

use sea_orm::{QueryFilter, QuerySelect, prelude::*};
use uuid::Uuid;

use crate::{
    Activity, Recommendation, ResultEngine, Trip, activities, cities, itinerary_items, recommend,
    util::fold_case,
};

use super::{Engine, with_tx};

/// City names a destination may refer to: the whole string and its first
/// comma-separated segment (`"Kyoto, Japan"` also matches `"Kyoto"`).
fn destination_names(destination: &str) -> Vec<String> {
    let full = fold_case(destination);
    let mut names = vec![full.clone()];
    if let Some((head, _)) = full.split_once(',') {
        let head = head.trim();
        if !head.is_empty() {
            names.push(head.to_string());
        }
    }
    names
}

impl Engine {
    /// Ranks the destination city's activities for a trip.
    ///
    /// Activities already placed on the itinerary are skipped; an unknown
    /// destination yields an empty list.
    pub async fn recommend_activities(
        &self,
        trip_id: Uuid,
        interests: &[String],
        limit: Option<usize>,
        user_id: &str,
    ) -> ResultEngine<Vec<Recommendation>> {
        with_tx!(self, |db_tx| {
            let (trip_model, _) = self.require_trip_read(&db_tx, trip_id, user_id).await?;
            let trip = Trip::try_from(trip_model)?;

            let names = destination_names(&trip.destination);
            let city_ids: Vec<String> = cities::Entity::find()
                .all(&db_tx)
                .await?
                .into_iter()
                .filter(|city| names.contains(&fold_case(&city.name)))
                .map(|city| city.id)
                .collect();
            if city_ids.is_empty() {
                tracing::debug!(%trip_id, destination = %trip.destination, "no catalog city");
                return Ok(Vec::new());
            }

            let day_ids = self.trip_day_ids(&db_tx, trip_id).await?;
            let planned: HashSet<String> = itinerary_items::Entity::find()
                .select_only()
                .column(itinerary_items::Column::ActivityId)
                .filter(itinerary_items::Column::DayId.is_in(day_ids))
                .filter(itinerary_items::Column::ActivityId.is_not_null())
                .into_tuple::<Option<String>>()
                .all(&db_tx)
                .await?
                .into_iter()
                .flatten()
                .collect();

            let candidates = activities::Entity::find()
                .filter(activities::Column::CityId.is_in(city_ids))
                .all(&db_tx)
                .await?
                .into_iter()
                .filter(|activity| !planned.contains(&activity.id))
                .map(Activity::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let interests = recommend::normalize_interests(interests);
            Ok(recommend::rank(&trip, candidates, &interests, limit))
        })
    }
}
