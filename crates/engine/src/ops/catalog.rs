use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Activity, ActivityNew, City, CityDetail, CityNew, EngineError, ResultEngine, activities,
    activities::MAX_RATING_TENTHS, cities,
    util::{fold_case, normalize_optional_text, normalize_required_text, require_non_negative},
};

use super::{Engine, with_tx};

impl Engine {
    /// Lists catalog cities, optionally filtered by a case-insensitive
    /// substring of the name or country.
    pub async fn list_cities(&self, query: Option<&str>) -> ResultEngine<Vec<City>> {
        let needle = query.map(fold_case).filter(|q| !q.is_empty());
        cities::Entity::find()
            .order_by_asc(cities::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .filter(|city| match &needle {
                Some(needle) => {
                    fold_case(&city.name).contains(needle.as_str())
                        || fold_case(&city.country).contains(needle.as_str())
                }
                None => true,
            })
            .map(City::try_from)
            .collect()
    }

    /// A city with its activities, best rated first.
    pub async fn city(&self, city_id: Uuid) -> ResultEngine<CityDetail> {
        let city = cities::Entity::find_by_id(city_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("city not exists".to_string()))?;
        let activities = activities::Entity::find()
            .filter(activities::Column::CityId.eq(city.id.clone()))
            .order_by_desc(activities::Column::RatingTenths)
            .order_by_asc(activities::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Activity::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok(CityDetail {
            city: City::try_from(city)?,
            activities,
        })
    }

    /// Adds a city. Names are unique per country, ignoring case.
    pub async fn create_city(&self, cmd: CityNew) -> ResultEngine<City> {
        let name = normalize_required_text(&cmd.name, "city name")?;
        let country = normalize_required_text(&cmd.country, "country")?;
        require_non_negative(cmd.avg_daily_cost, "average daily cost")?;

        with_tx!(self, |db_tx| {
            let (name_key, country_key) = (fold_case(&name), fold_case(&country));
            let existing = cities::Entity::find().all(&db_tx).await?;
            if existing.iter().any(|city| {
                fold_case(&city.name) == name_key && fold_case(&city.country) == country_key
            }) {
                return Err(EngineError::ExistingKey(format!("{name}, {country}")));
            }

            let model = cities::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                name: ActiveValue::Set(name),
                country: ActiveValue::Set(country),
                description: ActiveValue::Set(normalize_optional_text(cmd.description.as_deref())),
                avg_daily_cost_minor: ActiveValue::Set(cmd.avg_daily_cost.minor()),
            }
            .insert(&db_tx)
            .await?;
            City::try_from(model)
        })
    }

    pub async fn create_activity(&self, cmd: ActivityNew) -> ResultEngine<Activity> {
        let name = normalize_required_text(&cmd.name, "activity name")?;
        let category = normalize_required_text(&cmd.category, "activity category")?.to_lowercase();
        require_non_negative(cmd.price, "price")?;
        if cmd.rating_tenths > MAX_RATING_TENTHS {
            return Err(EngineError::InvalidAmount(
                "rating must be between 0 and 5".to_string(),
            ));
        }
        let duration_minutes = cmd
            .duration_minutes
            .map(i32::try_from)
            .transpose()
            .map_err(|_| EngineError::InvalidAmount("duration too large".to_string()))?;

        with_tx!(self, |db_tx| {
            cities::Entity::find_by_id(cmd.city_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("city not exists".to_string()))?;

            let model = activities::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                city_id: ActiveValue::Set(cmd.city_id.to_string()),
                name: ActiveValue::Set(name),
                category: ActiveValue::Set(category),
                price_minor: ActiveValue::Set(cmd.price.minor()),
                rating_tenths: ActiveValue::Set(i32::from(cmd.rating_tenths)),
                duration_minutes: ActiveValue::Set(duration_minutes),
                description: ActiveValue::Set(normalize_optional_text(cmd.description.as_deref())),
            }
            .insert(&db_tx)
            .await?;
            Activity::try_from(model)
        })
    }
}
