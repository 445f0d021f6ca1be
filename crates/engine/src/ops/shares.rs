use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*, sea_query::OnConflict};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, ShareRole, trip_shares};

use super::{Engine, with_tx};

/// A user the trip is shared with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TripShare {
    pub username: String,
    pub role: ShareRole,
}

impl TryFrom<trip_shares::Model> for TripShare {
    type Error = EngineError;

    fn try_from(model: trip_shares::Model) -> ResultEngine<Self> {
        Ok(Self {
            role: ShareRole::try_from(model.role.as_str())?,
            username: model.user_id,
        })
    }
}

impl Engine {
    /// Grants `username` access to a trip, replacing any previous role.
    pub async fn share_trip(
        &self,
        trip_id: Uuid,
        username: &str,
        role: ShareRole,
        user_id: &str,
    ) -> ResultEngine<()> {
        let username = username.trim();
        if username == user_id {
            return Err(EngineError::InvalidName(
                "cannot share a trip with its owner".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            self.require_trip_owner(&db_tx, trip_id, user_id).await?;
            self.require_user_exists(&db_tx, username).await?;

            let share = trip_shares::ActiveModel {
                trip_id: ActiveValue::Set(trip_id.to_string()),
                user_id: ActiveValue::Set(username.to_string()),
                role: ActiveValue::Set(role.as_str().to_string()),
            };
            trip_shares::Entity::insert(share)
                .on_conflict(
                    OnConflict::columns([trip_shares::Column::TripId, trip_shares::Column::UserId])
                        .update_column(trip_shares::Column::Role)
                        .to_owned(),
                )
                .exec(&db_tx)
                .await?;
            tracing::debug!(%trip_id, username, role = role.as_str(), "trip shared");
            Ok(())
        })
    }

    /// Revokes a share. Owner only.
    pub async fn unshare_trip(
        &self,
        trip_id: Uuid,
        username: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_trip_owner(&db_tx, trip_id, user_id).await?;
            let result =
                trip_shares::Entity::delete_by_id((trip_id.to_string(), username.trim().to_string()))
                    .exec(&db_tx)
                    .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("trip share not exists".to_string()));
            }
            Ok(())
        })
    }

    /// Lists the users a trip is shared with. Owner only.
    pub async fn list_trip_shares(
        &self,
        trip_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Vec<TripShare>> {
        with_tx!(self, |db_tx| {
            self.require_trip_owner(&db_tx, trip_id, user_id).await?;
            trip_shares::Entity::find()
                .filter(trip_shares::Column::TripId.eq(trip_id.to_string()))
                .order_by_asc(trip_shares::Column::UserId)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(TripShare::try_from)
                .collect()
        })
    }
}
