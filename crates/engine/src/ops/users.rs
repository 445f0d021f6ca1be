use sea_orm::{ActiveValue, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, User, users, util::normalize_required_text};

use super::{Engine, with_tx};

impl Engine {
    /// Resolves a bearer token to its user.
    pub async fn user_by_token(&self, token: &str) -> ResultEngine<Option<User>> {
        if token.trim().is_empty() {
            return Ok(None);
        }
        Ok(users::Entity::find()
            .filter(users::Column::ApiToken.eq(token))
            .one(&self.database)
            .await?)
    }

    /// Registers a user with its API token.
    pub async fn create_user(&self, username: &str, api_token: &str) -> ResultEngine<User> {
        let username = normalize_required_text(username, "username")?;
        let api_token = normalize_required_text(api_token, "api token")?;

        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username));
            }
            if users::Entity::find()
                .filter(users::Column::ApiToken.eq(api_token.clone()))
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey("api token".to_string()));
            }

            let user = users::ActiveModel {
                username: ActiveValue::Set(username),
                api_token: ActiveValue::Set(api_token),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(username = %user.username, "user created");
            Ok(user)
        })
    }
}
