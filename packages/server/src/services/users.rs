use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use tracing::info;

use crate::config::AuthConfig;
use crate::entity::user;
use crate::utils::jwt;

/// A bearer token issued for an API user.
#[derive(Debug)]
pub struct IssuedToken {
    pub user: user::Model,
    /// Whether the user was created by this call.
    pub created: bool,
    pub token: String,
}

/// Get or create the user named `username` and sign a token for it.
pub async fn issue_token(
    db: &DatabaseConnection,
    auth: &AuthConfig,
    username: &str,
) -> anyhow::Result<IssuedToken> {
    let username = username.trim();
    anyhow::ensure!(!username.is_empty(), "username must not be empty");

    let result = user::Entity::insert(user::ActiveModel {
        username: Set(username.to_owned()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    })
    .on_conflict(OnConflict::column(user::Column::Username).do_nothing().to_owned())
    .exec_without_returning(db)
    .await;
    let created = match result {
        Ok(rows) => rows > 0,
        Err(DbErr::RecordNotInserted) => false,
        Err(e) => return Err(e.into()),
    };

    let user = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("user {username} vanished after insert"))?;
    if created {
        info!(username, "Created API user");
    }

    let token = jwt::sign(auth, user.id, &user.username)?;
    Ok(IssuedToken {
        user,
        created,
        token,
    })
}
