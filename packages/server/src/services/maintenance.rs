use sea_orm::{DatabaseConnection, DbErr, EntityTrait, TransactionTrait};
use tracing::info;

use crate::entity::{
    area, century, language, place, primary_category, publication, record, record_century,
    record_language, record_script, region, script, secondary_category,
};

/// Delete every catalogue row. API users are kept.
pub async fn clear_catalogue(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let txn = db.begin().await?;
    let mut deleted = 0;

    deleted += record_language::Entity::delete_many().exec(&txn).await?.rows_affected;
    deleted += record_script::Entity::delete_many().exec(&txn).await?.rows_affected;
    deleted += record_century::Entity::delete_many().exec(&txn).await?.rows_affected;
    deleted += record::Entity::delete_many().exec(&txn).await?.rows_affected;
    deleted += place::Entity::delete_many().exec(&txn).await?.rows_affected;
    deleted += area::Entity::delete_many().exec(&txn).await?.rows_affected;
    deleted += region::Entity::delete_many().exec(&txn).await?.rows_affected;
    deleted += primary_category::Entity::delete_many().exec(&txn).await?.rows_affected;
    deleted += secondary_category::Entity::delete_many().exec(&txn).await?.rows_affected;
    deleted += language::Entity::delete_many().exec(&txn).await?.rows_affected;
    deleted += script::Entity::delete_many().exec(&txn).await?.rows_affected;
    deleted += century::Entity::delete_many().exec(&txn).await?.rows_affected;
    deleted += publication::Entity::delete_many().exec(&txn).await?.rows_affected;

    txn.commit().await?;
    info!(rows = deleted, "Cleared catalogue");
    Ok(deleted)
}
