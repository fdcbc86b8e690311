use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    TransactionTrait,
};
use tracing::info;

use super::records::save_record;
use crate::entity::{publication, record};
use crate::error::AppError;
use crate::importer::choice::get_or_create;

/// Attach a publication to a batch of records.
///
/// Every record's source must start with the publication identifier; the
/// rest of the source becomes its location in the publication. A single
/// mismatch rejects the whole batch.
pub async fn attach_publication(
    db: &DatabaseConnection,
    identifier: &str,
    record_ids: &[i32],
) -> Result<Vec<record::Model>, AppError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(AppError::Validation("publication must not be empty".into()));
    }
    if record_ids.is_empty() {
        return Err(AppError::Validation("record_ids must not be empty".into()));
    }

    let txn = db.begin().await?;

    let records = record::Entity::find()
        .filter(record::Column::Id.is_in(record_ids.to_vec()))
        .all(&txn)
        .await?;
    if let Some(missing) = record_ids
        .iter()
        .find(|id| !records.iter().any(|r| r.id == **id))
    {
        return Err(AppError::NotFound(format!("Record {missing} not found")));
    }
    if let Some(mismatch) = records.iter().find(|r| !r.source.starts_with(identifier)) {
        return Err(AppError::Validation(format!(
            "Record {} does not start with publication {}",
            mismatch.source, identifier
        )));
    }

    let publication = get_or_create::<publication::Entity, _>(&txn, identifier).await?;

    let mut updated = Vec::with_capacity(records.len());
    for existing in records {
        let location = existing.source[identifier.len()..].trim().to_owned();
        let mut model = existing.into_active_model();
        model.publication_id = Set(Some(publication.id));
        model.location_in_publication = Set(location);
        updated.push(save_record(&txn, model).await?);
    }

    txn.commit().await?;
    info!(publication = identifier, records = updated.len(), "Attached publication");
    Ok(updated)
}
