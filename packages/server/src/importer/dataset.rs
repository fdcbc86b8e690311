use std::path::Path;

use common::Gazetteer;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use tracing::{info, instrument};

use super::error::ImportError;
use super::place::create_place;
use super::record::create_record;
use super::sheet::{DataSheet, LocationSheet, columns, read_workbook};
use crate::config::ImportConfig;

/// Counts reported at the end of an import run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Rows with a source that were processed.
    pub rows_read: usize,
    pub records_created: usize,
    pub records_updated: usize,
    pub places_created: usize,
    /// Single blank separator rows passed over.
    pub rows_skipped: usize,
}

/// Import a workbook file.
#[instrument(skip(db, gazetteer, config), fields(path = %path.display()))]
pub async fn import_dataset(
    db: &DatabaseConnection,
    gazetteer: &mut dyn Gazetteer,
    path: &Path,
    config: &ImportConfig,
) -> Result<ImportReport, ImportError> {
    let path = path.to_path_buf();
    let data_sheet = config.data_sheet.clone();
    let location_sheet = config.location_sheet.clone();
    let (data, locations) = tokio::task::spawn_blocking(move || {
        read_workbook(&path, &data_sheet, &location_sheet)
    })
    .await??;

    import_rows(db, gazetteer, &data, locations.as_ref()).await
}

/// Import already loaded sheets.
///
/// Each row is imported in its own transaction. A blank source marks a
/// separator; two blank sources in a row end the data.
pub async fn import_rows(
    db: &DatabaseConnection,
    gazetteer: &mut dyn Gazetteer,
    data: &DataSheet,
    locations: Option<&LocationSheet>,
) -> Result<ImportReport, ImportError> {
    let mut report = ImportReport::default();
    let mut blank_run = 0;

    for row in data.rows() {
        if row.is_blank(columns::SOURCE) {
            blank_run += 1;
            if blank_run >= 2 {
                break;
            }
            report.rows_skipped += 1;
            continue;
        }
        blank_run = 0;
        report.rows_read += 1;

        // Loading the gazetteer may download the dump; keep that outside the
        // row transaction so the database is not locked meanwhile.
        if !row.is_blank(columns::PLEIADES) && !gazetteer.is_populated() {
            gazetteer.populate().await?;
        }

        let txn = db.begin().await?;
        let place = create_place(&txn, gazetteer, &row, locations).await?;
        if place.as_ref().is_some_and(|p| p.created) {
            report.places_created += 1;
        }
        let record = create_record(&txn, &row, place.as_ref().map(|p| &p.model)).await?;
        txn.commit().await?;

        match record {
            Some(r) if r.created => report.records_created += 1,
            Some(_) => report.records_updated += 1,
            None => report.rows_skipped += 1,
        }
    }

    info!(
        rows = report.rows_read,
        created = report.records_created,
        updated = report.records_updated,
        places = report.places_created,
        skipped = report.rows_skipped,
        "Dataset imported"
    );
    Ok(report)
}
