use std::path::PathBuf;

use common::GazetteerError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to open workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("sheet `{0}` not found in workbook")]
    SheetMissing(String),

    #[error("failed to read sheet `{name}`: {source}")]
    Sheet {
        name: String,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook reader task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("gazetteer error: {0}")]
    Gazetteer(#[from] GazetteerError),
}
