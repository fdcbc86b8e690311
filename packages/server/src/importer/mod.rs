//! Dataset import: workbook rows to places and records.

pub mod choice;
pub mod dataset;
mod error;
pub mod place;
pub mod record;
pub mod sheet;

pub use dataset::{ImportReport, import_dataset};
pub use error::ImportError;
pub use place::create_place;
pub use record::create_record;

/// Result of a get-or-create step.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub model: T,
    /// `false` when an existing row was returned.
    pub created: bool,
}
