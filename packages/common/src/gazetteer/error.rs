use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while building or loading the gazetteer index.
///
/// Lookup misses are not errors; these variants mean the index cannot be
/// built at all and must reach the caller.
#[derive(Debug, Error)]
pub enum GazetteerError {
    #[error("gazetteer.data_dir must be set to use the gazetteer")]
    MissingDataDirectory,

    #[error("Could not create external data directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error while downloading gazetteer dump: {0}")]
    Download(#[from] reqwest::Error),

    #[error("Error while decompressing gazetteer dump: {0}")]
    Decompress(#[source] io::Error),

    #[error("Malformed gazetteer dump: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Gazetteer index cache error: {0}")]
    Cache(#[from] bincode::Error),

    #[error("Gazetteer IO error: {0}")]
    Io(#[from] io::Error),
}
