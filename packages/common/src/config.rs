use std::path::PathBuf;

use serde::Deserialize;

/// Gazetteer (Pleiades) configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct GazetteerConfig {
    /// Directory that holds the raw dump and the binary index. Must be set
    /// before any gazetteer lookup is attempted.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Location of the gzip-compressed JSON dump.
    #[serde(default = "default_gazetteer_url")]
    pub url: String,
    /// Timeout for the dump download in seconds. Default: 600.
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

fn default_gazetteer_url() -> String {
    "https://atlantides.org/downloads/pleiades/json/pleiades-places-latest.json.gz".into()
}
fn default_download_timeout_secs() -> u64 {
    600
}

impl Default for GazetteerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            url: default_gazetteer_url(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}
