use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use super::dump::{build_index, decompress_dump, read_index, write_index};
use super::error::GazetteerError;
use super::traits::{Gazetteer, GazetteerEntry, GazetteerIndex};
use crate::config::GazetteerConfig;

/// File name of the decompressed dump inside the data directory.
pub const RAW_FILE_NAME: &str = "pleiades.json";
/// File name of the binary index inside the data directory.
pub const INDEX_FILE_NAME: &str = "pleiades.bin";

/// Pleiades-backed gazetteer.
///
/// The index is loaded lazily on the first [`Gazetteer::fetch`]: from the
/// binary cache when present, otherwise by parsing the raw dump (which is
/// downloaded first if it is missing too).
pub struct PleiadesGazetteer {
    raw_path: PathBuf,
    index_path: PathBuf,
    url: String,
    timeout: Duration,
    places: Option<GazetteerIndex>,
    populations: u32,
}

impl PleiadesGazetteer {
    /// Fails with [`GazetteerError::MissingDataDirectory`] when no data
    /// directory is configured.
    pub fn new(config: &GazetteerConfig) -> Result<Self, GazetteerError> {
        let data_dir = config
            .data_dir
            .as_ref()
            .ok_or(GazetteerError::MissingDataDirectory)?;

        Ok(Self {
            raw_path: data_dir.join(RAW_FILE_NAME),
            index_path: data_dir.join(INDEX_FILE_NAME),
            url: config.url.clone(),
            timeout: Duration::from_secs(config.download_timeout_secs),
            places: None,
            populations: 0,
        })
    }

    pub fn raw_path(&self) -> &Path {
        &self.raw_path
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// How many times the in-memory index has been built or loaded.
    pub fn populations(&self) -> u32 {
        self.populations
    }

    /// Number of places in the loaded index, if any.
    pub fn place_count(&self) -> Option<usize> {
        self.places.as_ref().map(|places| places.len())
    }

    /// Download the gzip dump and decompress it to [`Self::raw_path`].
    pub async fn download_dump(&self) -> Result<(), GazetteerError> {
        let data_dir = self
            .raw_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        fs::create_dir_all(&data_dir)
            .await
            .map_err(|source| GazetteerError::CreateDirectory {
                path: data_dir.clone(),
                source,
            })?;

        info!(url = %self.url, "Downloading latest gazetteer dump");
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        let mut response = client.get(&self.url).send().await?.error_for_status()?;

        let gz_path = data_dir.join(format!(".{}.json.gz", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&gz_path).await?;
        let written = async {
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk).await?;
            }
            file.flush().await?;
            Ok::<_, GazetteerError>(())
        }
        .await;
        drop(file);

        let result = match written {
            Ok(()) => {
                let raw_path = self.raw_path.clone();
                let gz = gz_path.clone();
                run_blocking(move || decompress_dump(&gz, &raw_path)).await
            }
            Err(e) => Err(e),
        };
        let _ = fs::remove_file(&gz_path).await;
        result
    }

    async fn load_index(&mut self) -> Result<(), GazetteerError> {
        let places = if fs::try_exists(&self.index_path).await? {
            let index_path = self.index_path.clone();
            run_blocking(move || read_index(&index_path)).await?
        } else {
            if !fs::try_exists(&self.raw_path).await? {
                // TODO: refresh the dump when the upstream copy is newer; it is republished daily.
                self.download_dump().await?;
            }
            info!(path = %self.raw_path.display(), "Indexing gazetteer dump");
            let raw_path = self.raw_path.clone();
            let index_path = self.index_path.clone();
            run_blocking(move || {
                let places = build_index(&raw_path)?;
                write_index(&index_path, &places)?;
                Ok(places)
            })
            .await?
        };

        info!(places = places.len(), "Gazetteer index loaded");
        self.places = Some(places);
        self.populations += 1;
        Ok(())
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T, GazetteerError>
where
    F: FnOnce() -> Result<T, GazetteerError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| GazetteerError::Io(std::io::Error::other(e)))?
}

#[async_trait]
impl Gazetteer for PleiadesGazetteer {
    async fn populate(&mut self) -> Result<(), GazetteerError> {
        if self.places.is_none() {
            self.load_index().await?;
        }
        Ok(())
    }

    async fn fetch(&mut self, id: i64) -> Result<Option<GazetteerEntry>, GazetteerError> {
        self.populate().await?;

        let entry = self
            .places
            .as_ref()
            .and_then(|places| places.get(&id))
            .cloned();

        match &entry {
            None => warn!(pleiades_id = id, "Place not found in gazetteer"),
            Some(found) if found.repr_point.is_none() => {
                warn!(pleiades_id = id, "Gazetteer place has no representative point")
            }
            Some(_) => {}
        }
        Ok(entry)
    }

    fn reset(&mut self) {
        self.places = None;
    }

    fn is_populated(&self) -> bool {
        self.places.is_some()
    }
}
