//! Blocking helpers that turn the upstream dump into the binary index.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use serde::Deserialize;
use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use tracing::debug;

use super::error::GazetteerError;
use super::traits::{GazetteerEntry, GazetteerIndex};

/// Path for a temporary sibling of `target`, renamed into place once complete.
fn temp_sibling(target: &Path) -> PathBuf {
    let name = format!(".{}.tmp", uuid::Uuid::new_v4());
    match target.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Decompress a gzip file into `raw_path`.
///
/// The output is written to a temporary file first so that an interrupted
/// run never leaves a truncated dump behind.
pub fn decompress_dump(gz_path: &Path, raw_path: &Path) -> Result<(), GazetteerError> {
    let temp_path = temp_sibling(raw_path);
    let result = (|| -> io::Result<()> {
        let mut decoder = GzDecoder::new(BufReader::new(File::open(gz_path)?));
        let mut out = BufWriter::new(File::create(&temp_path)?);
        io::copy(&mut decoder, &mut out)?;
        out.flush()?;
        fs::rename(&temp_path, raw_path)
    })();

    if let Err(err) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(GazetteerError::Decompress(err));
    }
    Ok(())
}

/// Stream-parse the raw dump, keeping only `id` and `reprPoint` per place.
///
/// Items of the top-level `@graph` array are deserialized one at a time, so
/// memory use is bounded by the index rather than by the dump size.
pub fn build_index(raw_path: &Path) -> Result<GazetteerIndex, GazetteerError> {
    let reader = BufReader::new(File::open(raw_path)?);
    let mut deserializer = serde_json::Deserializer::from_reader(reader);
    let mut index = GazetteerIndex::new();
    (&mut deserializer).deserialize_map(DumpVisitor(&mut index))?;
    deserializer.end()?;
    Ok(index)
}

/// Persist the index as a bincode blob.
pub fn write_index(index_path: &Path, index: &GazetteerIndex) -> Result<(), GazetteerError> {
    let temp_path = temp_sibling(index_path);
    let result = (|| -> Result<(), GazetteerError> {
        let mut out = BufWriter::new(File::create(&temp_path)?);
        bincode::serialize_into(&mut out, index)?;
        out.flush()?;
        fs::rename(&temp_path, index_path)?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

/// Load a previously persisted index.
pub fn read_index(index_path: &Path) -> Result<GazetteerIndex, GazetteerError> {
    let reader = BufReader::new(File::open(index_path)?);
    Ok(bincode::deserialize_from(reader)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DumpId {
    Number(i64),
    Text(String),
}

impl DumpId {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(id) => Some(*id),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Deserialize)]
struct DumpPlace {
    id: DumpId,
    #[serde(rename = "reprPoint")]
    repr_point: Option<Vec<f64>>,
}

impl DumpPlace {
    fn entry(&self) -> GazetteerEntry {
        let repr_point = self
            .repr_point
            .as_deref()
            .and_then(|coords| match coords {
                [lon, lat, ..] => Some([*lon, *lat]),
                _ => None,
            });
        GazetteerEntry { repr_point }
    }
}

/// Walks the top-level object, handing `@graph` to [`GraphSeed`].
struct DumpVisitor<'a>(&'a mut GazetteerIndex);

impl<'de> Visitor<'de> for DumpVisitor<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a gazetteer dump object with an @graph array")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        let index = self.0;
        let mut seen_graph = false;
        while let Some(key) = map.next_key::<String>()? {
            if key == "@graph" {
                map.next_value_seed(GraphSeed(&mut *index))?;
                seen_graph = true;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        if !seen_graph {
            return Err(de::Error::missing_field("@graph"));
        }
        Ok(())
    }
}

struct GraphSeed<'a>(&'a mut GazetteerIndex);

impl<'de> DeserializeSeed<'de> for GraphSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for GraphSeed<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of gazetteer places")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        while let Some(place) = seq.next_element::<DumpPlace>()? {
            match place.id.as_i64() {
                Some(id) => {
                    self.0.insert(id, place.entry());
                }
                None => debug!("Skipping gazetteer place with a non-numeric id"),
            }
        }
        Ok(())
    }
}
