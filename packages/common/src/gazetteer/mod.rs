mod dump;
mod error;
mod traits;

pub mod pleiades;

pub use dump::{build_index, decompress_dump, read_index, write_index};
pub use error::GazetteerError;
pub use pleiades::PleiadesGazetteer;
pub use traits::{Gazetteer, GazetteerEntry, GazetteerIndex};
