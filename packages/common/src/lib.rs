pub mod config;
pub mod gazetteer;
pub mod geo;

pub use config::GazetteerConfig;
pub use gazetteer::{Gazetteer, GazetteerEntry, GazetteerError, PleiadesGazetteer};
pub use geo::{Point, to_decimal};
