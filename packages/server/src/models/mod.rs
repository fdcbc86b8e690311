pub mod geojson;
pub mod place;
pub mod record;
pub mod shared;
