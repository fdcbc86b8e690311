pub mod geojson;
pub mod place;
pub mod publication;
pub mod record;
