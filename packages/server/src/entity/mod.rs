pub mod area;
pub mod century;
pub mod language;
pub mod place;
pub mod primary_category;
pub mod publication;
pub mod record;
pub mod record_century;
pub mod record_language;
pub mod record_script;
pub mod region;
pub mod script;
pub mod secondary_category;
pub mod user;
