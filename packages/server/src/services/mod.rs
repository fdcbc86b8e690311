pub mod catalogue;
pub mod maintenance;
pub mod places;
pub mod publication;
pub mod records;
pub mod users;
