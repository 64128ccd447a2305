pub mod promocodes;
pub mod reservations;
pub mod reservations_completed;
pub mod tables;
pub mod users;
