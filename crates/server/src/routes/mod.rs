pub mod health;
pub mod promo;
pub mod reservation;
pub mod root;
pub mod table;
pub mod user;
