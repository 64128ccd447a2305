pub mod pagination;
pub mod promo;
pub mod reservation;
pub mod table;
pub mod user;
