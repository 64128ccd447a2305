pub mod archive_month;
pub mod booking;
pub mod pagination;
pub mod pricing;
