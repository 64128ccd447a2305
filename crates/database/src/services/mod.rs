pub mod archive;
pub mod availability;
pub mod catalog;
pub mod ledger;
pub mod promos;
pub mod reservation;
pub mod tables;
pub mod users;

use models::pagination::Pagination;
use sea_orm::{QuerySelect, Select, EntityTrait};

/// Applies `limit`/`skip` to a select
pub(crate) fn paginate<E: EntityTrait>(query: Select<E>, page: Pagination) -> Select<E> {
    query.offset(page.skip()).limit(page.limit())
}
