use crate::{entities::tables, error::ServiceError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, QuerySelect};
use uuid::Uuid;

/// What the booking engine needs to know about a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableInfo {
    pub price: Decimal,
    pub seats: u16,
}

/// Read access to the venue's tables
#[async_trait]
pub trait TableCatalog: Send + Sync {
    /// Price and capacity of a table.
    ///
    /// Called inside the booking transaction; implementations backed by a database should lock the
    /// row so concurrent bookings of the same table serialize.
    async fn get_table_info<C>(&self, conn: &C, table_id: Uuid) -> Result<TableInfo, ServiceError>
    where
        C: ConnectionTrait;
}

/// Table catalog backed by the `tables` relation
#[derive(Debug, Clone, Copy, Default)]
pub struct DbTableCatalog;

#[async_trait]
impl TableCatalog for DbTableCatalog {
    async fn get_table_info<C>(&self, conn: &C, table_id: Uuid) -> Result<TableInfo, ServiceError>
    where
        C: ConnectionTrait,
    {
        // SELECT ... FOR UPDATE: the lock is held until the caller's transaction ends
        let table = tables::Entity::find_by_id(table_id)
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::not_found("table", table_id))?;

        // The schema's CHECK keeps seats positive; anything else is a corrupt row
        let seats = u16::try_from(table.seats)
            .ok()
            .filter(|&seats| seats > 0)
            .ok_or_else(|| {
                ServiceError::Storage(DbErr::Custom(format!(
                    "table {table_id} has invalid seat count {}",
                    table.seats
                )))
            })?;

        Ok(TableInfo {
            price: table.price,
            seats,
        })
    }
}
