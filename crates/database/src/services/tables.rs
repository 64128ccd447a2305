use crate::{
    entities::{reservations, tables},
    error::ServiceError,
    services::{ledger::BalanceLedger, paginate},
};
use log::info;
use models::{pagination::Pagination, pricing::DECIMAL_PLACES};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

const MAX_SEATS: i16 = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTable {
    pub table_number: i32,
    pub price: Decimal,
    pub seats: i16,
}

impl NewTable {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.table_number < 1 {
            return Err(ServiceError::validation("table number must be at least 1"));
        }

        if self.price < Decimal::ZERO || self.price.scale() > DECIMAL_PLACES {
            return Err(ServiceError::validation(
                "price must be non-negative with at most 2 decimal places",
            ));
        }

        if !(1..=MAX_SEATS).contains(&self.seats) {
            return Err(ServiceError::validation(format!(
                "seats must be between 1 and {MAX_SEATS}"
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletedTable {
    pub table_id: Uuid,
    /// Active reservations that were refunded before the table went away
    pub refunded_reservations: usize,
}

pub struct TableService;

impl TableService {
    pub async fn list_tables(
        db: &DatabaseConnection,
        page: Pagination,
    ) -> Result<Vec<tables::Model>, ServiceError> {
        let query = tables::Entity::find().order_by_asc(tables::Column::TableNumber);
        let tables = paginate(query, page).all(db).await?;

        if tables.is_empty() {
            return Err(ServiceError::not_found("tables", "requested page"));
        }

        Ok(tables)
    }

    pub async fn get_table(db: &DatabaseConnection, table_id: Uuid) -> Result<tables::Model, ServiceError> {
        tables::Entity::find_by_id(table_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("table", table_id))
    }

    pub async fn create_table(db: &DatabaseConnection, table: NewTable) -> Result<Uuid, ServiceError> {
        table.validate()?;

        let id = Uuid::new_v4();
        tables::ActiveModel {
            id: Set(id),
            table_number: Set(table.table_number),
            price: Set(table.price),
            seats: Set(table.seats),
        }
        .insert(db)
        .await
        .map_err(|err| match ServiceError::from(err) {
            ServiceError::Conflict(_) => {
                ServiceError::Conflict(format!("table {} already exists", table.table_number))
            }
            other => other,
        })?;

        info!("Table {} created as {id}", table.table_number);
        Ok(id)
    }

    /// Removes a table, refunding every active reservation on it in the same transaction
    pub async fn delete_table<L>(
        db: &DatabaseConnection,
        ledger: &L,
        table_number: i32,
    ) -> Result<DeletedTable, ServiceError>
    where
        L: BalanceLedger,
    {
        let txn = db.begin().await?;

        // Locking the table row blocks new bookings on it until we are done
        let table = tables::Entity::find()
            .filter(tables::Column::TableNumber.eq(table_number))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("table", table_number))?;

        let booked = reservations::Entity::find()
            .filter(reservations::Column::TableId.eq(table.id))
            .lock_exclusive()
            .all(&txn)
            .await?;

        for reservation in &booked {
            ledger
                .credit(&txn, reservation.user_id, reservation.price)
                .await?;
        }

        reservations::Entity::delete_many()
            .filter(reservations::Column::TableId.eq(table.id))
            .exec(&txn)
            .await?;
        tables::Entity::delete_by_id(table.id).exec(&txn).await?;

        txn.commit().await?;

        info!(
            "Table {} deleted, {} reservation(s) refunded",
            table_number,
            booked.len()
        );

        Ok(DeletedTable {
            table_id: table.id,
            refunded_reservations: booked.len(),
        })
    }
}
