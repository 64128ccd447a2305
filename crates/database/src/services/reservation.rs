use crate::{
    clock::{Clock, utc_now},
    entities::{reservations, reservations_completed, users},
    error::ServiceError,
    services::{
        archive::ArchiveStore,
        availability::AvailabilityChecker,
        catalog::{DbTableCatalog, TableCatalog},
        ledger::{BalanceLedger, DbBalanceLedger},
        paginate,
    },
};
use chrono::NaiveDateTime;
use log::{debug, info};
use models::{
    booking::{BookingWindow, check_party, check_seats},
    pagination::Pagination,
    pricing::final_price,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

/// A booking request, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub seats: u16,
    pub table_id: Uuid,
    pub user_id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedReservation {
    pub reservation_id: Uuid,
    pub price: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedReservation {
    pub completed_id: Uuid,
    pub reservation_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelledReservation {
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    pub refunded: Decimal,
}

/// Creates, completes and cancels reservations.
///
/// Each transition runs in a single transaction on `db`. A transaction that is dropped without
/// being committed rolls back, so an early `?` return never leaves partial writes behind.
pub struct ReservationEngine<T = DbTableCatalog, L = DbBalanceLedger> {
    db: DatabaseConnection,
    catalog: T,
    ledger: L,
    availability: AvailabilityChecker,
    archive: ArchiveStore,
    clock: Clock,
}

impl ReservationEngine {
    /// Engine wired to the database-backed catalog and ledger, using UTC wall-clock time
    pub fn with_defaults(db: DatabaseConnection) -> Self {
        Self::new(db, DbTableCatalog, DbBalanceLedger::new(utc_now), utc_now)
    }
}

impl<T, L> ReservationEngine<T, L>
where
    T: TableCatalog,
    L: BalanceLedger,
{
    pub fn new(db: DatabaseConnection, catalog: T, ledger: L, clock: Clock) -> Self {
        Self {
            db,
            catalog,
            ledger,
            availability: AvailabilityChecker,
            archive: ArchiveStore,
            clock,
        }
    }

    /// Books a table and debits the user for it
    pub async fn create_reservation(
        &self,
        request: NewReservation,
    ) -> Result<CreatedReservation, ServiceError> {
        // Everything checkable without storage is checked before a connection is taken
        let window = BookingWindow::new(request.start_time, request.end_time, (self.clock)())?;
        check_party(request.seats)?;

        let txn = self.db.begin().await?;

        let table = self.catalog.get_table_info(&txn, request.table_id).await?;
        check_seats(request.seats, table.seats)?;

        let account = self.ledger.get_balance(&txn, request.user_id).await?;
        let price = final_price(table.price, account.discount);
        if price > account.balance {
            debug!(
                "User {} cannot afford table {}: price {}, balance {}",
                request.user_id, request.table_id, price, account.balance
            );
            return Err(ServiceError::InsufficientFunds {
                required: price,
                available: account.balance,
            });
        }

        self.availability
            .ensure_available(&txn, request.table_id, &window)
            .await?;

        let reservation_id = Uuid::new_v4();
        reservations::ActiveModel {
            id: Set(reservation_id),
            user_id: Set(request.user_id),
            table_id: Set(request.table_id),
            start_time: Set(window.start()),
            end_time: Set(window.end()),
            price: Set(price),
        }
        .insert(&txn)
        .await?;

        self.ledger.debit(&txn, request.user_id, price).await?;

        txn.commit().await?;

        info!(
            "Reservation {} created: table {} for user {} during {}, charged {}",
            reservation_id, request.table_id, request.user_id, window, price
        );

        Ok(CreatedReservation {
            reservation_id,
            price,
        })
    }

    /// Moves an active reservation into the archive
    pub async fn complete_reservation(
        &self,
        reservation_id: Uuid,
    ) -> Result<CompletedReservation, ServiceError> {
        let txn = self.db.begin().await?;

        let reservation = Self::lock_reservation(&txn, reservation_id).await?;
        let user = users::Entity::find_by_id(reservation.user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", reservation.user_id))?;

        let completed_id = self
            .archive
            .append(&txn, &reservation, &user, (self.clock)())
            .await?;
        Self::delete_reservation(&txn, reservation_id).await?;

        txn.commit().await?;

        info!("Reservation {reservation_id} completed and archived as {completed_id}");

        Ok(CompletedReservation {
            completed_id,
            reservation_id,
        })
    }

    /// Cancels an active reservation and refunds its full price
    pub async fn cancel_reservation(
        &self,
        reservation_id: Uuid,
    ) -> Result<CancelledReservation, ServiceError> {
        let txn = self.db.begin().await?;

        let reservation = Self::lock_reservation(&txn, reservation_id).await?;
        self.ledger
            .credit(&txn, reservation.user_id, reservation.price)
            .await?;
        Self::delete_reservation(&txn, reservation_id).await?;

        txn.commit().await?;

        info!(
            "Reservation {} cancelled, refunded {} to user {}",
            reservation_id, reservation.price, reservation.user_id
        );

        Ok(CancelledReservation {
            reservation_id,
            user_id: reservation.user_id,
            refunded: reservation.price,
        })
    }

    pub async fn get_reservation(
        &self,
        reservation_id: Uuid,
    ) -> Result<reservations::Model, ServiceError> {
        reservations::Entity::find_by_id(reservation_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("reservation", reservation_id))
    }

    /// Active reservations ordered by start time. An empty page is reported as not found.
    pub async fn list_reservations(
        &self,
        page: Pagination,
    ) -> Result<Vec<reservations::Model>, ServiceError> {
        let query = reservations::Entity::find()
            .order_by_asc(reservations::Column::StartTime)
            .order_by_asc(reservations::Column::Id);
        let rows = paginate(query, page).all(&self.db).await?;

        if rows.is_empty() {
            return Err(ServiceError::not_found("reservations", "requested page"));
        }

        Ok(rows)
    }

    /// Archived reservations ordered by start time. An empty page is reported as not found.
    pub async fn list_completed_reservations(
        &self,
        page: Pagination,
    ) -> Result<Vec<reservations_completed::Model>, ServiceError> {
        let rows = self.archive.list(&self.db, page).await?;

        if rows.is_empty() {
            return Err(ServiceError::not_found(
                "completed reservations",
                "requested page",
            ));
        }

        Ok(rows)
    }

    async fn lock_reservation(
        txn: &DatabaseTransaction,
        reservation_id: Uuid,
    ) -> Result<reservations::Model, ServiceError> {
        reservations::Entity::find_by_id(reservation_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("reservation", reservation_id))
    }

    async fn delete_reservation(
        txn: &DatabaseTransaction,
        reservation_id: Uuid,
    ) -> Result<(), ServiceError> {
        let deleted = reservations::Entity::delete_by_id(reservation_id)
            .exec(txn)
            .await?;

        if deleted.rows_affected != 1 {
            return Err(ServiceError::not_found("reservation", reservation_id));
        }

        Ok(())
    }
}
