use crate::{entities::reservations, error::ServiceError};
use log::debug;
use models::booking::BookingWindow;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

/// Overlap detection against active reservations
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailabilityChecker;

impl AvailabilityChecker {
    /// True when no active reservation on `table_id` overlaps `window`.
    ///
    /// Intervals are half-open, so a booking ending at 12:00 does not block one starting at 12:00.
    pub async fn is_available<C>(
        &self,
        conn: &C,
        table_id: Uuid,
        window: &BookingWindow,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        // Anything starting at or after our end can never overlap
        let candidates = reservations::Entity::find()
            .filter(reservations::Column::TableId.eq(table_id))
            .filter(reservations::Column::StartTime.lt(window.end()))
            .all(conn)
            .await?;

        let clash = candidates
            .iter()
            .map(|booked| BookingWindow::from_stored(booked.start_time, booked.end_time))
            .find(|booked| booked.overlaps(window));

        if let Some(booked) = clash {
            debug!("Table {table_id}: {window} overlaps booked {booked}");
        }

        Ok(clash.is_none())
    }

    /// Same as [`Self::is_available`], reporting an overlap as `Conflict`
    pub async fn ensure_available<C>(
        &self,
        conn: &C,
        table_id: Uuid,
        window: &BookingWindow,
    ) -> Result<(), ServiceError>
    where
        C: ConnectionTrait,
    {
        if self.is_available(conn, table_id, window).await? {
            return Ok(());
        }

        debug!("Table {table_id} is already booked within {window}");
        Err(ServiceError::Conflict(format!(
            "table {table_id} is already reserved for the specified time {window}"
        )))
    }
}
