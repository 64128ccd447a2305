use crate::{
    entities::{reservations, reservations_completed, users},
    error::ServiceError,
    services::paginate,
};
use chrono::NaiveDateTime;
use log::{error, info};
use models::{archive_month::ArchiveMonth, pagination::Pagination};
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, DatabaseBackend, DbErr, EntityTrait, QueryOrder,
};
use uuid::Uuid;

/// Append-only store of completed reservations.
///
/// On PostgreSQL the parent table is range-partitioned by calendar month of `start_time`.
/// Partitions are created ahead of time by [`ArchiveStore::provision_partitions`]; a write that lands
/// outside every partition is reported as [`ServiceError::MissingPartition`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveStore;

impl ArchiveStore {
    pub const PARENT_TABLE: &'static str = "reservations_completed";

    /// Archives `reservation` together with its owner's current details and returns the record id
    pub async fn append<C>(
        &self,
        conn: &C,
        reservation: &reservations::Model,
        user: &users::Model,
        completed_at: NaiveDateTime,
    ) -> Result<Uuid, ServiceError>
    where
        C: ConnectionTrait,
    {
        let id = Uuid::new_v4();
        let record = reservations_completed::ActiveModel {
            id: Set(id),
            start_time: Set(reservation.start_time),
            reservation_id: Set(reservation.id),
            user_id: Set(reservation.user_id),
            table_id: Set(reservation.table_id),
            end_time: Set(reservation.end_time),
            price: Set(reservation.price),
            name: Set(user.name.clone()),
            age: Set(user.age),
            email: Set(user.email.clone()),
            phone: Set(user.phone.clone()),
            promocode_id: Set(user.promocode_id),
            completed_at: Set(completed_at),
        };

        match reservations_completed::Entity::insert(record)
            .exec_without_returning(conn)
            .await
        {
            Ok(_) => Ok(id),
            Err(err) if is_missing_partition(&err) => {
                let month = ArchiveMonth::containing(reservation.start_time);
                error!(
                    "Archive partition {} is not provisioned; run provision-partitions",
                    month.partition_name(Self::PARENT_TABLE)
                );
                Err(ServiceError::MissingPartition { month })
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn list<C>(
        &self,
        conn: &C,
        page: Pagination,
    ) -> Result<Vec<reservations_completed::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let query = reservations_completed::Entity::find()
            .order_by_asc(reservations_completed::Column::StartTime)
            .order_by_asc(reservations_completed::Column::Id);

        paginate(query, page).all(conn).await
    }

    /// Creates the monthly partitions for `months` consecutive months starting at `first`.
    ///
    /// Idempotent. Only PostgreSQL partitions the archive; other backends are left untouched and
    /// an empty list is returned.
    pub async fn provision_partitions<C>(
        conn: &C,
        first: ArchiveMonth,
        months: u32,
    ) -> Result<Vec<String>, DbErr>
    where
        C: ConnectionTrait,
    {
        if conn.get_database_backend() != DatabaseBackend::Postgres {
            info!("Archive partitioning is PostgreSQL only, nothing to provision");
            return Ok(Vec::new());
        }

        let mut provisioned = Vec::with_capacity(months as usize);
        for month in first.range(months) {
            let partition = month.partition_name(Self::PARENT_TABLE);
            conn.execute_unprepared(&partition_ddl(&partition, month))
                .await?;

            info!("Provisioned archive partition {partition} for {month}");
            provisioned.push(partition);
        }

        Ok(provisioned)
    }
}

fn partition_ddl(partition: &str, month: ArchiveMonth) -> String {
    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    // The last month chrono can represent is left open-ended
    let to = match month.end() {
        Some(end) => format!("'{}'", end.format(FORMAT)),
        None => "MAXVALUE".to_string(),
    };

    format!(
        r#"CREATE TABLE IF NOT EXISTS "{partition}" PARTITION OF "{parent}" FOR VALUES FROM ('{from}') TO ({to})"#,
        parent = ArchiveStore::PARENT_TABLE,
        from = month.start().format(FORMAT),
    )
}

/// PostgreSQL reports a row routed to no partition as `no partition of relation "..." found for row`
fn is_missing_partition(err: &DbErr) -> bool {
    err.to_string().contains("no partition of relation")
}
