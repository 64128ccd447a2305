use sea_orm_migration::{prelude::*, sea_orm::DatabaseBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Partitioned parent. Monthly partitions are created out of band by `provision-partitions`.
const CREATE_PARTITIONED: &str = r#"
CREATE TABLE IF NOT EXISTS "reservations_completed" (
    "id" uuid NOT NULL,
    "reservation_id" uuid NOT NULL,
    "user_id" uuid NOT NULL,
    "table_id" uuid NOT NULL,
    "start_time" timestamp NOT NULL,
    "end_time" timestamp NOT NULL,
    "price" numeric(15, 2) NOT NULL,
    "name" varchar(100) NOT NULL,
    "age" smallint NOT NULL,
    "email" varchar(100) NOT NULL,
    "phone" varchar(20),
    "promocode_id" uuid,
    "completed_at" timestamp NOT NULL,
    PRIMARY KEY ("id", "start_time")
) PARTITION BY RANGE ("start_time")
"#;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Range partitioning is PostgreSQL only; other backends get a plain table
        if manager.get_database_backend() == DatabaseBackend::Postgres {
            manager
                .get_connection()
                .execute_unprepared(CREATE_PARTITIONED)
                .await?;

            return Ok(());
        }

        manager
            .create_table(
                Table::create()
                    .table(ReservationsCompleted::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ReservationsCompleted::Id).uuid().not_null())
                    .col(
                        ColumnDef::new(ReservationsCompleted::ReservationId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationsCompleted::UserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationsCompleted::TableId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationsCompleted::StartTime)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationsCompleted::EndTime)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationsCompleted::Price)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationsCompleted::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationsCompleted::Age)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationsCompleted::Email)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReservationsCompleted::Phone).string_len(20))
                    .col(ColumnDef::new(ReservationsCompleted::PromocodeId).uuid())
                    .col(
                        ColumnDef::new(ReservationsCompleted::CompletedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ReservationsCompleted::Id)
                            .col(ReservationsCompleted::StartTime),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Dropping the parent drops every partition with it
        manager
            .drop_table(
                Table::drop()
                    .table(ReservationsCompleted::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum ReservationsCompleted {
    Table,
    Id,
    ReservationId,
    UserId,
    TableId,
    StartTime,
    EndTime,
    Price,
    Name,
    Age,
    Email,
    Phone,
    PromocodeId,
    CompletedAt,
}
