use sea_orm_migration::prelude::*;

use crate::m20250801_create_all_tables::{Reservations, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Overlap check filters by table and compares both window bounds
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_table_window")
                    .table(Reservations::Table)
                    .col(Reservations::TableId)
                    .col(Reservations::StartTime)
                    .col(Reservations::EndTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_user_id")
                    .table(Reservations::Table)
                    .col(Reservations::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_promocode_id")
                    .table(Users::Table)
                    .col(Users::PromocodeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_users_promocode_id")
                    .table(Users::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_reservations_user_id")
                    .table(Reservations::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_reservations_table_window")
                    .table(Reservations::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
