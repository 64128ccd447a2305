use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create promocodes table
        manager
            .create_table(
                Table::create()
                    .table(Promocodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Promocodes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Promocodes::Code)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Promocodes::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Promocodes::ExpiresAt).timestamp().not_null())
                    .col(
                        ColumnDef::new(Promocodes::Discount)
                            .small_integer()
                            .not_null()
                            .check(Expr::col(Promocodes::Discount).between(1, 99)),
                    )
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Users::Age).small_integer().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Phone).string_len(20))
                    .col(ColumnDef::new(Users::PromocodeId).uuid())
                    .col(
                        ColumnDef::new(Users::Balance)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0)
                            .check(Expr::col(Users::Balance).gte(0)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-users-promocode_id")
                            .from(Users::Table, Users::PromocodeId)
                            .to(Promocodes::Table, Promocodes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create tables table
        manager
            .create_table(
                Table::create()
                    .table(Tables::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tables::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Tables::TableNumber)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Tables::Price)
                            .decimal_len(15, 2)
                            .not_null()
                            .check(Expr::col(Tables::Price).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Tables::Seats)
                            .small_integer()
                            .not_null()
                            .check(Expr::col(Tables::Seats).between(1, 6)),
                    )
                    .to_owned(),
            )
            .await?;

        // Create reservations table
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::UserId).uuid().not_null())
                    .col(ColumnDef::new(Reservations::TableId).uuid().not_null())
                    .col(
                        ColumnDef::new(Reservations::StartTime)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Reservations::EndTime).timestamp().not_null())
                    .col(
                        ColumnDef::new(Reservations::Price)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .check(
                        Expr::col(Reservations::StartTime).lt(Expr::col(Reservations::EndTime)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reservations-user_id")
                            .from(Reservations::Table, Reservations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reservations-table_id")
                            .from(Reservations::Table, Reservations::TableId)
                            .to(Tables::Table, Tables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tables::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Promocodes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum Promocodes {
    Table,
    Id,
    Code,
    CreatedAt,
    ExpiresAt,
    Discount,
}

#[derive(Iden)]
pub(crate) enum Users {
    Table,
    Id,
    Name,
    Age,
    Email,
    Phone,
    PromocodeId,
    Balance,
}

#[derive(Iden)]
pub(crate) enum Tables {
    Table,
    Id,
    TableNumber,
    Price,
    Seats,
}

#[derive(Iden)]
pub(crate) enum Reservations {
    Table,
    Id,
    UserId,
    TableId,
    StartTime,
    EndTime,
    Price,
}
