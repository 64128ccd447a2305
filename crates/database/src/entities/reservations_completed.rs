use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Archived reservation with the user's identity as it was at completion.
///
/// Keyed by `(id, start_time)` so PostgreSQL can range-partition on `start_time`.
/// Rows carry no foreign keys: they must outlive the users and tables they mention.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations_completed")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub start_time: DateTime,
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    pub table_id: Uuid,
    pub end_time: DateTime,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub price: Decimal,
    pub name: String,
    pub age: i16,
    pub email: String,
    pub phone: Option<String>,
    pub promocode_id: Option<Uuid>,
    pub completed_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
