use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub age: i16,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub promocode_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub balance: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::promocodes::Entity",
        from = "Column::PromocodeId",
        to = "super::promocodes::Column::Id",
        on_delete = "SetNull"
    )]
    Promocode,
    #[sea_orm(has_many = "super::reservations::Entity")]
    Reservations,
}

impl Related<super::promocodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Promocode.def()
    }
}

impl Related<super::reservations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
