use database::{
    entities::tables,
    services::tables::{DeletedTable, NewTable},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTableRequest {
    pub table_number: i32,
    #[schema(value_type = String, example = "5000.00")]
    pub price: Decimal,
    pub seats: i16,
}

impl From<CreateTableRequest> for NewTable {
    fn from(request: CreateTableRequest) -> Self {
        Self {
            table_number: request.table_number,
            price: request.price,
            seats: request.seats,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableResponse {
    pub id: Uuid,
    pub table_number: i32,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub seats: i16,
}

impl From<tables::Model> for TableResponse {
    fn from(model: tables::Model) -> Self {
        Self {
            id: model.id,
            table_number: model.table_number,
            price: model.price,
            seats: model.seats,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableIdResponse {
    pub table_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedTableResponse {
    pub table_id: Uuid,
    pub refunded_reservations: usize,
}

impl From<DeletedTable> for DeletedTableResponse {
    fn from(deleted: DeletedTable) -> Self {
        Self {
            table_id: deleted.table_id,
            refunded_reservations: deleted.refunded_reservations,
        }
    }
}
