use chrono::NaiveDateTime;
use database::{
    entities::{reservations, reservations_completed},
    services::reservation::{
        CancelledReservation, CompletedReservation, CreatedReservation, NewReservation,
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Times are UTC wall-clock timestamps without offset, e.g. `2030-01-01T18:00:00`
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    pub seats: u16,
    pub table_id: Uuid,
    pub user_id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

impl From<CreateReservationRequest> for NewReservation {
    fn from(request: CreateReservationRequest) -> Self {
        Self {
            seats: request.seats,
            table_id: request.table_id,
            user_id: request.user_id,
            start_time: request.start_time,
            end_time: request.end_time,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedReservationResponse {
    pub reservation_id: Uuid,
    #[schema(value_type = String, example = "4000.00")]
    pub price: Decimal,
}

impl From<CreatedReservation> for CreatedReservationResponse {
    fn from(created: CreatedReservation) -> Self {
        Self {
            reservation_id: created.reservation_id,
            price: created.price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub table_id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[schema(value_type = String)]
    pub price: Decimal,
}

impl From<reservations::Model> for ReservationResponse {
    fn from(model: reservations::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            table_id: model.table_id,
            start_time: model.start_time,
            end_time: model.end_time,
            price: model.price,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompletedReservationResponse {
    pub completed_id: Uuid,
    pub reservation_id: Uuid,
}

impl From<CompletedReservation> for CompletedReservationResponse {
    fn from(completed: CompletedReservation) -> Self {
        Self {
            completed_id: completed.completed_id,
            reservation_id: completed.reservation_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CancelledReservationResponse {
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    #[schema(value_type = String)]
    pub refunded: Decimal,
}

impl From<CancelledReservation> for CancelledReservationResponse {
    fn from(cancelled: CancelledReservation) -> Self {
        Self {
            reservation_id: cancelled.reservation_id,
            user_id: cancelled.user_id,
            refunded: cancelled.refunded,
        }
    }
}

/// An archived reservation with the user's details as they were at completion
#[derive(Debug, Serialize, ToSchema)]
pub struct ArchivedReservationResponse {
    pub id: Uuid,
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    pub table_id: Uuid,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub name: String,
    pub age: i16,
    pub email: String,
    pub phone: Option<String>,
    pub promocode_id: Option<Uuid>,
    pub completed_at: NaiveDateTime,
}

impl From<reservations_completed::Model> for ArchivedReservationResponse {
    fn from(model: reservations_completed::Model) -> Self {
        Self {
            id: model.id,
            reservation_id: model.reservation_id,
            user_id: model.user_id,
            table_id: model.table_id,
            start_time: model.start_time,
            end_time: model.end_time,
            price: model.price,
            name: model.name,
            age: model.age,
            email: model.email,
            phone: model.phone,
            promocode_id: model.promocode_id,
            completed_at: model.completed_at,
        }
    }
}
