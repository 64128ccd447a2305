use chrono::NaiveDateTime;
use database::{entities::promocodes, services::promos::NewPromo};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PromoRequest {
    pub code: String,
    /// UTC, at least 10 minutes from now
    pub expires_at: NaiveDateTime,
    /// Percent off, 1 to 99
    pub discount: i64,
}

impl From<PromoRequest> for NewPromo {
    fn from(request: PromoRequest) -> Self {
        Self {
            code: request.code,
            expires_at: request.expires_at,
            discount: request.discount,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyPromoRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromoResponse {
    pub id: Uuid,
    pub code: String,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
    pub discount: i16,
}

impl From<promocodes::Model> for PromoResponse {
    fn from(model: promocodes::Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            created_at: model.created_at,
            expires_at: model.expires_at,
            discount: model.discount,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromoRefResponse {
    pub id: Uuid,
    pub expires_at: NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PromoIdResponse {
    pub promo_id: Uuid,
}
