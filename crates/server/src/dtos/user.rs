use database::{entities::users, services::users::NewUser};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserRequest {
    pub name: String,
    pub age: i16,
    pub email: String,
    pub phone: Option<String>,
}

impl From<UserRequest> for NewUser {
    fn from(request: UserRequest) -> Self {
        Self {
            name: request.name,
            age: request.age,
            email: request.email,
            phone: request.phone,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[serde(flatten)]
    pub user: UserRequest,
    /// Optional promo code to attach at registration
    pub promo_code: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TopUpRequest {
    pub email: String,
    #[schema(value_type = String, example = "5000.00")]
    pub amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopUpResponse {
    pub user_id: Uuid,
    #[schema(value_type = String)]
    pub balance: Decimal,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailParams {
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub age: i16,
    pub email: String,
    pub phone: Option<String>,
    pub promocode_id: Option<Uuid>,
    #[schema(value_type = String)]
    pub balance: Decimal,
}

impl From<users::Model> for UserResponse {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            age: model.age,
            email: model.email,
            phone: model.phone,
            promocode_id: model.promocode_id,
            balance: model.balance,
        }
    }
}

/// Id of the user a write was applied to
#[derive(Debug, Serialize, ToSchema)]
pub struct UserIdResponse {
    pub user_id: Uuid,
}
