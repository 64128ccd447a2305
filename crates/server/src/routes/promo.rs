use crate::{
    dtos::{
        pagination::PageParams,
        promo::{ApplyPromoRequest, PromoIdResponse, PromoRefResponse, PromoRequest, PromoResponse},
        user::UserIdResponse,
    },
    error::{ApiError, ErrorResponse},
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use database::services::promos::PromoService;
use models::pagination::Pagination;
use uuid::Uuid;

/// List promo codes ordered by code
#[utoipa::path(
    get,
    path = "/promos",
    params(PageParams),
    responses(
        (status = 200, description = "Page of promo codes", body = [PromoResponse]),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 404, description = "Nothing on this page", body = ErrorResponse)
    ),
    tag = "Promos"
)]
pub async fn list_promos(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Vec<PromoResponse>>, ApiError> {
    let page = Pagination::try_from(params)?;
    let promos = PromoService::list_promos(&state.db, page).await?;

    Ok(Json(promos.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/promos/{id}",
    params(
        ("id" = Uuid, Path, description = "Promo code ID")
    ),
    responses(
        (status = 200, description = "Promo code found", body = PromoResponse),
        (status = 404, description = "Promo code not found", body = ErrorResponse)
    ),
    tag = "Promos"
)]
pub async fn get_promo_by_id(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PromoResponse>, ApiError> {
    let promo = PromoService::get_promo_by_id(&state.db, id).await?;
    Ok(Json(promo.into()))
}

/// Look a promo code up by its text
#[utoipa::path(
    get,
    path = "/promos/code/{code}",
    params(
        ("code" = String, Path, description = "Promo code")
    ),
    responses(
        (status = 200, description = "Promo code found", body = PromoRefResponse),
        (status = 404, description = "Promo code not found", body = ErrorResponse)
    ),
    tag = "Promos"
)]
pub async fn get_promo(
    State(state): State<AppState>,
    ApiPath(code): ApiPath<String>,
) -> Result<Json<PromoRefResponse>, ApiError> {
    let promo = PromoService::get_promo(&state.db, &code).await?;

    Ok(Json(PromoRefResponse {
        id: promo.id,
        expires_at: promo.expires_at,
    }))
}

#[utoipa::path(
    post,
    path = "/promos",
    request_body = PromoRequest,
    responses(
        (status = 201, description = "Promo code created", body = PromoIdResponse),
        (status = 400, description = "Invalid code, discount or expiry", body = ErrorResponse),
        (status = 409, description = "Code already exists", body = ErrorResponse)
    ),
    tag = "Promos"
)]
pub async fn create_promo(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PromoRequest>,
) -> Result<(StatusCode, Json<PromoIdResponse>), ApiError> {
    let promo_id = PromoService::create_promo(&state.db, request.into(), state.now()).await?;
    Ok((StatusCode::CREATED, Json(PromoIdResponse { promo_id })))
}

/// Replace the discount and expiry of an existing code
#[utoipa::path(
    put,
    path = "/promos",
    request_body = PromoRequest,
    responses(
        (status = 200, description = "Promo code updated", body = PromoIdResponse),
        (status = 400, description = "Invalid discount or expiry", body = ErrorResponse),
        (status = 404, description = "Promo code not found", body = ErrorResponse)
    ),
    tag = "Promos"
)]
pub async fn update_promo(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PromoRequest>,
) -> Result<Json<PromoIdResponse>, ApiError> {
    let promo_id = PromoService::update_promo(&state.db, request.into(), state.now()).await?;
    Ok(Json(PromoIdResponse { promo_id }))
}

/// Attach a promo code to a user
#[utoipa::path(
    post,
    path = "/promos/apply",
    request_body = ApplyPromoRequest,
    responses(
        (status = 200, description = "Promo code applied", body = UserIdResponse),
        (status = 400, description = "Promo code expired", body = ErrorResponse),
        (status = 404, description = "Unknown user or promo code", body = ErrorResponse)
    ),
    tag = "Promos"
)]
pub async fn apply_promo(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ApplyPromoRequest>,
) -> Result<Json<UserIdResponse>, ApiError> {
    let user_id =
        PromoService::apply_promo(&state.db, &request.email, &request.code, state.now()).await?;
    Ok(Json(UserIdResponse { user_id }))
}

#[utoipa::path(
    delete,
    path = "/promos/code/{code}",
    params(
        ("code" = String, Path, description = "Promo code")
    ),
    responses(
        (status = 200, description = "Promo code deleted", body = PromoIdResponse),
        (status = 404, description = "Promo code not found", body = ErrorResponse)
    ),
    tag = "Promos"
)]
pub async fn delete_promo(
    State(state): State<AppState>,
    ApiPath(code): ApiPath<String>,
) -> Result<Json<PromoIdResponse>, ApiError> {
    let promo_id = PromoService::delete_promo(&state.db, &code).await?;
    Ok(Json(PromoIdResponse { promo_id }))
}
