use crate::{
    dtos::{
        pagination::PageParams,
        user::{
            CreateUserRequest, EmailParams, TopUpRequest, TopUpResponse, UserIdResponse,
            UserRequest, UserResponse,
        },
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
use database::services::users::UserService;
use models::pagination::Pagination;
use uuid::Uuid;

/// List users ordered by email
#[utoipa::path(
    get,
    path = "/users",
    params(PageParams),
    responses(
        (status = 200, description = "Page of users", body = [UserResponse]),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 404, description = "Nothing on this page", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let page = Pagination::try_from(params)?;
    let users = UserService::list_users(&state.db, page).await?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserService::get_user(&state.db, id).await?;
    Ok(Json(user.into()))
}

/// Register a user with an empty balance
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserIdResponse),
        (status = 400, description = "Invalid details or expired promo code", body = ErrorResponse),
        (status = 404, description = "Unknown promo code", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserIdResponse>), ApiError> {
    let user_id = UserService::create_user(
        &state.db,
        request.user.into(),
        request.promo_code.as_deref(),
        state.now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserIdResponse { user_id })))
}

/// Update name, age and phone of the user with the given email
#[utoipa::path(
    put,
    path = "/users",
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserIdResponse),
        (status = 400, description = "Invalid details", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UserRequest>,
) -> Result<Json<UserIdResponse>, ApiError> {
    let user_id = UserService::update_user(&state.db, request.into()).await?;
    Ok(Json(UserIdResponse { user_id }))
}

/// Add money to a user's prepaid balance
#[utoipa::path(
    post,
    path = "/users/top-up",
    request_body = TopUpRequest,
    responses(
        (status = 200, description = "Balance topped up", body = TopUpResponse),
        (status = 400, description = "Amount is not positive", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn top_up(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TopUpRequest>,
) -> Result<Json<TopUpResponse>, ApiError> {
    let (user_id, balance) =
        UserService::top_up(&state.db, &state.ledger, &request.email, request.amount).await?;

    Ok(Json(TopUpResponse { user_id, balance }))
}

/// Delete a user without active reservations
#[utoipa::path(
    delete,
    path = "/users",
    params(EmailParams),
    responses(
        (status = 200, description = "User deleted", body = UserIdResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "User still holds active reservations", body = ErrorResponse)
    ),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<EmailParams>,
) -> Result<Json<UserIdResponse>, ApiError> {
    let user_id = UserService::delete_user(&state.db, &params.email).await?;
    Ok(Json(UserIdResponse { user_id }))
}
