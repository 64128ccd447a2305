use crate::{
    dtos::{
        pagination::PageParams,
        reservation::{
            ArchivedReservationResponse, CancelledReservationResponse,
            CompletedReservationResponse, CreateReservationRequest, CreatedReservationResponse,
            ReservationResponse,
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
use models::pagination::Pagination;
use uuid::Uuid;

/// List active reservations ordered by start time
#[utoipa::path(
    get,
    path = "/reservations",
    params(PageParams),
    responses(
        (status = 200, description = "Page of active reservations", body = [ReservationResponse]),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 404, description = "Nothing on this page", body = ErrorResponse)
    ),
    tag = "Reservations"
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Vec<ReservationResponse>>, ApiError> {
    let page = Pagination::try_from(params)?;
    let reservations = state.engine.list_reservations(page).await?;

    Ok(Json(reservations.into_iter().map(Into::into).collect()))
}

/// Get an active reservation
#[utoipa::path(
    get,
    path = "/reservations/{id}",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation found", body = ReservationResponse),
        (status = 404, description = "No active reservation with this id", body = ErrorResponse)
    ),
    tag = "Reservations"
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ReservationResponse>, ApiError> {
    let reservation = state.engine.get_reservation(id).await?;
    Ok(Json(reservation.into()))
}

/// Book a table and charge the user's balance
#[utoipa::path(
    post,
    path = "/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = CreatedReservationResponse),
        (status = 400, description = "Invalid window or party size, or insufficient balance", body = ErrorResponse),
        (status = 404, description = "Unknown table or user", body = ErrorResponse),
        (status = 409, description = "Table already reserved for an overlapping window", body = ErrorResponse)
    ),
    tag = "Reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<CreatedReservationResponse>), ApiError> {
    let created = state.engine.create_reservation(request.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Move an active reservation into the archive
#[utoipa::path(
    post,
    path = "/reservations/{id}/complete",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation archived", body = CompletedReservationResponse),
        (status = 404, description = "No active reservation with this id", body = ErrorResponse),
        (status = 500, description = "Archive partition missing or storage fault", body = ErrorResponse)
    ),
    tag = "Reservations"
)]
pub async fn complete_reservation(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<CompletedReservationResponse>, ApiError> {
    let completed = state.engine.complete_reservation(id).await?;
    Ok(Json(completed.into()))
}

/// Cancel an active reservation and refund its price
#[utoipa::path(
    post,
    path = "/reservations/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation cancelled and refunded", body = CancelledReservationResponse),
        (status = 404, description = "No active reservation with this id", body = ErrorResponse)
    ),
    tag = "Reservations"
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<CancelledReservationResponse>, ApiError> {
    let cancelled = state.engine.cancel_reservation(id).await?;
    Ok(Json(cancelled.into()))
}

/// List archived reservations ordered by start time
#[utoipa::path(
    get,
    path = "/reservations/completed",
    params(PageParams),
    responses(
        (status = 200, description = "Page of archived reservations", body = [ArchivedReservationResponse]),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 404, description = "Nothing on this page", body = ErrorResponse)
    ),
    tag = "Reservations"
)]
pub async fn list_completed_reservations(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Vec<ArchivedReservationResponse>>, ApiError> {
    let page = Pagination::try_from(params)?;
    let archived = state.engine.list_completed_reservations(page).await?;

    Ok(Json(archived.into_iter().map(Into::into).collect()))
}
