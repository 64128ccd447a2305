use crate::{
    dtos::{
        pagination::PageParams,
        table::{CreateTableRequest, DeletedTableResponse, TableIdResponse, TableResponse},
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
use database::services::tables::TableService;
use models::pagination::Pagination;
use uuid::Uuid;

/// List tables ordered by table number
#[utoipa::path(
    get,
    path = "/tables",
    params(PageParams),
    responses(
        (status = 200, description = "Page of tables", body = [TableResponse]),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 404, description = "Nothing on this page", body = ErrorResponse)
    ),
    tag = "Tables"
)]
pub async fn list_tables(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Vec<TableResponse>>, ApiError> {
    let page = Pagination::try_from(params)?;
    let tables = TableService::list_tables(&state.db, page).await?;

    Ok(Json(tables.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/tables/{id}",
    params(
        ("id" = Uuid, Path, description = "Table ID")
    ),
    responses(
        (status = 200, description = "Table found", body = TableResponse),
        (status = 404, description = "Table not found", body = ErrorResponse)
    ),
    tag = "Tables"
)]
pub async fn get_table(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<TableResponse>, ApiError> {
    let table = TableService::get_table(&state.db, id).await?;
    Ok(Json(table.into()))
}

#[utoipa::path(
    post,
    path = "/tables",
    request_body = CreateTableRequest,
    responses(
        (status = 201, description = "Table created", body = TableIdResponse),
        (status = 400, description = "Invalid number, price or seats", body = ErrorResponse),
        (status = 409, description = "Table number already taken", body = ErrorResponse)
    ),
    tag = "Tables"
)]
pub async fn create_table(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateTableRequest>,
) -> Result<(StatusCode, Json<TableIdResponse>), ApiError> {
    let table_id = TableService::create_table(&state.db, request.into()).await?;
    Ok((StatusCode::CREATED, Json(TableIdResponse { table_id })))
}

/// Delete a table, refunding its active reservations
#[utoipa::path(
    delete,
    path = "/tables/number/{number}",
    params(
        ("number" = i32, Path, description = "Table number")
    ),
    responses(
        (status = 200, description = "Table deleted", body = DeletedTableResponse),
        (status = 404, description = "Table not found", body = ErrorResponse)
    ),
    tag = "Tables"
)]
pub async fn delete_table(
    State(state): State<AppState>,
    ApiPath(number): ApiPath<i32>,
) -> Result<Json<DeletedTableResponse>, ApiError> {
    let deleted = TableService::delete_table(&state.db, &state.ledger, number).await?;
    Ok(Json(deleted.into()))
}
