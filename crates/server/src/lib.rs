pub mod config;
pub mod doc;
pub mod dtos;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod utils;

use crate::{
    doc::ApiDoc,
    routes::{health, promo, reservation, root, table, user},
    state::AppState,
};
use axum::{
    Router,
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the HTTP router over `state`
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .route(
            "/reservations",
            get(reservation::list_reservations).post(reservation::create_reservation),
        )
        .route(
            "/reservations/completed",
            get(reservation::list_completed_reservations),
        )
        .route("/reservations/{id}", get(reservation::get_reservation))
        .route(
            "/reservations/{id}/complete",
            post(reservation::complete_reservation),
        )
        .route(
            "/reservations/{id}/cancel",
            post(reservation::cancel_reservation),
        )
        .route(
            "/users",
            get(user::list_users)
                .post(user::create_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .route("/users/top-up", post(user::top_up))
        .route("/users/{id}", get(user::get_user))
        .route("/tables", get(table::list_tables).post(table::create_table))
        .route("/tables/{id}", get(table::get_table))
        .route("/tables/number/{number}", delete(table::delete_table))
        .route(
            "/promos",
            get(promo::list_promos)
                .post(promo::create_promo)
                .put(promo::update_promo),
        )
        .route("/promos/apply", post(promo::apply_promo))
        .route("/promos/{id}", get(promo::get_promo_by_id))
        .route(
            "/promos/code/{code}",
            get(promo::get_promo).delete(promo::delete_promo),
        )
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()))
        .with_state(state)
}
