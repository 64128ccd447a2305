use crate::routes::{health, promo, reservation, root, table, user};
use utoipa::OpenApi;

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        reservation::list_reservations,
        reservation::get_reservation,
        reservation::create_reservation,
        reservation::complete_reservation,
        reservation::cancel_reservation,
        reservation::list_completed_reservations,
        user::list_users,
        user::get_user,
        user::create_user,
        user::update_user,
        user::top_up,
        user::delete_user,
        table::list_tables,
        table::get_table,
        table::create_table,
        table::delete_table,
        promo::list_promos,
        promo::get_promo_by_id,
        promo::get_promo,
        promo::create_promo,
        promo::update_promo,
        promo::apply_promo,
        promo::delete_promo
    ),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Reservations", description = "Booking, completion and cancellation of table reservations"),
        (name = "Users", description = "Accounts and prepaid balances"),
        (name = "Tables", description = "Venue table catalog"),
        (name = "Promos", description = "Percentage discount codes"),
    ),
    info(
        title = "Venue Reservations API",
        version = "1.0.0",
        description = "Seat reservations with prepaid balances and an archive of completed bookings",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
