use database::db::create_connection;
use log::info;
use migration::{Migrator, MigratorTrait};
use server::{app, config::Config, state::AppState, utils::shutdown::shutdown_signal};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().expect("Invalid configuration");

    let db = create_connection(
        &config.database_url,
        config.max_connections,
        config.min_connections,
    )
    .await
    .expect("Failed to connect to database");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("Failed to apply migrations");
        info!("Database schema is up to date");
    }

    let app = app(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    info!("Running axum on http://{}", config.bind_addr);
    info!("API docs at http://{}/docs", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}
