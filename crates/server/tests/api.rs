use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use chrono::{NaiveDate, NaiveDateTime};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde_json::{Value, json};
use server::{app, state::AppState};
use tower::ServiceExt;

fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    app(AppState::with_clock(db, fixed_now))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

#[tokio::test]
async fn test_health_and_docs() {
    let app = test_app().await;

    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, doc) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/reservations/{id}/complete"].is_object());
}

#[tokio::test]
async fn test_booking_flow() {
    let app = test_app().await;

    let (status, table) = send(
        &app,
        Method::POST,
        "/tables",
        Some(json!({ "table_number": 1, "price": "5000.00", "seats": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let table_id = table["table_id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::POST,
        "/promos",
        Some(json!({ "code": "SPRING20", "expires_at": "2030-02-01T00:00:00", "discount": 20 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, user) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({
            "name": "Grace",
            "age": 35,
            "email": "grace@example.com",
            "phone": null,
            "promo_code": "SPRING20"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = user["user_id"].as_str().unwrap().to_string();

    let (status, topped) = send(
        &app,
        Method::POST,
        "/users/top-up",
        Some(json!({ "email": "grace@example.com", "amount": "8000" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(topped["user_id"], user_id.as_str());

    let booking = json!({
        "seats": 2,
        "table_id": table_id,
        "user_id": user_id,
        "start_time": "2030-01-01T18:00:00",
        "end_time": "2030-01-01T20:00:00"
    });

    let (status, created) = send(&app, Method::POST, "/reservations", Some(booking.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["price"], "4000.00");
    let reservation_id = created["reservation_id"].as_str().unwrap().to_string();

    // Same table, same window, with enough money left for a second booking
    let (status, error) = send(&app, Method::POST, "/reservations", Some(booking)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error["error"].is_string());

    let (status, listed) = send(&app, Method::GET, "/reservations?limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, cancelled) = send(
        &app,
        Method::POST,
        &format!("/reservations/{reservation_id}/cancel"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let refunded: f64 = cancelled["refunded"].as_str().unwrap().parse().unwrap();
    assert_eq!(refunded, 4000.0);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/reservations/{reservation_id}/complete"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/reservations", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_request_errors() {
    let app = test_app().await;

    let (status, _) = send(&app, Method::GET, "/tables?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::GET,
        "/users/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        "/tables",
        Some(json!({ "table_number": 2, "price": "10", "seats": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_requests_render_json_errors() {
    let app = test_app().await;
    let valid_id = "00000000-0000-0000-0000-000000000000";

    let booking = |seats: Value, start: &str| {
        json!({
            "seats": seats,
            "table_id": valid_id,
            "user_id": valid_id,
            "start_time": start,
            "end_time": "2030-01-01T20:00:00"
        })
    };

    let cases = [
        (Method::GET, "/users/not-a-uuid", None, StatusCode::BAD_REQUEST),
        (Method::POST, "/reservations/42/cancel", None, StatusCode::BAD_REQUEST),
        (Method::GET, "/tables?limit=many", None, StatusCode::BAD_REQUEST),
        (
            Method::POST,
            "/reservations",
            Some(booking(json!(-1), "2030-01-01T18:00:00")),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            Method::POST,
            "/reservations",
            Some(booking(json!(2), "tomorrow evening")),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
    ];

    for (method, uri, body, expected) in cases {
        let (status, error) = send(&app, method.clone(), uri, body).await;
        assert_eq!(status, expected, "{method} {uri}");
        assert!(
            error["error"].as_str().is_some_and(|message| !message.is_empty()),
            "{method} {uri} returned {error}"
        );
    }

    // Body that is not JSON at all
    let request = Request::builder()
        .method(Method::POST)
        .uri("/tables")
        .header("content-type", "application/json")
        .body(Body::from("{ table_number: 1"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let error: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(error["error"].is_string());
}
