//! Booking lifecycle tests against in-memory SQLite.
//!
//! Run with: cargo test -p database --test reservations

mod common;

use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeDelta};
use common::*;
use database::{
    ServiceError,
    entities::{reservations, reservations_completed},
    services::{
        catalog::DbTableCatalog,
        ledger::{BalanceInfo, BalanceLedger, DbBalanceLedger},
        reservation::{NewReservation, ReservationEngine},
        users::UserService,
    },
};
use models::pagination::Pagination;
use rust_decimal::Decimal;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
};
use uuid::Uuid;

fn engine(db: &DatabaseConnection) -> ReservationEngine {
    ReservationEngine::new(db.clone(), DbTableCatalog, ledger(), fixed_now)
}

fn booking(table_id: Uuid, user_id: Uuid, start: NaiveDateTime, end: NaiveDateTime) -> NewReservation {
    NewReservation {
        seats: 2,
        table_id,
        user_id,
        start_time: start,
        end_time: end,
    }
}

async fn active_count(db: &DatabaseConnection) -> u64 {
    reservations::Entity::find().count(db).await.unwrap()
}

async fn archived_count(db: &DatabaseConnection) -> u64 {
    reservations_completed::Entity::find().count(db).await.unwrap()
}

#[tokio::test]
async fn test_discounted_booking_debits_and_cancel_refunds() {
    let db = setup().await;
    create_promo(&db, "SPRING20", 20, 24 * 30).await;
    let table_id = create_table(&db, 1, "5000", 4).await;
    let user_id = create_user(&db, "grace@example.com", "4000.00", Some("SPRING20")).await;
    let engine = engine(&db);

    let created = engine
        .create_reservation(booking(table_id, user_id, at(1), at(3)))
        .await
        .unwrap();

    assert_eq!(created.price, dec("4000.00"));
    assert_eq!(balance_of(&db, user_id).await, dec("0.00"));

    let stored = engine.get_reservation(created.reservation_id).await.unwrap();
    assert_eq!(stored.price, dec("4000.00"));
    assert_eq!(stored.table_id, table_id);

    let cancelled = engine
        .cancel_reservation(created.reservation_id)
        .await
        .unwrap();

    assert_eq!(cancelled.user_id, user_id);
    assert_eq!(cancelled.refunded, dec("4000.00"));
    assert_eq!(balance_of(&db, user_id).await, dec("4000.00"));
    assert_eq!(active_count(&db).await, 0);

    // A cancelled reservation is gone for good
    let again = engine.cancel_reservation(created.reservation_id).await;
    assert!(matches!(again, Err(ServiceError::NotFound { .. })));
    assert_eq!(balance_of(&db, user_id).await, dec("4000.00"));
}

#[tokio::test]
async fn test_insufficient_funds_leaves_no_trace() {
    let db = setup().await;
    let table_id = create_table(&db, 1, "5000", 4).await;
    let user_id = create_user(&db, "poor@example.com", "4999.00", None).await;

    let result = engine(&db)
        .create_reservation(booking(table_id, user_id, at(1), at(3)))
        .await;

    match result {
        Err(ServiceError::InsufficientFunds {
            required,
            available,
        }) => {
            assert_eq!(required, dec("5000"));
            assert_eq!(available, dec("4999"));
        }
        other => panic!("expected InsufficientFunds, got {other:?}"),
    }

    assert_eq!(balance_of(&db, user_id).await, dec("4999.00"));
    assert_eq!(active_count(&db).await, 0);
}

#[tokio::test]
async fn test_touching_windows_do_not_conflict() {
    let db = setup().await;
    let table_id = create_table(&db, 1, "100", 4).await;
    let user_id = create_user(&db, "a@example.com", "1000", None).await;
    let engine = engine(&db);

    engine
        .create_reservation(booking(table_id, user_id, at(1), at(3)))
        .await
        .unwrap();
    engine
        .create_reservation(booking(table_id, user_id, at(3), at(5)))
        .await
        .unwrap();

    assert_eq!(active_count(&db).await, 2);
    assert_eq!(balance_of(&db, user_id).await, dec("800"));
}

#[tokio::test]
async fn test_overlapping_windows_conflict() {
    let db = setup().await;
    let table_id = create_table(&db, 1, "100", 4).await;
    let other_table = create_table(&db, 2, "100", 4).await;
    let first = create_user(&db, "a@example.com", "1000", None).await;
    let second = create_user(&db, "b@example.com", "1000", None).await;
    let engine = engine(&db);

    engine
        .create_reservation(booking(table_id, first, at(2), at(4)))
        .await
        .unwrap();

    let overlaps = [(at(1), at(3)), (at(3), at(5)), (at(2), at(4)), (at(1), at(6))];
    for (start, end) in overlaps {
        let result = engine
            .create_reservation(booking(table_id, second, start, end))
            .await;
        assert!(
            matches!(result, Err(ServiceError::Conflict(_))),
            "expected conflict for {start} - {end}, got {result:?}"
        );
    }

    // The same window on another table is fine
    engine
        .create_reservation(booking(other_table, second, at(2), at(4)))
        .await
        .unwrap();

    assert_eq!(balance_of(&db, second).await, dec("900"));
    assert_eq!(active_count(&db).await, 2);
}

#[tokio::test]
async fn test_minimum_duration_is_strictly_more_than_an_hour() {
    let db = setup().await;
    let table_id = create_table(&db, 1, "100", 4).await;
    let user_id = create_user(&db, "a@example.com", "1000", None).await;
    let engine = engine(&db);

    let exactly_one_hour = engine
        .create_reservation(booking(table_id, user_id, at(1), at(2)))
        .await;
    assert!(matches!(exactly_one_hour, Err(ServiceError::Validation(_))));

    engine
        .create_reservation(booking(
            table_id,
            user_id,
            at(1),
            at(2) + TimeDelta::minutes(1),
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_request_validation() {
    let db = setup().await;
    let table_id = create_table(&db, 1, "100", 4).await;
    let user_id = create_user(&db, "a@example.com", "1000", None).await;
    let engine = engine(&db);

    let in_the_past = engine
        .create_reservation(booking(table_id, user_id, at(-1), at(2)))
        .await;
    assert!(matches!(in_the_past, Err(ServiceError::Validation(_))));

    let inverted = engine
        .create_reservation(booking(table_id, user_id, at(3), at(1)))
        .await;
    assert!(matches!(inverted, Err(ServiceError::Validation(_))));

    let crowded = engine
        .create_reservation(NewReservation {
            seats: 5,
            ..booking(table_id, user_id, at(1), at(3))
        })
        .await;
    match crowded {
        Err(ServiceError::Validation(message)) => {
            assert_eq!(message, "this table only seats 4")
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let unknown_table = engine
        .create_reservation(booking(Uuid::new_v4(), user_id, at(1), at(3)))
        .await;
    assert!(matches!(
        unknown_table,
        Err(ServiceError::NotFound { entity: "table", .. })
    ));

    let unknown_user = engine
        .create_reservation(booking(table_id, Uuid::new_v4(), at(1), at(3)))
        .await;
    assert!(matches!(
        unknown_user,
        Err(ServiceError::NotFound { entity: "user", .. })
    ));

    assert_eq!(active_count(&db).await, 0);
    assert_eq!(balance_of(&db, user_id).await, dec("1000"));
}

#[tokio::test]
async fn test_complete_archives_user_snapshot() {
    let db = setup().await;
    let promo_id = create_promo(&db, "VIP", 10, 24 * 30).await;
    let table_id = create_table(&db, 7, "250", 2).await;
    let user_id = create_user(&db, "ada@example.com", "1000", Some("VIP")).await;
    let engine = engine(&db);

    let created = engine
        .create_reservation(booking(table_id, user_id, at(1), at(3)))
        .await
        .unwrap();
    assert_eq!(created.price, dec("225.00"));

    // Details changed after booking must show up in the archive
    UserService::update_user(
        &db,
        database::services::users::NewUser {
            name: "Ada Lovelace".to_string(),
            age: 36,
            email: "ada@example.com".to_string(),
            phone: None,
        },
    )
    .await
    .unwrap();

    let completed = engine
        .complete_reservation(created.reservation_id)
        .await
        .unwrap();
    assert_eq!(completed.reservation_id, created.reservation_id);

    assert_eq!(active_count(&db).await, 0);
    assert_eq!(archived_count(&db).await, 1);

    let archived = engine
        .list_completed_reservations(Pagination::default())
        .await
        .unwrap();
    let record = &archived[0];
    assert_eq!(record.id, completed.completed_id);
    assert_eq!(record.reservation_id, created.reservation_id);
    assert_eq!(record.user_id, user_id);
    assert_eq!(record.table_id, table_id);
    assert_eq!(record.start_time, at(1));
    assert_eq!(record.end_time, at(3));
    assert_eq!(record.price, dec("225.00"));
    assert_eq!(record.name, "Ada Lovelace");
    assert_eq!(record.age, 36);
    assert_eq!(record.email, "ada@example.com");
    assert_eq!(record.phone, None);
    assert_eq!(record.promocode_id, Some(promo_id));
    assert_eq!(record.completed_at, fixed_now());

    // Completion is not a refund
    assert_eq!(balance_of(&db, user_id).await, dec("775"));

    let again = engine.complete_reservation(created.reservation_id).await;
    assert!(matches!(again, Err(ServiceError::NotFound { .. })));
    assert_eq!(archived_count(&db).await, 1);
}

#[tokio::test]
async fn test_expired_promo_gives_no_discount() {
    fn two_hours_later() -> NaiveDateTime {
        at(2)
    }

    let db = setup().await;
    create_promo(&db, "SHORT", 50, 1).await;
    let table_id = create_table(&db, 1, "100", 4).await;
    let user_id = create_user(&db, "a@example.com", "100", Some("SHORT")).await;

    let engine = ReservationEngine::new(
        db.clone(),
        DbTableCatalog,
        DbBalanceLedger::new(two_hours_later),
        two_hours_later,
    );

    let created = engine
        .create_reservation(booking(table_id, user_id, at(3), at(5)))
        .await
        .unwrap();

    assert_eq!(created.price, dec("100.00"));
    assert_eq!(balance_of(&db, user_id).await, dec("0"));
}

#[tokio::test]
async fn test_list_reservations_pages() {
    let db = setup().await;
    let table_id = create_table(&db, 1, "10", 4).await;
    let user_id = create_user(&db, "a@example.com", "100", None).await;
    let engine = engine(&db);

    let empty = engine.list_reservations(Pagination::default()).await;
    assert!(matches!(empty, Err(ServiceError::NotFound { .. })));

    for hour in [7, 1, 4] {
        engine
            .create_reservation(booking(table_id, user_id, at(hour), at(hour + 2)))
            .await
            .unwrap();
    }

    let first_page = engine
        .list_reservations(Pagination::new(2, 0).unwrap())
        .await
        .unwrap();
    let starts: Vec<_> = first_page.iter().map(|r| r.start_time).collect();
    assert_eq!(starts, vec![at(1), at(4)]);

    let second_page = engine
        .list_reservations(Pagination::new(2, 2).unwrap())
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].start_time, at(7));
}

/// Ledger whose debit always fails, to observe rollback of the reservation insert
struct FailingDebitLedger(DbBalanceLedger);

#[async_trait]
impl BalanceLedger for FailingDebitLedger {
    async fn get_balance<C>(&self, conn: &C, user_id: Uuid) -> Result<BalanceInfo, ServiceError>
    where
        C: ConnectionTrait,
    {
        self.0.get_balance(conn, user_id).await
    }

    async fn debit<C>(&self, _conn: &C, _user_id: Uuid, _amount: Decimal) -> Result<Decimal, ServiceError>
    where
        C: ConnectionTrait,
    {
        Err(ServiceError::Storage(DbErr::Custom(
            "connection reset during debit".to_string(),
        )))
    }

    async fn credit<C>(&self, conn: &C, user_id: Uuid, amount: Decimal) -> Result<Decimal, ServiceError>
    where
        C: ConnectionTrait,
    {
        self.0.credit(conn, user_id, amount).await
    }
}

#[tokio::test]
async fn test_fault_after_insert_rolls_back() {
    let db = setup().await;
    let table_id = create_table(&db, 1, "100", 4).await;
    let user_id = create_user(&db, "a@example.com", "500", None).await;

    let engine = ReservationEngine::new(
        db.clone(),
        DbTableCatalog,
        FailingDebitLedger(ledger()),
        fixed_now,
    );

    let result = engine
        .create_reservation(booking(table_id, user_id, at(1), at(3)))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, ServiceError::Storage(_)));
    assert_eq!(err.class(), database::ErrorClass::Server);

    assert_eq!(active_count(&db).await, 0);
    assert_eq!(balance_of(&db, user_id).await, dec("500"));
}
