#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use database::{
    entities::{promocodes, reservations, reservations_completed, tables, users},
    services::{
        ledger::DbBalanceLedger,
        promos::{NewPromo, PromoService},
        tables::{NewTable, TableService},
        users::{NewUser, UserService},
    },
};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::str::FromStr;
use uuid::Uuid;

/// Fixed "now" for every test: 2030-01-01 09:00
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// `hours` after [`fixed_now`]
pub fn at(hours: i64) -> NaiveDateTime {
    fixed_now() + TimeDelta::hours(hours)
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// In-memory SQLite with the schema built from the entities
pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to SQLite");

    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let statements = [
        schema.create_table_from_entity(promocodes::Entity),
        schema.create_table_from_entity(users::Entity),
        schema.create_table_from_entity(tables::Entity),
        schema.create_table_from_entity(reservations::Entity),
        schema.create_table_from_entity(reservations_completed::Entity),
    ];

    for statement in statements {
        db.execute(backend.build(&statement))
            .await
            .expect("Failed to create table");
    }

    db
}

pub fn ledger() -> DbBalanceLedger {
    DbBalanceLedger::new(fixed_now)
}

pub async fn create_table(db: &DatabaseConnection, number: i32, price: &str, seats: i16) -> Uuid {
    TableService::create_table(
        db,
        NewTable {
            table_number: number,
            price: dec(price),
            seats,
        },
    )
    .await
    .unwrap()
}

pub fn new_user(email: &str) -> NewUser {
    NewUser {
        name: "Grace".to_string(),
        age: 35,
        email: email.to_string(),
        phone: Some("88001112233".to_string()),
    }
}

/// Registers a user and funds them with `balance`
pub async fn create_user(
    db: &DatabaseConnection,
    email: &str,
    balance: &str,
    promo_code: Option<&str>,
) -> Uuid {
    let id = UserService::create_user(db, new_user(email), promo_code, fixed_now())
        .await
        .unwrap();

    let amount = dec(balance);
    if amount > Decimal::ZERO {
        UserService::top_up(db, &ledger(), email, amount)
            .await
            .unwrap();
    }

    id
}

pub async fn create_promo(db: &DatabaseConnection, code: &str, discount: i64, valid_hours: i64) -> Uuid {
    PromoService::create_promo(
        db,
        NewPromo {
            code: code.to_string(),
            expires_at: at(valid_hours),
            discount,
        },
        fixed_now(),
    )
    .await
    .unwrap()
}

pub async fn balance_of(db: &DatabaseConnection, user_id: Uuid) -> Decimal {
    UserService::get_user(db, user_id).await.unwrap().balance
}
