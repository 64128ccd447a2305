use crate::{
    clock::{Clock, utc_now},
    entities::{promocodes, users},
    error::ServiceError,
};
use async_trait::async_trait;
use log::{debug, warn};
use models::pricing::Discount;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, EntityTrait, IntoActiveModel, QuerySelect,
};
use uuid::Uuid;

/// A user's spendable balance and the discount their promo currently grants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceInfo {
    pub balance: Decimal,
    pub discount: Discount,
}

/// Prepaid balances. Every method runs on the caller's connection or transaction.
#[async_trait]
pub trait BalanceLedger: Send + Sync {
    async fn get_balance<C>(&self, conn: &C, user_id: Uuid) -> Result<BalanceInfo, ServiceError>
    where
        C: ConnectionTrait;

    /// Fails with `InsufficientFunds` and leaves the balance untouched when `amount` exceeds it
    async fn debit<C>(&self, conn: &C, user_id: Uuid, amount: Decimal) -> Result<Decimal, ServiceError>
    where
        C: ConnectionTrait;

    /// Refund path; always succeeds for an existing user
    async fn credit<C>(&self, conn: &C, user_id: Uuid, amount: Decimal) -> Result<Decimal, ServiceError>
    where
        C: ConnectionTrait;
}

/// Ledger stored in `users.balance`, adjusted under a row lock
#[derive(Debug, Clone, Copy)]
pub struct DbBalanceLedger {
    clock: Clock,
}

impl DbBalanceLedger {
    pub fn new(clock: Clock) -> Self {
        Self { clock }
    }

    async fn lock_user<C>(conn: &C, user_id: Uuid) -> Result<users::Model, ServiceError>
    where
        C: ConnectionTrait,
    {
        users::Entity::find_by_id(user_id)
            .lock_exclusive()
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", user_id))
    }

    async fn set_balance<C>(
        conn: &C,
        user: users::Model,
        balance: Decimal,
    ) -> Result<Decimal, ServiceError>
    where
        C: ConnectionTrait,
    {
        let mut user = user.into_active_model();
        user.balance = Set(balance);
        let user = user.update(conn).await?;

        Ok(user.balance)
    }
}

impl Default for DbBalanceLedger {
    fn default() -> Self {
        Self::new(utc_now)
    }
}

fn ensure_non_negative(amount: Decimal) -> Result<(), ServiceError> {
    if amount < Decimal::ZERO {
        return Err(ServiceError::validation(format!(
            "amount must not be negative, got {amount}"
        )));
    }

    Ok(())
}

#[async_trait]
impl BalanceLedger for DbBalanceLedger {
    async fn get_balance<C>(&self, conn: &C, user_id: Uuid) -> Result<BalanceInfo, ServiceError>
    where
        C: ConnectionTrait,
    {
        let user = Self::lock_user(conn, user_id).await?;

        // Promo rows are looked up separately: FOR UPDATE cannot cover the nullable side of an outer join
        let promo = match user.promocode_id {
            Some(promo_id) => promocodes::Entity::find_by_id(promo_id).one(conn).await?,
            None => None,
        };

        let now = (self.clock)();
        let discount = match promo {
            Some(promo) if promo.expires_at <= now => {
                debug!(
                    "Promo {} of user {} expired at {}, no discount applied",
                    promo.code, user_id, promo.expires_at
                );
                Discount::NONE
            }
            Some(promo) => Discount::new(promo.discount.into()).unwrap_or_else(|err| {
                warn!("Ignoring stored promo {}: {}", promo.code, err);
                Discount::NONE
            }),
            None => Discount::NONE,
        };

        Ok(BalanceInfo {
            balance: user.balance,
            discount,
        })
    }

    async fn debit<C>(&self, conn: &C, user_id: Uuid, amount: Decimal) -> Result<Decimal, ServiceError>
    where
        C: ConnectionTrait,
    {
        ensure_non_negative(amount)?;
        let user = Self::lock_user(conn, user_id).await?;

        if user.balance < amount {
            return Err(ServiceError::InsufficientFunds {
                required: amount,
                available: user.balance,
            });
        }

        let balance = user.balance - amount;
        debug!("Debiting {amount} from user {user_id}");
        Self::set_balance(conn, user, balance).await
    }

    async fn credit<C>(&self, conn: &C, user_id: Uuid, amount: Decimal) -> Result<Decimal, ServiceError>
    where
        C: ConnectionTrait,
    {
        ensure_non_negative(amount)?;
        let user = Self::lock_user(conn, user_id).await?;

        let balance = user.balance + amount;
        debug!("Crediting {amount} to user {user_id}");
        Self::set_balance(conn, user, balance).await
    }
}
