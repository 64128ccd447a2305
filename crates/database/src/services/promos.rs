use crate::{
    entities::{promocodes, users},
    error::ServiceError,
    services::paginate,
};
use chrono::{NaiveDateTime, TimeDelta};
use log::info;
use models::{pagination::Pagination, pricing::Discount};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

/// Longest accepted promo code
pub const MAX_CODE_LEN: usize = 10;

/// A promo code as submitted for creation or update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPromo {
    pub code: String,
    pub expires_at: NaiveDateTime,
    pub discount: i64,
}

/// Result of looking a promo up by code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromoRef {
    pub id: Uuid,
    pub expires_at: NaiveDateTime,
}

/// Codes must stay valid for at least this long after they are written
fn min_lifetime() -> TimeDelta {
    TimeDelta::minutes(10)
}

/// A promo is usable strictly before its expiry
pub fn ensure_not_expired(
    code: &str,
    expires_at: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<(), ServiceError> {
    if now >= expires_at {
        return Err(ServiceError::Expired {
            code: code.to_string(),
            expires_at,
        });
    }

    Ok(())
}

impl NewPromo {
    fn validate(&self, now: NaiveDateTime) -> Result<Discount, ServiceError> {
        let len = self.code.chars().count();
        if len == 0 || len > MAX_CODE_LEN {
            return Err(ServiceError::validation(format!(
                "promo code must be 1 to {MAX_CODE_LEN} characters"
            )));
        }

        if self.expires_at <= now + min_lifetime() {
            return Err(ServiceError::validation(
                "the promo code expires too soon, it must stay valid for at least 10 minutes",
            ));
        }

        Ok(Discount::new(self.discount)?)
    }
}

pub struct PromoService;

impl PromoService {
    pub async fn list_promos(
        db: &DatabaseConnection,
        page: Pagination,
    ) -> Result<Vec<promocodes::Model>, ServiceError> {
        let query = promocodes::Entity::find().order_by_asc(promocodes::Column::Code);
        let promos = paginate(query, page).all(db).await?;

        if promos.is_empty() {
            return Err(ServiceError::not_found("promocodes", "requested page"));
        }

        Ok(promos)
    }

    pub async fn get_promo_by_id(
        db: &DatabaseConnection,
        promo_id: Uuid,
    ) -> Result<promocodes::Model, ServiceError> {
        promocodes::Entity::find_by_id(promo_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("promocode", promo_id))
    }

    /// Looks a code up, returning its id and expiry
    pub async fn get_promo<C>(conn: &C, code: &str) -> Result<PromoRef, ServiceError>
    where
        C: ConnectionTrait,
    {
        let promo = Self::find_by_code(conn, code).await?;

        Ok(PromoRef {
            id: promo.id,
            expires_at: promo.expires_at,
        })
    }

    pub async fn create_promo(
        db: &DatabaseConnection,
        promo: NewPromo,
        now: NaiveDateTime,
    ) -> Result<Uuid, ServiceError> {
        let discount = promo.validate(now)?;

        let id = Uuid::new_v4();
        promocodes::ActiveModel {
            id: Set(id),
            code: Set(promo.code.clone()),
            created_at: Set(now),
            expires_at: Set(promo.expires_at),
            discount: Set(discount.percent().into()),
        }
        .insert(db)
        .await?;

        info!(
            "Promo {} created: {}% until {}",
            promo.code,
            discount.percent(),
            promo.expires_at
        );
        Ok(id)
    }

    /// Replaces the expiry and discount of an existing code
    pub async fn update_promo(
        db: &DatabaseConnection,
        promo: NewPromo,
        now: NaiveDateTime,
    ) -> Result<Uuid, ServiceError> {
        let discount = promo.validate(now)?;

        let existing = Self::find_by_code(db, &promo.code).await?;
        let mut active = existing.into_active_model();
        active.created_at = Set(now);
        active.expires_at = Set(promo.expires_at);
        active.discount = Set(discount.percent().into());
        let updated = active.update(db).await?;

        Ok(updated.id)
    }

    /// Attaches a code to the user with `email`. The code must not be expired at this moment.
    pub async fn apply_promo(
        db: &DatabaseConnection,
        email: &str,
        code: &str,
        now: NaiveDateTime,
    ) -> Result<Uuid, ServiceError> {
        let txn = db.begin().await?;

        let promo = Self::get_promo(&txn, code).await?;
        ensure_not_expired(code, promo.expires_at, now)?;

        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", email))?;

        let mut active = user.into_active_model();
        active.promocode_id = Set(Some(promo.id));
        let user = active.update(&txn).await?;

        txn.commit().await?;

        info!("Promo {code} applied to user {}", user.id);
        Ok(user.id)
    }

    /// Users holding the code fall back to no discount
    pub async fn delete_promo(db: &DatabaseConnection, code: &str) -> Result<Uuid, ServiceError> {
        let promo = Self::find_by_code(db, code).await?;
        promocodes::Entity::delete_by_id(promo.id).exec(db).await?;

        info!("Promo {code} deleted");
        Ok(promo.id)
    }

    async fn find_by_code<C>(conn: &C, code: &str) -> Result<promocodes::Model, ServiceError>
    where
        C: ConnectionTrait,
    {
        promocodes::Entity::find()
            .filter(promocodes::Column::Code.eq(code))
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::not_found("promocode", code))
    }
}
