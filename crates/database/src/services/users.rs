use crate::{
    entities::{reservations, users},
    error::ServiceError,
    services::{ledger::BalanceLedger, paginate, promos::{PromoService, ensure_not_expired}},
};
use chrono::NaiveDateTime;
use log::info;
use models::pagination::Pagination;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 100;
const MAX_PHONE_LEN: usize = 20;
const MIN_AGE: i16 = 18;
const MAX_AGE: i16 = 100;

/// Registration details; also used to update an existing user, matched by email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub age: i16,
    pub email: String,
    pub phone: Option<String>,
}

impl NewUser {
    fn validate(&self) -> Result<(), ServiceError> {
        let name_len = self.name.chars().count();
        if name_len == 0 || name_len > MAX_NAME_LEN {
            return Err(ServiceError::validation(format!(
                "name must be 1 to {MAX_NAME_LEN} characters"
            )));
        }

        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(ServiceError::validation(format!(
                "age must be between {MIN_AGE} and {MAX_AGE}"
            )));
        }

        validate_email(&self.email)?;

        if let Some(phone) = &self.phone
            && phone.chars().count() > MAX_PHONE_LEN
        {
            return Err(ServiceError::validation(format!(
                "phone must be at most {MAX_PHONE_LEN} characters"
            )));
        }

        Ok(())
    }
}

fn validate_email(email: &str) -> Result<(), ServiceError> {
    let valid = email.len() <= MAX_EMAIL_LEN
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && domain.contains('.') && !domain.contains('@')
            });

    if !valid {
        return Err(ServiceError::validation(format!(
            "invalid email address: {email}"
        )));
    }

    Ok(())
}

pub struct UserService;

impl UserService {
    pub async fn list_users(
        db: &DatabaseConnection,
        page: Pagination,
    ) -> Result<Vec<users::Model>, ServiceError> {
        let query = users::Entity::find().order_by_asc(users::Column::Email);
        let users = paginate(query, page).all(db).await?;

        if users.is_empty() {
            return Err(ServiceError::not_found("users", "requested page"));
        }

        Ok(users)
    }

    pub async fn get_user(db: &DatabaseConnection, user_id: Uuid) -> Result<users::Model, ServiceError> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", user_id))
    }

    /// Registers a user with a zero balance, optionally attaching a promo code
    pub async fn create_user(
        db: &DatabaseConnection,
        user: NewUser,
        promo_code: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<Uuid, ServiceError> {
        user.validate()?;

        let promocode_id = match promo_code {
            Some(code) => {
                let promo = PromoService::get_promo(db, code).await?;
                ensure_not_expired(code, promo.expires_at, now)?;
                Some(promo.id)
            }
            None => None,
        };

        let id = Uuid::new_v4();
        users::ActiveModel {
            id: Set(id),
            name: Set(user.name),
            age: Set(user.age),
            email: Set(user.email.clone()),
            phone: Set(user.phone),
            promocode_id: Set(promocode_id),
            balance: Set(Decimal::ZERO),
        }
        .insert(db)
        .await
        .map_err(|err| match ServiceError::from(err) {
            ServiceError::Conflict(_) => {
                ServiceError::Conflict(format!("duplicate email: {}", user.email))
            }
            other => other,
        })?;

        info!("User {id} registered");
        Ok(id)
    }

    /// Adds prepaid money to the balance of the user with `email`, returning the new balance
    pub async fn top_up<L>(
        db: &DatabaseConnection,
        ledger: &L,
        email: &str,
        amount: Decimal,
    ) -> Result<(Uuid, Decimal), ServiceError>
    where
        L: BalanceLedger,
    {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::validation("top-up amount must be positive"));
        }

        let txn = db.begin().await?;
        let user = Self::find_by_email(&txn, email).await?;
        let balance = ledger.credit(&txn, user.id, amount).await?;
        txn.commit().await?;

        info!("User {} topped up by {}", user.id, amount);
        Ok((user.id, balance))
    }

    /// Updates name, age and phone of the user with the same email
    pub async fn update_user(db: &DatabaseConnection, user: NewUser) -> Result<Uuid, ServiceError> {
        user.validate()?;

        let existing = Self::find_by_email(db, &user.email).await?;
        let mut active = existing.into_active_model();
        active.name = Set(user.name);
        active.age = Set(user.age);
        active.phone = Set(user.phone);
        let updated = active.update(db).await?;

        Ok(updated.id)
    }

    /// Deletes a user that holds no active reservations
    pub async fn delete_user(db: &DatabaseConnection, email: &str) -> Result<Uuid, ServiceError> {
        let txn = db.begin().await?;

        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", email))?;

        let active = reservations::Entity::find()
            .filter(reservations::Column::UserId.eq(user.id))
            .count(&txn)
            .await?;
        if active > 0 {
            return Err(ServiceError::Conflict(format!(
                "user {} still holds {active} active reservation(s); complete or cancel them first",
                user.id
            )));
        }

        users::Entity::delete_by_id(user.id).exec(&txn).await?;
        txn.commit().await?;

        info!("User {} deleted", user.id);
        Ok(user.id)
    }

    async fn find_by_email<C>(conn: &C, email: &str) -> Result<users::Model, ServiceError>
    where
        C: ConnectionTrait,
    {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::not_found("user", email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> NewUser {
        NewUser {
            name: "Ada".to_string(),
            age: 30,
            email: "ada@example.com".to_string(),
            phone: Some("88001112233".to_string()),
        }
    }

    #[test]
    fn test_user_validation() {
        assert!(user().validate().is_ok());

        let too_young = NewUser { age: 17, ..user() };
        assert!(too_young.validate().is_err());

        let no_name = NewUser {
            name: String::new(),
            ..user()
        };
        assert!(no_name.validate().is_err());

        let long_phone = NewUser {
            phone: Some("1".repeat(21)),
            ..user()
        };
        assert!(long_phone.validate().is_err());
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("missing-at.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@localhost").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }
}
