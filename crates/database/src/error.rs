use chrono::NaiveDateTime;
use models::{
    archive_month::ArchiveMonth, booking::BookingError, pagination::PaginationError,
    pricing::InvalidDiscount,
};
use rust_decimal::Decimal;
use sea_orm::{DbErr, SqlErr};
use std::fmt::Display;
use thiserror::Error;

/// Who is at fault for a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request was wrong or refers to something that does not exist (4xx)
    Client,
    /// Storage or deployment fault (5xx)
    Server,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("{0}")]
    Conflict(String),

    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("promo code {code} expired at {expires_at}")]
    Expired {
        code: String,
        expires_at: NaiveDateTime,
    },

    /// The archive has no partition for the record's month. Fixed by provisioning, not by retrying.
    #[error("no archive partition provisioned for {month}")]
    MissingPartition { month: ArchiveMonth },

    #[error("storage fault: {0}")]
    Storage(DbErr),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, key: impl Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_)
            | Self::NotFound { .. }
            | Self::Conflict(_)
            | Self::InsufficientFunds { .. }
            | Self::Expired { .. } => ErrorClass::Client,
            Self::MissingPartition { .. } | Self::Storage(_) => ErrorClass::Server,
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                Self::Conflict(format!("duplicate value: {detail}"))
            }
            // A referenced row disappeared between our read and our write
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => Self::NotFound {
                entity: "referenced record",
                key: detail,
            },
            _ => Self::Storage(err),
        }
    }
}

impl From<BookingError> for ServiceError {
    fn from(err: BookingError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<PaginationError> for ServiceError {
    fn from(err: PaginationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<InvalidDiscount> for ServiceError {
    fn from(err: InvalidDiscount) -> Self {
        Self::Validation(err.to_string())
    }
}
