use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("limit must be between 1 and {max}, got {0}", max = Pagination::MAX_LIMIT)]
    Limit(u64),
    #[error("skip must be at most {max}, got {0}", max = Pagination::MAX_SKIP)]
    Skip(u64),
}

/// Offset pagination shared by every list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    limit: u64,
    skip: u64,
}

impl Pagination {
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 1000;
    pub const MAX_SKIP: u64 = 1000;

    pub fn new(limit: u64, skip: u64) -> Result<Self, PaginationError> {
        if !(1..=Self::MAX_LIMIT).contains(&limit) {
            return Err(PaginationError::Limit(limit));
        }

        if skip > Self::MAX_SKIP {
            return Err(PaginationError::Skip(skip));
        }

        Ok(Self { limit, skip })
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            skip: 0,
        }
    }
}
