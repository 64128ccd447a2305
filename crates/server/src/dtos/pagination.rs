use models::pagination::{Pagination, PaginationError};
use serde::Deserialize;
use utoipa::IntoParams;

/// `limit` and `skip` accepted by every list endpoint
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page size, 1 to 1000 (default 10)
    pub limit: Option<u64>,
    /// Rows to skip, at most 1000 (default 0)
    pub skip: Option<u64>,
}

impl TryFrom<PageParams> for Pagination {
    type Error = PaginationError;

    fn try_from(params: PageParams) -> Result<Self, Self::Error> {
        Pagination::new(
            params.limit.unwrap_or(Pagination::DEFAULT_LIMIT),
            params.skip.unwrap_or(0),
        )
    }
}
