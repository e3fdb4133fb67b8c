use crate::error::app_error::AppError;
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;

/// Pagination parameters for list queries
/// Both page and limit are optional to maintain backwards compatibility
/// When not provided, returns all results (no pagination)
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PaginationParams {
    /// Page number (1-indexed). When None, returns all results.
    pub page: Option<i64>,
    /// Number of items per page. When None, uses default or returns all.
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// Default limit when limit is provided but not specified
    pub const DEFAULT_LIMIT: i64 = 50;
    /// Maximum allowed limit
    pub const MAX_LIMIT: i64 = 200;

    /// Build from raw query params. Non-positive values would turn into
    /// a negative OFFSET/LIMIT at the SQL layer, so they are rejected
    /// here instead of surfacing as a database error.
    pub fn from_query(page: Option<i64>, limit: Option<i64>) -> Result<Self, AppError> {
        if let Some(page) = page
            && page < 1
        {
            return Err(AppError::BadRequest("page must be at least 1".to_string()));
        }
        if let Some(limit) = limit
            && limit < 1
        {
            return Err(AppError::BadRequest("limit must be at least 1".to_string()));
        }

        Ok(Self { page, limit })
    }

    /// Calculate the SQL OFFSET value based on page and limit
    /// Uses the effective (capped) limit to ensure consistent page boundaries
    pub fn offset(&self) -> Option<i64> {
        if let Some(effective_limit) = self.effective_limit() {
            let page = self.page.unwrap_or(1); // Default to page 1 if not specified
            Some((page - 1) * effective_limit)
        } else {
            None
        }
    }

    /// Get the effective limit, applying defaults and max constraints
    pub fn effective_limit(&self) -> Option<i64> {
        match self.limit {
            Some(limit) => Some(limit.min(Self::MAX_LIMIT)),
            None if self.page.is_some() => Some(Self::DEFAULT_LIMIT),
            None => None, // No pagination when both are None
        }
    }
}

/// Paginated response wrapper with metadata
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PaginatedResponse<T> {
    /// The actual data items
    pub data: Vec<T>,
    /// Current page number (1-indexed)
    pub page: i64,
    /// Number of items per page
    pub limit: i64,
    /// Total number of items across all pages
    pub total_items: i64,
    /// Total number of pages
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, limit: i64, total_items: i64) -> Self {
        let total_pages = if limit > 0 { (total_items + limit - 1) / limit } else { 1 };

        Self {
            data,
            page,
            limit,
            total_items,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_uses_capped_limit() {
        let params = PaginationParams {
            page: Some(3),
            limit: Some(1000),
        };
        assert_eq!(params.effective_limit(), Some(PaginationParams::MAX_LIMIT));
        assert_eq!(params.offset(), Some(2 * PaginationParams::MAX_LIMIT));
    }

    #[test]
    fn no_pagination_when_unset() {
        let params = PaginationParams { page: None, limit: None };
        assert_eq!(params.effective_limit(), None);
        assert_eq!(params.offset(), None);
    }

    #[test]
    fn page_without_limit_uses_default() {
        let params = PaginationParams { page: Some(2), limit: None };
        assert_eq!(params.effective_limit(), Some(PaginationParams::DEFAULT_LIMIT));
        assert_eq!(params.offset(), Some(PaginationParams::DEFAULT_LIMIT));
    }

    #[test]
    fn from_query_rejects_page_zero() {
        // page=0 would otherwise produce a negative OFFSET.
        assert!(matches!(
            PaginationParams::from_query(Some(0), Some(10)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            PaginationParams::from_query(Some(-3), None),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn from_query_rejects_non_positive_limit() {
        assert!(matches!(
            PaginationParams::from_query(Some(1), Some(0)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            PaginationParams::from_query(None, Some(-5)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn from_query_accepts_valid_and_unset_params() {
        let unset = PaginationParams::from_query(None, None).unwrap();
        assert_eq!(unset.offset(), None);

        let params = PaginationParams::from_query(Some(2), Some(10)).unwrap();
        assert_eq!(params.offset(), Some(10));
        assert_eq!(params.effective_limit(), Some(10));
    }
}
