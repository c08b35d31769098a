//! Catalog listing query construction.
//!
//! Turns the loosely typed query string of `GET /api/v1/services` into a
//! [`QueryDescriptor`] that any store can execute. Filtering happens first,
//! then sorting, then the `skip`/`limit` window.

use crate::dtos::CatalogParams;
use service_core::error::AppError;
use std::collections::BTreeMap;
use std::str::FromStr;

/// The only field clients may filter the catalog on.
pub const CATEGORY_FIELD: &str = "category";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// MongoDB sort direction.
    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(SortOrder::Ascending),
            "desc" | "descending" | "-1" => Ok(SortOrder::Descending),
            _ => Err(format!("Invalid sortOrder: {}", s)),
        }
    }
}

/// 1-indexed page plus optional page size. No limit means "everything".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: Option<u64>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: None,
        }
    }
}

impl Pagination {
    pub fn skip(&self) -> u64 {
        match self.limit {
            Some(limit) => (self.page - 1).saturating_mul(limit),
            None => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDescriptor {
    /// Exact-match conditions, field -> value.
    pub filter: BTreeMap<String, String>,
    /// field -> order; at most one entry.
    pub sort: BTreeMap<String, SortOrder>,
    pub pagination: Pagination,
}

impl QueryDescriptor {
    pub fn from_params(params: &CatalogParams) -> Result<Self, AppError> {
        let mut descriptor = QueryDescriptor::default();

        if let Some(category) = non_empty(&params.category) {
            descriptor
                .filter
                .insert(CATEGORY_FIELD.to_string(), category.to_string());
        }

        // Sorting needs both halves; one without the other is ignored.
        if let (Some(field), Some(order)) =
            (non_empty(&params.sort_field), non_empty(&params.sort_order))
        {
            if field.starts_with('$') {
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Invalid sortField: {}",
                    field
                )));
            }
            let order = order
                .parse::<SortOrder>()
                .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e)))?;
            descriptor.sort.insert(field.to_string(), order);
        }

        descriptor.pagination = Pagination {
            page: parse_positive("page", &params.page)?.unwrap_or(1),
            limit: parse_positive("limit", &params.limit)?,
        };

        Ok(descriptor)
    }

    pub fn skip(&self) -> u64 {
        self.pagination.skip()
    }

    pub fn limit(&self) -> Option<u64> {
        self.pagination.limit
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_positive(name: &str, value: &Option<String>) -> Result<Option<u64>, AppError> {
    let Some(raw) = value else {
        return Ok(None);
    };

    match raw.trim().parse::<u64>() {
        Ok(n) if n >= 1 => Ok(Some(n)),
        _ => Err(AppError::BadRequest(anyhow::anyhow!(
            "{} must be a positive integer, got '{}'",
            name,
            raw
        ))),
    }
}
