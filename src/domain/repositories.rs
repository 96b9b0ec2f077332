//! Repository trait definitions
//!
//! These traits define the contract for reference-data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use serde::Serialize;

use super::DomainError;

/// Largest page a client may ask for; bigger limits are clamped
pub const MAX_PAGE_SIZE: u64 = 100;

/// Page-number pagination request (1-based page)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Missing or zero values fall back to the defaults. The row offset
    /// `(page - 1) * limit` must fit in an SQL integer.
    pub fn new(
        page: Option<u64>,
        limit: Option<u64>,
        default_limit: u64,
    ) -> Result<Self, DomainError> {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = limit
            .filter(|l| *l >= 1)
            .unwrap_or(default_limit)
            .clamp(1, MAX_PAGE_SIZE);

        let offset = (page - 1).checked_mul(limit);
        if !offset.is_some_and(|o| o <= i64::MAX as u64) {
            return Err(DomainError::validation(format!("page {} is out of range", page)));
        }

        Ok(Self { page, limit })
    }

    /// 1-based page number
    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Zero-based page index as expected by the sea-orm paginator
    pub fn index(&self) -> u64 {
        self.page - 1
    }
}

/// Paginated result with total count
#[derive(Debug)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Ingredient data for API responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

/// Tag data for API responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// Repository trait for Ingredient reference data
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Find all ingredients, optionally only those whose name starts with `name_prefix`
    async fn find_all(&self, name_prefix: Option<String>) -> Result<Vec<Ingredient>, DomainError>;

    /// Find an ingredient by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, DomainError>;
}

/// Repository trait for Tag reference data
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Find all tags ordered by name
    async fn find_all(&self) -> Result<Vec<Tag>, DomainError>;

    /// Find a tag by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, DomainError>;
}
