use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// A single ordering instruction: sort by `property` in `direction`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    pub property: String,
    #[serde(default)]
    pub direction: Direction,
}

impl Order {
    pub fn new(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }

    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(property, Direction::Asc)
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(property, Direction::Desc)
    }
}

/// Page number/size/ordering specification for a listing query.
///
/// # Invariants
/// - `page_number >= 1` (pages are 1-based).
/// - `page_size >= 1`.
/// - `orders` is significant: the first entry is the primary sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pageable {
    page_number: u64,
    page_size: u64,
    orders: Vec<Order>,
}

impl Pageable {
    pub fn new(page_number: u64, page_size: u64, orders: Vec<Order>) -> DomainResult<Self> {
        if page_number < 1 {
            return Err(DomainError::validation("page number must be at least 1"));
        }
        if page_size < 1 {
            return Err(DomainError::validation("page size must be at least 1"));
        }
        Ok(Self {
            page_number,
            page_size,
            orders,
        })
    }

    /// First page, storage-defined ordering.
    pub fn first(page_size: u64) -> DomainResult<Self> {
        Self::new(1, page_size, Vec::new())
    }

    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of elements to skip before this page starts.
    pub fn offset(&self) -> u64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    /// Reject orders on properties the resource cannot be sorted by.
    pub fn ensure_sortable_by(&self, allowed: &[&str]) -> DomainResult<()> {
        match self
            .orders
            .iter()
            .find(|o| !allowed.contains(&o.property.as_str()))
        {
            Some(order) => Err(DomainError::validation(format!(
                "cannot sort by '{}', sortable properties are {allowed:?}",
                order.property
            ))),
            None => Ok(()),
        }
    }
}
