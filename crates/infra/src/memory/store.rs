//! In-memory row storage standing in for a database table.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use ays_core::{DomainError, Specification};

/// Storage-level failure. Never used for "row not found".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("table '{0}' lock poisoned")]
    LockPoisoned(&'static str),

    #[error("row of table '{table}' cannot be mapped: {reason}")]
    Mapping { table: &'static str, reason: String },
}

impl StoreError {
    pub fn mapping(table: &'static str, reason: impl Into<String>) -> Self {
        Self::Mapping {
            table,
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        DomainError::storage(value.to_string())
    }
}

/// A stored row with a primary key.
pub trait Row: Clone + Send + Sync + 'static {
    type Key: Clone + Eq + Hash + Send + Sync + 'static;

    const TABLE: &'static str;

    fn key(&self) -> Self::Key;
}

/// Table abstraction used by the adapters.
pub trait RowStore<R: Row>: Send + Sync {
    fn get(&self, key: &R::Key) -> Result<Option<R>, StoreError>;

    /// Inserts or replaces by key. Replacing keeps the original position.
    fn upsert(&self, row: R) -> Result<(), StoreError>;

    /// Rows satisfying `spec`, in insertion order.
    fn select(&self, spec: &Specification<R>) -> Result<Vec<R>, StoreError>;
}

impl<R, S> RowStore<R> for Arc<S>
where
    R: Row,
    S: RowStore<R> + ?Sized,
{
    fn get(&self, key: &R::Key) -> Result<Option<R>, StoreError> {
        (**self).get(key)
    }

    fn upsert(&self, row: R) -> Result<(), StoreError> {
        (**self).upsert(row)
    }

    fn select(&self, spec: &Specification<R>) -> Result<Vec<R>, StoreError> {
        (**self).select(spec)
    }
}

struct Rows<R: Row> {
    ordered: Vec<R>,
    positions: HashMap<R::Key, usize>,
}

/// In-memory table for tests/dev.
pub struct InMemoryTable<R: Row> {
    inner: RwLock<Rows<R>>,
}

impl<R: Row> InMemoryTable<R> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Rows {
                ordered: Vec::new(),
                positions: HashMap::new(),
            }),
        }
    }

    pub fn with_rows(rows: impl IntoIterator<Item = R>) -> Result<Self, StoreError> {
        let table = Self::new();
        for row in rows {
            table.upsert(row)?;
        }
        Ok(table)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let rows = self.inner.read().map_err(|_| StoreError::LockPoisoned(R::TABLE))?;
        Ok(rows.ordered.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl<R: Row> Default for InMemoryTable<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Row> core::fmt::Debug for InMemoryTable<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryTable").field("table", &R::TABLE).finish()
    }
}

impl<R: Row> RowStore<R> for InMemoryTable<R> {
    fn get(&self, key: &R::Key) -> Result<Option<R>, StoreError> {
        let rows = self.inner.read().map_err(|_| StoreError::LockPoisoned(R::TABLE))?;
        Ok(rows
            .positions
            .get(key)
            .and_then(|&position| rows.ordered.get(position))
            .cloned())
    }

    fn upsert(&self, row: R) -> Result<(), StoreError> {
        let mut rows = self.inner.write().map_err(|_| StoreError::LockPoisoned(R::TABLE))?;
        let key = row.key();
        match rows.positions.get(&key).copied() {
            Some(position) => rows.ordered[position] = row,
            None => {
                let position = rows.ordered.len();
                rows.ordered.push(row);
                rows.positions.insert(key, position);
            }
        }
        Ok(())
    }

    fn select(&self, spec: &Specification<R>) -> Result<Vec<R>, StoreError> {
        let rows = self.inner.read().map_err(|_| StoreError::LockPoisoned(R::TABLE))?;
        Ok(rows
            .ordered
            .iter()
            .filter(|row| spec.is_satisfied_by(row))
            .cloned()
            .collect())
    }
}
