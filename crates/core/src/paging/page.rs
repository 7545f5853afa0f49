use serde::Serialize;

use super::pageable::{Order, Pageable};
use crate::error::{DomainError, DomainResult};

/// A page as returned by the storage collaborator, before its rows are mapped
/// to domain objects.
///
/// The storage side has already applied the filter; `total_element_count` is
/// the number of matching rows across all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct StoragePage<E> {
    content: Vec<E>,
    page_number: u64,
    page_size: u64,
    total_element_count: u64,
    orders: Vec<Order>,
}

impl<E> StoragePage<E> {
    pub fn new(content: Vec<E>, pageable: &Pageable, total_element_count: u64) -> Self {
        Self {
            content,
            page_number: pageable.page_number(),
            page_size: pageable.page_size(),
            total_element_count,
            orders: pageable.orders().to_vec(),
        }
    }

    /// Cuts the requested page out of the complete, already ordered match set.
    pub fn slice(matching: Vec<E>, pageable: &Pageable) -> Self {
        let total = matching.len() as u64;
        let offset = usize::try_from(pageable.offset()).unwrap_or(usize::MAX);
        let size = usize::try_from(pageable.page_size()).unwrap_or(usize::MAX);

        let content = matching.into_iter().skip(offset).take(size).collect();
        Self::new(content, pageable, total)
    }

    pub fn content(&self) -> &[E] {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_element_count(&self) -> u64 {
        self.total_element_count
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }
}

/// A slice of results plus pagination metadata.
///
/// `F` is the filter the page was produced for, echoed back to callers that
/// need to show what was searched. Counts are taken from where the page came
/// from and never recomputed from `content`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T, F = ()> {
    content: Vec<T>,
    page_number: u64,
    page_size: u64,
    total_element_count: u64,
    total_page_count: u64,
    sorted_by: Vec<Order>,
    filtered_by: Option<F>,
}

impl<T> Page<T> {
    /// Builds a page from a storage page, substituting its rows with the
    /// already-mapped `content`.
    ///
    /// `content` may be shorter than the storage page (upstream post-mapping
    /// filtering) but never longer: that is a contract violation.
    pub fn of<E>(raw: &StoragePage<E>, content: Vec<T>) -> DomainResult<Self> {
        Self::build(None, raw, content)
    }
}

impl<T, F> Page<T, F> {
    /// Same as [`Page::of`], threading the originating filter through.
    pub fn of_filtered<E>(filter: F, raw: &StoragePage<E>, content: Vec<T>) -> DomainResult<Self> {
        Self::build(Some(filter), raw, content)
    }

    /// Builds a page from an in-memory list that is already cut to `pageable`.
    pub fn from_slice(content: Vec<T>, pageable: &Pageable, total_element_count: u64) -> Self {
        Self {
            content,
            page_number: pageable.page_number(),
            page_size: pageable.page_size(),
            total_element_count,
            total_page_count: total_pages(total_element_count, pageable.page_size()),
            sorted_by: pageable.orders().to_vec(),
            filtered_by: None,
        }
    }

    fn build<E>(filtered_by: Option<F>, raw: &StoragePage<E>, content: Vec<T>) -> DomainResult<Self> {
        if content.len() > raw.len() {
            return Err(DomainError::precondition(format!(
                "page content has {} items but the storage page only has {}",
                content.len(),
                raw.len()
            )));
        }

        Ok(Self {
            content,
            page_number: raw.page_number(),
            page_size: raw.page_size(),
            total_element_count: raw.total_element_count(),
            total_page_count: total_pages(raw.total_element_count(), raw.page_size()),
            sorted_by: raw.orders().to_vec(),
            filtered_by,
        })
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_element_count(&self) -> u64 {
        self.total_element_count
    }

    pub fn total_page_count(&self) -> u64 {
        self.total_page_count
    }

    pub fn sorted_by(&self) -> &[Order] {
        &self.sorted_by
    }

    pub fn filtered_by(&self) -> Option<&F> {
        self.filtered_by.as_ref()
    }

    /// Maps every item, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U, F> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_element_count: self.total_element_count,
            total_page_count: self.total_page_count,
            sorted_by: self.sorted_by,
            filtered_by: self.filtered_by,
        }
    }

    /// Maps the echoed filter, keeping content and metadata.
    pub fn map_filter<G>(self, f: impl FnOnce(F) -> G) -> Page<T, G> {
        Page {
            content: self.content,
            page_number: self.page_number,
            page_size: self.page_size,
            total_element_count: self.total_element_count,
            total_page_count: self.total_page_count,
            sorted_by: self.sorted_by,
            filtered_by: self.filtered_by.map(f),
        }
    }
}

/// `ceil(total / size)`, and 1 for an empty result.
fn total_pages(total_element_count: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 1;
    }
    total_element_count.div_ceil(page_size).max(1)
}
