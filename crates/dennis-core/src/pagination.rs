//! Pagination wrapper for list responses
//!
//! A list response carries the items under a named key plus a `pagination`
//! object. Decoding never fetches further pages; callers ask for the next
//! page themselves.

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::ops::Deref;

/// Pagination metadata of a list response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    /// Page that was returned (1-based)
    #[serde(default)]
    pub current_page: Option<u32>,
    /// Total number of pages available
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// Total number of items across all pages
    #[serde(default)]
    pub total: Option<u64>,
    /// Page size used by the server
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Set when the server declined to count a very large result set
    #[serde(default)]
    pub large_set: bool,
}

impl Pagination {
    /// Number of the following page, if there is one
    pub fn next_page(&self) -> Option<u32> {
        let current = self.current_page?;
        match self.total_pages {
            Some(total) if current >= total => None,
            Some(_) => current.checked_add(1),
            None if self.large_set => current.checked_add(1),
            None => None,
        }
    }
}

/// One page of entities together with its pagination metadata
#[derive(Debug, Clone)]
pub struct PaginatedArray<T> {
    items: Vec<T>,
    pagination: Pagination,
}

impl<T> PaginatedArray<T> {
    /// Build a page from a decoded list response.
    ///
    /// Each element of the array under `key` is mapped through `build`.
    pub fn from_response<F>(mut body: Value, key: &str, mut build: F) -> Result<Self>
    where
        F: FnMut(Value) -> Result<T>,
    {
        let pagination = match body.get_mut("pagination").map(Value::take) {
            Some(Value::Null) | None => Pagination::default(),
            Some(value) => serde_json::from_value(value)?,
        };

        let items = match body.get_mut(key).map(Value::take) {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(&mut build)
                .collect::<Result<Vec<_>>>()?,
            _ => {
                return Err(Error::invalid_response(format!(
                    "list response has no `{key}` array"
                )));
            }
        };

        Ok(Self { items, pagination })
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Deref for PaginatedArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> IntoIterator for PaginatedArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PaginatedArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
