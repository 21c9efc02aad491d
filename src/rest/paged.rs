/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;
use crate::rest::parsers::from_str_number;
use crate::rest::signer::ApiParams;
use async_stream::try_stream;
use futures::Stream;
use futures::future::BoxFuture;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::ops::Index;
use std::sync::Arc;

/// Re-issues the originating call for the given page number
pub type PageFetcher<T> =
    Arc<dyn Fn(u32) -> BoxFuture<'static, Result<PagedResult<T>, FlickrError>> + Send + Sync>;

// Paging attributes reported on the result container
#[derive(Deserialize, Debug, Clone, Copy)]
pub(crate) struct PageInfo {
    #[serde(rename = "@page", deserialize_with = "from_str_number")]
    page: u32,

    #[serde(rename = "@pages", deserialize_with = "from_str_number")]
    pages: u32,

    #[serde(rename = "@perpage", deserialize_with = "from_str_number")]
    per_page: u32,

    #[serde(rename = "@total", deserialize_with = "from_str_number")]
    total: u64,
}

/// One page of a multi-page result set.
///
/// Only the entries of this page are held. Adjacent pages are fetched on request by repeating
/// the call that produced this page with the same options and a different page number.
/// Running off either end of the result set yields `None`, not an error.
pub struct PagedResult<T> {
    page: u32,
    pages: u32,
    per_page: u32,
    total: u64,
    items: Vec<T>,
    options: ApiParams,
    fetch: PageFetcher<T>,
}

impl<T> PagedResult<T> {
    pub(crate) fn new(info: PageInfo, options: ApiParams, fetch: PageFetcher<T>) -> Self {
        Self {
            page: info.page,
            pages: info.pages,
            per_page: info.per_page,
            total: info.total,
            items: Vec::new(),
            options,
            fetch,
        }
    }

    /// Current page, starting at 1
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Total number of pages as reported by the service
    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Total number of entries across all pages
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Options of the originating call, without the page number
    pub fn options(&self) -> &ApiParams {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    /// Fetches the following page, or `None` when this is the last one
    pub async fn next_page(&self) -> Result<Option<PagedResult<T>>, FlickrError> {
        if !self.has_next_page() {
            return Ok(None);
        }
        log::debug!("Fetching page {} of {}", self.page + 1, self.pages);
        (self.fetch)(self.page + 1).await.map(Some)
    }

    /// Fetches the preceding page, or `None` when this is the first one
    pub async fn previous_page(&self) -> Result<Option<PagedResult<T>>, FlickrError> {
        if !self.has_previous_page() {
            return Ok(None);
        }
        log::debug!("Fetching page {} of {}", self.page - 1, self.pages);
        (self.fetch)(self.page - 1).await.map(Some)
    }

    /// Streams every entry from this page onwards, fetching following pages as needed
    pub fn into_stream(self) -> impl Stream<Item = Result<T, FlickrError>> {
        try_stream! {
            let mut current = self;
            loop {
                let next = current
                    .has_next_page()
                    .then(|| (current.fetch)(current.page + 1));
                for item in std::mem::take(&mut current.items) {
                    yield item;
                }
                match next {
                    Some(next) => current = next.await?,
                    None => break,
                }
            }
        }
    }
}

impl<T: DeserializeOwned> PagedResult<T> {
    /// Adds a result node, provided it maps onto the entry type. Returns whether it was added.
    pub fn append(&mut self, node: Value) -> bool {
        match serde_json::from_value::<T>(node) {
            Ok(item) => {
                self.items.push(item);
                true
            }
            Err(err) => {
                log::warn!("Ignoring result entry of unexpected shape: {}", err);
                false
            }
        }
    }
}

impl<T> Index<usize> for PagedResult<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<T> IntoIterator for PagedResult<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a PagedResult<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PagedResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedResult")
            .field("page", &self.page)
            .field("pages", &self.pages)
            .field("per_page", &self.per_page)
            .field("total", &self.total)
            .field("items", &self.items)
            .field("options", &self.options)
            .finish()
    }
}
