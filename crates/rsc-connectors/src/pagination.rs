//! Page walking over controller collections.
//!
//! A collection is read page by page starting at page 0 with a fixed page
//! size. The first empty page ends the walk; item counts and headers are never
//! consulted. Any failing page fails the whole collection and the pages read
//! so far are dropped.

use crate::traits::{ControllerConnector, ConnectorResult, ListScope, PageRequest, RemoteKind, RemoteObject};
use std::future::Future;
use tracing::debug;

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Maximum page size accepted by the controller.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Clamps a requested page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(1, MAX_PAGE_SIZE)
}

/// Walks pages produced by `fetch_page` until one comes back empty.
///
/// Items are concatenated in page order. On the first error the items
/// collected so far are discarded and the error is returned unchanged.
pub async fn fetch_all_pages<T, F, Fut>(page_size: u32, mut fetch_page: F) -> ConnectorResult<Vec<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = ConnectorResult<Vec<T>>>,
{
    let page_size = clamp_page_size(page_size);
    let mut all = Vec::new();
    let mut page = 0u32;

    loop {
        let items = fetch_page(PageRequest { page, page_size }).await?;
        if items.is_empty() {
            break;
        }
        all.extend(items);
        page += 1;
    }

    Ok(all)
}

/// Fetches whole collections from one controller partition.
pub struct PaginatedFetcher<'a> {
    connector: &'a dyn ControllerConnector,
    page_size: u32,
}

impl<'a> PaginatedFetcher<'a> {
    pub fn new(connector: &'a dyn ControllerConnector, page_size: u32) -> Self {
        Self {
            connector,
            page_size: clamp_page_size(page_size),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns every object of `kind` under `scope`.
    pub async fn fetch_all(
        &self,
        scope: &ListScope,
        kind: RemoteKind,
    ) -> ConnectorResult<Vec<RemoteObject>> {
        let items = fetch_all_pages(self.page_size, |page| {
            self.connector.list_page(scope, kind, page)
        })
        .await?;
        debug!(
            connector = %self.connector.name(),
            kind = %kind,
            scope = %scope.path(),
            count = items.len(),
            "Fetched collection"
        );
        Ok(items)
    }
}
