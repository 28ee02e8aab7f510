//! Fetch orchestration.
//!
//! Every remote request that feeds the store follows the same protocol:
//!
//! 1. set `loading = true` and clear `error`
//! 2. call the catalog API (search when the query is non-empty, else list)
//! 3. on success replace the catalog
//! 4. on failure record a human-readable error
//! 5. set `loading = false`
//!
//! Catalog refreshes and detail loads are numbered separately. When a fetch
//! completes after a newer one of the same kind has started, its outcome is
//! dropped, so a slow response for an old query can never overwrite the
//! catalog of the current one. A detail load never supersedes a catalog
//! refresh. `loading` stays true while the current fetch of either kind is
//! outstanding.

use std::sync::{Arc, Mutex, PoisonError};

use fashion_store_core::{ProductDetail, ProductId, Recommendation};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::catalog::{CatalogApi, CatalogError, PageRequest};
use crate::store::Store;

/// Drives catalog fetches into a [`Store`].
///
/// Cheap to clone; clones share the fetch counters.
pub struct CatalogFetcher<A> {
    inner: Arc<CatalogFetcherInner<A>>,
}

struct CatalogFetcherInner<A> {
    api: A,
    store: Store,
    page: PageRequest,
    recommend_limit: u32,
    fetches: Mutex<FetchTracker>,
}

/// Which part of the state a fetch feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchKind {
    Catalog,
    Detail,
}

#[derive(Debug, Default)]
struct FetchSlot {
    /// Number of the most recently started fetch of this kind.
    latest: u64,
    /// True while that fetch is outstanding.
    pending: bool,
}

#[derive(Debug, Default)]
struct FetchTracker {
    catalog: FetchSlot,
    detail: FetchSlot,
}

impl FetchTracker {
    const fn slot(&mut self, kind: FetchKind) -> &mut FetchSlot {
        match kind {
            FetchKind::Catalog => &mut self.catalog,
            FetchKind::Detail => &mut self.detail,
        }
    }

    const fn any_pending(&self) -> bool {
        self.catalog.pending || self.detail.pending
    }
}

impl<A> Clone for CatalogFetcher<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: CatalogApi> CatalogFetcher<A> {
    /// Create a fetcher that requests `page` for listings and searches.
    #[must_use]
    pub fn new(api: A, store: Store, page: PageRequest, recommend_limit: u32) -> Self {
        Self {
            inner: Arc::new(CatalogFetcherInner {
                api,
                store,
                page,
                recommend_limit,
                fetches: Mutex::new(FetchTracker::default()),
            }),
        }
    }

    /// The store this fetcher writes to.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// The underlying catalog API.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.inner.api
    }

    /// Start a fetch: take the next number of its kind and reset the flags.
    fn begin(&self, kind: FetchKind) -> u64 {
        let mut fetches = self
            .inner
            .fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let slot = fetches.slot(kind);
        slot.latest += 1;
        slot.pending = true;
        let id = slot.latest;
        self.inner.store.set_loading(true);
        self.inner.store.set_error(None);
        id
    }

    /// Finish fetch `id`, applying its outcome only if it is still the
    /// latest of its kind.
    ///
    /// Returns false when the outcome was dropped.
    fn finish<T>(
        &self,
        kind: FetchKind,
        id: u64,
        result: &Result<T, CatalogError>,
        apply: impl FnOnce(&Store, &T),
    ) -> bool {
        let mut fetches = self
            .inner
            .fetches
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let slot = fetches.slot(kind);
        if slot.latest != id {
            debug!(?kind, fetch = id, latest = slot.latest, "Dropping superseded fetch result");
            return false;
        }
        slot.pending = false;

        let store = &self.inner.store;
        match result {
            Ok(value) => apply(store, value),
            Err(err) => {
                warn!(error = %err, "Catalog fetch failed");
                store.set_error(Some(err.user_message()));
            }
        }
        store.set_loading(fetches.any_pending());
        true
    }

    /// Refresh the catalog for the store's current query.
    ///
    /// Never fails; errors end up in the store's `error` field.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let id = self.begin(FetchKind::Catalog);
        let query = self.inner.store.query();

        let result = if query.is_empty() {
            self.inner.api.list_products(self.inner.page).await
        } else {
            self.inner.api.search_products(&query, self.inner.page).await
        };

        self.finish(FetchKind::Catalog, id, &result, |store, products| {
            store.set_products(products.clone());
        });
    }

    /// Set the query and refresh in one step.
    pub async fn search(&self, query: impl Into<String>) {
        self.inner.store.set_query(query);
        self.refresh().await;
    }

    /// Load a product detail under the same loading/error protocol.
    ///
    /// The catalog is left untouched; the detail is returned to the caller.
    ///
    /// # Errors
    ///
    /// Returns the catalog error that was also recorded in the store.
    #[instrument(skip(self))]
    pub async fn load_detail(&self, id: ProductId) -> Result<ProductDetail, CatalogError> {
        let fetch = self.begin(FetchKind::Detail);
        let result = self.inner.api.get_product_detail(id).await;
        self.finish(FetchKind::Detail, fetch, &result, |_, _| {});
        result
    }

    /// Recommendations for a query, using the configured limit.
    ///
    /// Not wired into the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn recommend(&self, query: &str) -> Result<Vec<Recommendation>, CatalogError> {
        self.inner
            .api
            .recommend(query, self.inner.recommend_limit)
            .await
    }
}

impl<A> CatalogFetcher<A>
where
    A: CatalogApi + Send + Sync + 'static,
{
    /// Refresh on a background task.
    pub fn spawn_refresh(&self) -> JoinHandle<()> {
        let fetcher = self.clone();
        tokio::spawn(async move { fetcher.refresh().await })
    }

    /// Keep the catalog in sync with the store's query.
    ///
    /// Performs an initial refresh, then starts a new refresh every time the
    /// query changes. Refreshes are not awaited before the next change is
    /// observed; superseded ones are dropped when they complete. Abort the
    /// returned handle to stop the binding.
    pub fn bind_query(&self) -> JoinHandle<()> {
        let fetcher = self.clone();
        let mut rx = self.inner.store.subscribe();

        tokio::spawn(async move {
            let mut last_query = rx.borrow_and_update().query.clone();
            fetcher.spawn_refresh();

            while rx.changed().await.is_ok() {
                let query = rx.borrow_and_update().query.clone();
                if query != last_query {
                    debug!(query = %query, "Query changed, refreshing catalog");
                    last_query = query;
                    fetcher.spawn_refresh();
                }
            }
        })
    }
}
