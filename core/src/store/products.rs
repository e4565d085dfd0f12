//! Product listing and detail state.

use tokio::sync::watch;
use tracing::warn;

use crate::api::ProductsApi;
use crate::error::ApiError;
use crate::types::{Product, ProductDraft, ProductQuery, SortOrder};

use super::{settle_all, track, Activity, InFlight, PageState, Selection, Tracked};

/// Listing filters. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilters {
    pub search: String,
    pub category: String,
    pub sort_by: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductState {
    pub products: Vec<Product>,
    pub current: Option<Product>,
    pub categories: Vec<String>,
    pub page: PageState,
    pub filters: ProductFilters,
    pub in_flight: InFlight,
    pub selected: Selection,
}

impl Tracked for ProductState {
    fn in_flight_mut(&mut self) -> &mut InFlight {
        &mut self.in_flight
    }
}

impl ProductState {
    /// Listing query for the current page and filters. `order` is only sent
    /// alongside a sort column.
    pub fn query(&self) -> ProductQuery {
        let set = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        let sort_by = set(&self.filters.sort_by);
        ProductQuery {
            limit: Some(self.page.items_per_page),
            skip: Some(self.page.skip()),
            search: set(&self.filters.search),
            category: set(&self.filters.category),
            order: sort_by.as_ref().map(|_| self.filters.order),
            sort_by,
        }
    }
}

pub struct ProductStore {
    api: ProductsApi,
    state: watch::Sender<ProductState>,
}

impl ProductStore {
    pub fn new(api: ProductsApi) -> Self {
        Self {
            api,
            state: watch::Sender::new(ProductState::default()),
        }
    }

    pub fn with_items_per_page(api: ProductsApi, items_per_page: u32) -> Self {
        let state = ProductState {
            page: PageState::with_items_per_page(items_per_page),
            ..ProductState::default()
        };
        Self {
            api,
            state: watch::Sender::new(state),
        }
    }

    pub fn snapshot(&self) -> ProductState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProductState> {
        self.state.subscribe()
    }

    pub async fn fetch_products(&self) -> Result<(), ApiError> {
        let query = self.state.borrow().query();
        track(
            &self.state,
            Activity::Loading,
            "fetch products",
            self.api.list(&query),
            |s, page| {
                s.products = page.products;
                s.page.set_total(page.total);
            },
        )
        .await
    }

    pub async fn fetch_product(&self, id: u64) -> Result<(), ApiError> {
        track(
            &self.state,
            Activity::Loading,
            "fetch product",
            self.api.get(id),
            |s, product| s.current = Some(product),
        )
        .await
    }

    /// Load the category slugs. No in-flight flag.
    pub async fn fetch_categories(&self) -> Result<(), ApiError> {
        let categories = self.api.category_list().await?;
        self.state.send_modify(|s| s.categories = categories);
        Ok(())
    }

    /// Create, then reload the current page. A failed reload is logged and
    /// does not fail the creation.
    pub async fn create(&self, draft: &ProductDraft) -> Result<(), ApiError> {
        track(
            &self.state,
            Activity::Creating,
            "create product",
            self.api.create(draft),
            |_, _| {},
        )
        .await?;
        if let Err(err) = self.fetch_products().await {
            warn!(%err, "reload after create failed");
        }
        Ok(())
    }

    /// Replace the entity in the listing and in `current` when it is shown.
    pub async fn update(&self, id: u64, draft: &ProductDraft) -> Result<(), ApiError> {
        track(
            &self.state,
            Activity::Updating,
            "update product",
            self.api.update(id, draft),
            |s, updated: Product| {
                for product in s.products.iter_mut().filter(|p| p.id == id) {
                    *product = updated.clone();
                }
                if s.current.as_ref().is_some_and(|p| p.id == id) {
                    s.current = Some(updated);
                }
            },
        )
        .await
    }

    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        track(
            &self.state,
            Activity::Deleting,
            "delete product",
            self.api.delete(id),
            |s, _| {
                s.products.retain(|p| p.id != id);
                s.selected.deselect(id);
            },
        )
        .await
    }

    /// Delete concurrently. Every call runs to completion; if any failed the
    /// listing is left untouched, even though some upstream deletes may
    /// already have gone through.
    pub async fn delete_many(&self, ids: &[u64]) -> Result<(), ApiError> {
        let calls = settle_all(ids.iter().map(|&id| self.api.delete(id)));
        track(
            &self.state,
            Activity::Deleting,
            "delete products",
            calls,
            |s, _| {
                s.products.retain(|p| !ids.contains(&p.id));
                s.selected.clear();
            },
        )
        .await
    }

    /// Edit the filters, go back to page 1, drop the selection and reload.
    pub async fn set_filters(
        &self,
        edit: impl FnOnce(&mut ProductFilters),
    ) -> Result<(), ApiError> {
        self.state.send_modify(|s| {
            edit(&mut s.filters);
            s.page.current_page = 1;
            s.selected.clear();
        });
        self.fetch_products().await
    }

    pub async fn set_page(&self, page: u32) -> Result<(), ApiError> {
        self.state.send_modify(|s| {
            s.page.current_page = page.max(1);
            s.selected.clear();
        });
        self.fetch_products().await
    }

    pub async fn reset_filters(&self) -> Result<(), ApiError> {
        self.set_filters(|filters| *filters = ProductFilters::default())
            .await
    }

    pub fn select(&self, id: u64) {
        self.state.send_modify(|s| s.selected.select(id));
    }

    pub fn deselect(&self, id: u64) {
        self.state.send_modify(|s| s.selected.deselect(id));
    }

    /// Select every product on the current page.
    pub fn select_all(&self) {
        self.state.send_modify(|s| {
            let ids: Vec<u64> = s.products.iter().map(|p| p.id).collect();
            s.selected.replace(ids);
        });
    }

    pub fn clear_selection(&self) {
        self.state.send_modify(|s| s.selected.clear());
    }

    pub fn set_current(&self, product: Option<Product>) {
        self.state.send_modify(|s| s.current = product);
    }

    pub fn clear_current(&self) {
        self.set_current(None);
    }
}
