//! `/products` endpoints.

use std::sync::Arc;

use crate::client::HttpClient;
use crate::error::ApiError;
use crate::request::{QueryParams, RequestConfig};
use crate::types::{
    Category, Deleted, Pagination, Product, ProductDraft, ProductPage, ProductQuery, SortField,
};
use crate::validation::{validate_product, validate_product_changes};

use super::{call, json_body, non_blank, push_page};

pub const PRODUCT_SORTABLE_FIELDS: &[SortField] = &[
    SortField { value: "title", label: "Title" },
    SortField { value: "price", label: "Price" },
    SortField { value: "rating", label: "Rating" },
    SortField { value: "stock", label: "Stock" },
    SortField { value: "discountPercentage", label: "Discount" },
    SortField { value: "brand", label: "Brand" },
];

#[derive(Clone)]
pub struct ProductsApi {
    http: Arc<HttpClient>,
}

impl ProductsApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Route a listing query: search beats category, category beats the
    /// default listing.
    pub fn list_request(query: &ProductQuery) -> RequestConfig {
        let page = Pagination {
            limit: query.limit,
            skip: query.skip,
        };
        if let Some(term) = non_blank(query.search.as_deref()) {
            return Self::search_request(term, page);
        }
        if let Some(category) = non_blank(query.category.as_deref()) {
            return Self::by_category_request(category, page);
        }

        let mut params = QueryParams::new();
        push_page(&mut params, page);
        params.push_opt("sortBy", query.sort_by.as_deref());
        params.push_opt("order", query.order);
        RequestConfig::get("/products").with_params(params)
    }

    pub fn search_request(term: &str, page: Pagination) -> RequestConfig {
        let mut params = QueryParams::new();
        params.push("q", term.trim());
        push_page(&mut params, page);
        RequestConfig::get("/products/search").with_params(params)
    }

    /// The category name becomes a percent-encoded path segment.
    pub fn by_category_request(category: &str, page: Pagination) -> RequestConfig {
        let mut params = QueryParams::new();
        push_page(&mut params, page);
        let segment = urlencoding::encode(category.trim());
        RequestConfig::get(format!("/products/category/{segment}")).with_params(params)
    }

    pub fn get_request(id: u64) -> RequestConfig {
        RequestConfig::get(format!("/products/{id}"))
    }

    pub fn create_request(draft: &ProductDraft) -> Result<RequestConfig, ApiError> {
        Ok(RequestConfig::post("/products/add", json_body(draft)?))
    }

    pub fn update_request(id: u64, draft: &ProductDraft) -> Result<RequestConfig, ApiError> {
        Ok(RequestConfig::put(format!("/products/{id}"), json_body(draft)?))
    }

    pub fn delete_request(id: u64) -> RequestConfig {
        RequestConfig::delete(format!("/products/{id}"))
    }

    pub fn categories_request() -> RequestConfig {
        RequestConfig::get("/products/categories")
    }

    pub fn category_list_request() -> RequestConfig {
        RequestConfig::get("/products/category-list")
    }

    pub async fn list(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        call(&self.http, "products.list", Self::list_request(query)).await
    }

    pub async fn search(&self, term: &str, page: Pagination) -> Result<ProductPage, ApiError> {
        call(&self.http, "products.search", Self::search_request(term, page)).await
    }

    pub async fn by_category(
        &self,
        category: &str,
        page: Pagination,
    ) -> Result<ProductPage, ApiError> {
        let config = Self::by_category_request(category, page);
        call(&self.http, "products.by_category", config).await
    }

    pub async fn get(&self, id: u64) -> Result<Product, ApiError> {
        call(&self.http, "products.get", Self::get_request(id)).await
    }

    /// Fails with `ApiError::Validation` before any request when the draft
    /// is invalid.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        reject(validate_product(draft))?;
        call(&self.http, "products.create", Self::create_request(draft)?).await
    }

    /// Partial update. Only the fields present in `draft` are validated.
    pub async fn update(&self, id: u64, draft: &ProductDraft) -> Result<Product, ApiError> {
        reject(validate_product_changes(draft))?;
        call(&self.http, "products.update", Self::update_request(id, draft)?).await
    }

    pub async fn delete(&self, id: u64) -> Result<Deleted, ApiError> {
        call(&self.http, "products.delete", Self::delete_request(id)).await
    }

    /// Detailed categories (`slug`, `name`, `url`).
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        call(&self.http, "products.categories", Self::categories_request()).await
    }

    /// Category slugs only.
    pub async fn category_list(&self) -> Result<Vec<String>, ApiError> {
        call(&self.http, "products.category_list", Self::category_list_request()).await
    }

    pub fn sortable_fields() -> &'static [SortField] {
        PRODUCT_SORTABLE_FIELDS
    }
}

fn reject(problems: Vec<String>) -> Result<(), ApiError> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(problems))
    }
}
