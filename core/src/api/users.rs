//! `/users` endpoints.

use std::sync::Arc;

use crate::client::HttpClient;
use crate::error::ApiError;
use crate::request::{QueryParams, RequestConfig};
use crate::types::{Deleted, Pagination, SortField, User, UserDraft, UserPage, UserQuery};

use super::{call, json_body, non_blank, push_page};

/// Columns the user listing can be sorted by.
pub const USER_SORTABLE_FIELDS: &[SortField] = &[
    SortField { value: "firstName", label: "First Name" },
    SortField { value: "lastName", label: "Last Name" },
    SortField { value: "email", label: "Email" },
    SortField { value: "age", label: "Age" },
    SortField { value: "height", label: "Height" },
    SortField { value: "weight", label: "Weight" },
];

/// Known values for the common user filter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserFilterOptions {
    pub gender: &'static [&'static str],
    pub blood_group: &'static [&'static str],
    pub eye_color: &'static [&'static str],
    pub hair_color: &'static [&'static str],
    pub hair_type: &'static [&'static str],
    pub role: &'static [&'static str],
}

pub const USER_FILTER_OPTIONS: UserFilterOptions = UserFilterOptions {
    gender: &["male", "female"],
    blood_group: &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"],
    eye_color: &["Brown", "Blue", "Green", "Gray", "Amber", "Hazel"],
    hair_color: &["Black", "Brown", "Blonde", "Red", "Gray", "White"],
    hair_type: &["Straight", "Wavy", "Curly", "Kinky"],
    role: &["admin", "moderator", "user"],
};

#[derive(Clone)]
pub struct UsersApi {
    http: Arc<HttpClient>,
}

impl UsersApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }

    /// Route a listing query: search beats filter, filter (key and value
    /// both present) beats the default listing.
    pub fn list_request(query: &UserQuery) -> RequestConfig {
        let page = Pagination {
            limit: query.limit,
            skip: query.skip,
        };
        if let Some(term) = non_blank(query.search.as_deref()) {
            return Self::search_request(term, page);
        }
        if let (Some(key), Some(value)) = (
            non_blank(query.key.as_deref()),
            non_blank(query.value.as_deref()),
        ) {
            return Self::filter_request(key, value, page);
        }

        let mut params = QueryParams::new();
        push_page(&mut params, page);
        params.push_opt("sortBy", query.sort_by.as_deref());
        params.push_opt("order", query.order);
        RequestConfig::get("/users").with_params(params)
    }

    pub fn search_request(term: &str, page: Pagination) -> RequestConfig {
        let mut params = QueryParams::new();
        params.push("q", term.trim());
        push_page(&mut params, page);
        RequestConfig::get("/users/search").with_params(params)
    }

    pub fn filter_request(key: &str, value: &str, page: Pagination) -> RequestConfig {
        let mut params = QueryParams::new();
        params.push("key", key.trim());
        params.push("value", value.trim());
        push_page(&mut params, page);
        RequestConfig::get("/users/filter").with_params(params)
    }

    pub fn get_request(id: u64) -> RequestConfig {
        RequestConfig::get(format!("/users/{id}"))
    }

    pub fn create_request(draft: &UserDraft) -> Result<RequestConfig, ApiError> {
        Ok(RequestConfig::post("/users/add", json_body(draft)?))
    }

    pub fn update_request(id: u64, draft: &UserDraft) -> Result<RequestConfig, ApiError> {
        Ok(RequestConfig::put(format!("/users/{id}"), json_body(draft)?))
    }

    pub fn delete_request(id: u64) -> RequestConfig {
        RequestConfig::delete(format!("/users/{id}"))
    }

    pub async fn list(&self, query: &UserQuery) -> Result<UserPage, ApiError> {
        call(&self.http, "users.list", Self::list_request(query)).await
    }

    pub async fn search(&self, term: &str, page: Pagination) -> Result<UserPage, ApiError> {
        call(&self.http, "users.search", Self::search_request(term, page)).await
    }

    pub async fn filter(
        &self,
        key: &str,
        value: &str,
        page: Pagination,
    ) -> Result<UserPage, ApiError> {
        call(&self.http, "users.filter", Self::filter_request(key, value, page)).await
    }

    pub async fn get(&self, id: u64) -> Result<User, ApiError> {
        call(&self.http, "users.get", Self::get_request(id)).await
    }

    pub async fn create(&self, draft: &UserDraft) -> Result<User, ApiError> {
        call(&self.http, "users.create", Self::create_request(draft)?).await
    }

    pub async fn update(&self, id: u64, draft: &UserDraft) -> Result<User, ApiError> {
        call(&self.http, "users.update", Self::update_request(id, draft)?).await
    }

    pub async fn delete(&self, id: u64) -> Result<Deleted, ApiError> {
        call(&self.http, "users.delete", Self::delete_request(id)).await
    }

    pub fn filter_options() -> UserFilterOptions {
        USER_FILTER_OPTIONS
    }

    pub fn sortable_fields() -> &'static [SortField] {
        USER_SORTABLE_FIELDS
    }
}
