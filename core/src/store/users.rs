//! User listing and detail state.

use tokio::sync::watch;
use tracing::warn;

use crate::api::UsersApi;
use crate::error::ApiError;
use crate::types::{Pagination, SortOrder, User, UserDraft, UserQuery};

use super::{settle_all, track, Activity, InFlight, PageState, Selection, Tracked};

/// Listing filters. Empty strings mean "not set"; `key` and `value` only
/// apply together, e.g. `hair.color` = `Brown`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilters {
    pub search: String,
    pub key: String,
    pub value: String,
    pub sort_by: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub users: Vec<User>,
    pub current: Option<User>,
    pub page: PageState,
    pub filters: UserFilters,
    pub in_flight: InFlight,
    pub selected: Selection,
}

impl Tracked for UserState {
    fn in_flight_mut(&mut self) -> &mut InFlight {
        &mut self.in_flight
    }
}

impl UserState {
    pub fn query(&self) -> UserQuery {
        let set = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        let sort_by = set(&self.filters.sort_by);
        UserQuery {
            limit: Some(self.page.items_per_page),
            skip: Some(self.page.skip()),
            search: set(&self.filters.search),
            key: set(&self.filters.key),
            value: set(&self.filters.value),
            order: sort_by.as_ref().map(|_| self.filters.order),
            sort_by,
        }
    }

    fn pagination(&self) -> Pagination {
        Pagination {
            limit: Some(self.page.items_per_page),
            skip: Some(self.page.skip()),
        }
    }
}

pub struct UserStore {
    api: UsersApi,
    state: watch::Sender<UserState>,
}

impl UserStore {
    pub fn new(api: UsersApi) -> Self {
        Self {
            api,
            state: watch::Sender::new(UserState::default()),
        }
    }

    pub fn snapshot(&self) -> UserState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UserState> {
        self.state.subscribe()
    }

    pub async fn fetch_users(&self) -> Result<(), ApiError> {
        let query = self.state.borrow().query();
        track(
            &self.state,
            Activity::Loading,
            "fetch users",
            self.api.list(&query),
            |s, page| {
                s.users = page.users;
                s.page.set_total(page.total);
            },
        )
        .await
    }

    pub async fn fetch_user(&self, id: u64) -> Result<(), ApiError> {
        track(
            &self.state,
            Activity::Loading,
            "fetch user",
            self.api.get(id),
            |s, user| s.current = Some(user),
        )
        .await
    }

    /// One-off search on the current page without touching the filters.
    pub async fn search(&self, term: &str) -> Result<(), ApiError> {
        let page = self.state.borrow().pagination();
        track(
            &self.state,
            Activity::Loading,
            "search users",
            self.api.search(term, page),
            |s, page| {
                s.users = page.users;
                s.page.set_total(page.total);
            },
        )
        .await
    }

    pub async fn create(&self, draft: &UserDraft) -> Result<(), ApiError> {
        track(
            &self.state,
            Activity::Creating,
            "create user",
            self.api.create(draft),
            |_, _| {},
        )
        .await?;
        if let Err(err) = self.fetch_users().await {
            warn!(%err, "reload after create failed");
        }
        Ok(())
    }

    pub async fn update(&self, id: u64, draft: &UserDraft) -> Result<(), ApiError> {
        track(
            &self.state,
            Activity::Updating,
            "update user",
            self.api.update(id, draft),
            |s, updated: User| {
                for user in s.users.iter_mut().filter(|u| u.id == id) {
                    *user = updated.clone();
                }
                if s.current.as_ref().is_some_and(|u| u.id == id) {
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
            "delete user",
            self.api.delete(id),
            |s, _| {
                s.users.retain(|u| u.id != id);
                s.selected.deselect(id);
            },
        )
        .await
    }

    /// All-or-nothing from the caller's side, like `ProductStore::delete_many`.
    pub async fn delete_many(&self, ids: &[u64]) -> Result<(), ApiError> {
        let calls = settle_all(ids.iter().map(|&id| self.api.delete(id)));
        track(
            &self.state,
            Activity::Deleting,
            "delete users",
            calls,
            |s, _| {
                s.users.retain(|u| !ids.contains(&u.id));
                s.selected.clear();
            },
        )
        .await
    }

    pub async fn set_filters(&self, edit: impl FnOnce(&mut UserFilters)) -> Result<(), ApiError> {
        self.state.send_modify(|s| {
            edit(&mut s.filters);
            s.page.current_page = 1;
            s.selected.clear();
        });
        self.fetch_users().await
    }

    pub async fn set_page(&self, page: u32) -> Result<(), ApiError> {
        self.state.send_modify(|s| {
            s.page.current_page = page.max(1);
            s.selected.clear();
        });
        self.fetch_users().await
    }

    pub async fn reset_filters(&self) -> Result<(), ApiError> {
        self.set_filters(|filters| *filters = UserFilters::default()).await
    }

    pub fn select(&self, id: u64) {
        self.state.send_modify(|s| s.selected.select(id));
    }

    pub fn deselect(&self, id: u64) {
        self.state.send_modify(|s| s.selected.deselect(id));
    }

    pub fn select_all(&self) {
        self.state.send_modify(|s| {
            let ids: Vec<u64> = s.users.iter().map(|u| u.id).collect();
            s.selected.replace(ids);
        });
    }

    pub fn clear_selection(&self) {
        self.state.send_modify(|s| s.selected.clear());
    }

    pub fn set_current(&self, user: Option<User>) {
        self.state.send_modify(|s| s.current = user);
    }

    pub fn clear_current(&self) {
        self.set_current(None);
    }
}
