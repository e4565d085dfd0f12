//! Observable view-model stores for the listing and detail screens.
//!
//! # Design
//! Each store owns its state behind a `tokio::sync::watch` channel. Actions
//! are async methods that mark an in-flight flag, call the domain client,
//! and commit the result together with clearing the flag in one
//! `send_modify`, so subscribers never observe a half-applied update.
//! Failures clear the flag and are returned unchanged.
//!
//! Concurrent actions on the same store are not sequenced; the last commit
//! wins.

pub mod products;
pub mod users;

use std::future::Future;

use futures::future::join_all;
use tokio::sync::watch;
use tracing::error;

use crate::error::ApiError;

pub use products::{ProductFilters, ProductState, ProductStore};
pub use users::{UserFilters, UserState, UserStore};

pub const DEFAULT_ITEMS_PER_PAGE: u32 = 10;

/// Pagination of a listing. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl Default for PageState {
    fn default() -> Self {
        Self::with_items_per_page(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl PageState {
    pub fn with_items_per_page(items_per_page: u32) -> Self {
        Self {
            current_page: 1,
            items_per_page,
            total_items: 0,
            total_pages: 0,
        }
    }

    /// Offset of the first item on the current page. Saturates at `u32::MAX`.
    pub fn skip(&self) -> u32 {
        let offset =
            u64::from(self.current_page.saturating_sub(1)) * u64::from(self.items_per_page);
        u32::try_from(offset).unwrap_or(u32::MAX)
    }

    pub fn set_total(&mut self, total: u64) {
        self.total_items = total;
        self.total_pages = match self.items_per_page {
            0 => 0,
            per_page => total.div_ceil(u64::from(per_page)),
        };
    }
}

/// Which request a store is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activity {
    Loading,
    Creating,
    Updating,
    Deleting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InFlight {
    pub is_loading: bool,
    pub is_creating: bool,
    pub is_updating: bool,
    pub is_deleting: bool,
}

impl InFlight {
    pub fn set(&mut self, activity: Activity, on: bool) {
        match activity {
            Activity::Loading => self.is_loading = on,
            Activity::Creating => self.is_creating = on,
            Activity::Updating => self.is_updating = on,
            Activity::Deleting => self.is_deleting = on,
        }
    }

    pub fn any(&self) -> bool {
        self.is_loading || self.is_creating || self.is_updating || self.is_deleting
    }
}

/// Selected entity ids, in the order they were selected, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(Vec<u64>);

impl Selection {
    pub fn select(&mut self, id: u64) {
        if !self.0.contains(&id) {
            self.0.push(id);
        }
    }

    pub fn deselect(&mut self, id: u64) {
        self.0.retain(|selected| *selected != id);
    }

    pub fn replace(&mut self, ids: impl IntoIterator<Item = u64>) {
        self.0.clear();
        for id in ids {
            self.select(id);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn contains(&self, id: u64) -> bool {
        self.0.contains(&id)
    }

    pub fn ids(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Drive every call to completion, then report the first failure in input
/// order. No call is dropped early because a sibling failed.
pub(crate) async fn settle_all<T, F>(
    calls: impl IntoIterator<Item = F>,
) -> Result<Vec<T>, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    join_all(calls).await.into_iter().collect()
}

/// Store state with in-flight flags.
pub(crate) trait Tracked {
    fn in_flight_mut(&mut self) -> &mut InFlight;
}

/// Run `work` with `activity` marked in flight. On success `commit` applies
/// the result in the same update that clears the flag.
pub(crate) async fn track<S, T, F, C>(
    state: &watch::Sender<S>,
    activity: Activity,
    operation: &str,
    work: F,
    commit: C,
) -> Result<(), ApiError>
where
    S: Tracked,
    F: Future<Output = Result<T, ApiError>>,
    C: FnOnce(&mut S, T),
{
    state.send_modify(|s| s.in_flight_mut().set(activity, true));
    match work.await {
        Ok(value) => {
            state.send_modify(|s| {
                commit(s, value);
                s.in_flight_mut().set(activity, false);
            });
            Ok(())
        }
        Err(err) => {
            state.send_modify(|s| s.in_flight_mut().set(activity, false));
            error!(operation, %err, "store action failed");
            Err(err)
        }
    }
}
