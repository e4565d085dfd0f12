//! Ordered request and response interceptor chains.
//!
//! # Design
//! A chain is a list of optional slots. `register` appends and returns the
//! slot index as an `InterceptorId`; `eject` nulls the slot in place, so the
//! ids of other registrations never shift and an id is never handed out
//! twice. Calls take a snapshot of the active handlers when they start, so
//! registering or ejecting mid-flight only affects later calls.
//!
//! Handlers run strictly in registration order within a phase.
//!
//! Both interceptor traits give every method a pass-through default, which is
//! how a registration leaves its success or failure transform unset.

mod auth;
mod logging;
mod session_guard;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::error::TransportError;
use crate::request::RequestConfig;
use crate::response::Response;

pub use auth::AuthHeader;
pub use logging::TrafficLogger;
pub use session_guard::SessionGuard;

/// Stable handle for one registration in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterceptorId(usize);

impl InterceptorId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Transform applied to every request before dispatch.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Return the (possibly modified) config, or fail to abort the call.
    async fn on_request(&self, config: RequestConfig) -> Result<RequestConfig, TransportError> {
        Ok(config)
    }

    /// Invoked with the error when this handler's own `on_request` fails.
    async fn on_request_error(&self, _error: &TransportError) {}
}

/// Transform applied to every response, with a chance to recover failures.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    async fn on_response(&self, response: Response) -> Result<Response, TransportError> {
        Ok(response)
    }

    /// Return `Ok` to recover the call with a substitute response. Returning
    /// `Err` passes the failure on to the next handler.
    async fn on_error(&self, error: &TransportError) -> Result<Response, TransportError> {
        Err(error.clone())
    }
}

/// Ordered slots of handlers of type `H`.
pub struct InterceptorChain<H: ?Sized> {
    slots: RwLock<Vec<Option<Arc<H>>>>,
}

impl<H: ?Sized> InterceptorChain<H> {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(Vec::new()),
        }
    }

    pub fn register(&self, handler: Arc<H>) -> InterceptorId {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        slots.push(Some(handler));
        InterceptorId(slots.len() - 1)
    }

    /// Null the slot for `id`. Returns false if it was already empty or unknown.
    pub fn eject(&self, id: InterceptorId) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        match slots.get_mut(id.0) {
            Some(slot) => slot.take().is_some(),
            None => false,
        }
    }

    /// Active handlers in registration order.
    pub fn snapshot(&self) -> Vec<Arc<H>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.iter().flatten().cloned().collect()
    }

    /// Number of slots ever handed out, ejected ones included.
    pub fn slot_count(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn active_count(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }
}

impl<H: ?Sized> Default for InterceptorChain<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> fmt::Debug for InterceptorChain<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("slots", &self.slot_count())
            .field("active", &self.active_count())
            .finish()
    }
}

/// The two chains owned by an `HttpClient`.
#[derive(Debug, Default)]
pub struct Interceptors {
    pub request: InterceptorChain<dyn RequestInterceptor>,
    pub response: InterceptorChain<dyn ResponseInterceptor>,
}

pub(crate) async fn run_request_phase(
    handlers: &[Arc<dyn RequestInterceptor>],
    mut config: RequestConfig,
) -> Result<RequestConfig, TransportError> {
    for handler in handlers {
        match handler.on_request(config).await {
            Ok(next) => config = next,
            Err(error) => {
                handler.on_request_error(&error).await;
                return Err(error);
            }
        }
    }
    Ok(config)
}

/// Success path. A handler that fails gets its own `on_error` as a chance to
/// recover; a recovered response ends the phase and later handlers are skipped.
pub(crate) async fn run_response_phase(
    handlers: &[Arc<dyn ResponseInterceptor>],
    mut response: Response,
) -> Result<Response, TransportError> {
    for handler in handlers {
        match handler.on_response(response).await {
            Ok(next) => response = next,
            Err(error) => match handler.on_error(&error).await {
                Ok(recovered) => return Ok(recovered),
                Err(_) => return Err(error),
            },
        }
    }
    Ok(response)
}

/// Failure path. The first handler whose `on_error` succeeds decides the
/// outcome; if none does, the original error propagates.
pub(crate) async fn run_error_phase(
    handlers: &[Arc<dyn ResponseInterceptor>],
    error: TransportError,
) -> Result<Response, TransportError> {
    for handler in handlers {
        match handler.on_error(&error).await {
            Ok(recovered) => return Ok(recovered),
            Err(rejected) => debug!(%rejected, "response interceptor did not recover"),
        }
    }
    Err(error)
}
