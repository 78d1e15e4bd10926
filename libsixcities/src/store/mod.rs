//! State container for six-cities
//!
//! Unidirectional data flow: consumers dispatch [`Action`]s into a [`Store`],
//! the pure [`reduce`] function computes the next immutable snapshot and
//! subscribers are notified with it.
//!
//! # Example
//!
//! ```
//! use libsixcities::store::{Action, Store};
//! use libsixcities::types::CityName;
//! use std::time::Duration;
//!
//! let store = Store::new(Duration::from_millis(2000));
//! store.dispatch(Action::ChangeCity(CityName::Amsterdam));
//! assert_eq!(store.state().city.name, CityName::Amsterdam);
//! ```

pub mod actions;
pub mod reducer;
pub mod selectors;
pub mod state;
pub mod views;

pub use actions::{Action, Lifecycle};
pub use reducer::reduce;
pub use selectors::{
    select_current_offer, select_nearby_offers, select_offer_info, select_reviews, MemoSelector,
    OfferPageSelectors,
};
pub use state::AppState;

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::api::ErrorSink;
use crate::types::AppRoute;

/// Snapshot receiver type alias
pub type StateReceiver = broadcast::Receiver<Arc<AppState>>;

const SUBSCRIBER_CAPACITY: usize = 64;

/// Shared handle to the single root state
///
/// Clones share the same state. `dispatch` is the only way to change it.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: RwLock<Arc<AppState>>,
    sender: broadcast::Sender<Arc<AppState>>,
    error_timeout: Duration,
}

impl Store {
    /// Create a store holding the initial state
    ///
    /// `error_timeout` is the delay after which `delete_error` clears the
    /// global error message.
    pub fn new(error_timeout: Duration) -> Self {
        Self::with_state(AppState::new(), error_timeout)
    }

    pub fn with_state(state: AppState, error_timeout: Duration) -> Self {
        let (sender, _) = broadcast::channel(SUBSCRIBER_CAPACITY);
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(Arc::new(state)),
                sender,
                error_timeout,
            }),
        }
    }

    /// Current immutable snapshot
    pub fn state(&self) -> Arc<AppState> {
        let guard = self.inner.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Run `action` through the reducer and publish the result
    ///
    /// Subscribers only hear about snapshots whose identity changed.
    pub fn dispatch(&self, action: Action) -> Arc<AppState> {
        tracing::debug!(action = %action.tag(), "dispatch");

        let (next, changed) = {
            let mut guard = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
            let next = reduce(&guard, action);
            let changed = !Arc::ptr_eq(&guard, &next);
            *guard = Arc::clone(&next);
            (next, changed)
        };

        if changed {
            // Err only means nobody is listening
            let _ = self.inner.sender.send(Arc::clone(&next));
        }
        next
    }

    /// Take the pending navigation request, leaving none behind
    pub fn take_redirect(&self) -> Option<AppRoute> {
        let route = self.state().redirect.clone()?;
        self.dispatch(Action::ClearRedirect);
        Some(route)
    }

    /// Receive every snapshot produced after this call
    pub fn subscribe(&self) -> StateReceiver {
        self.inner.sender.subscribe()
    }

    pub fn error_timeout(&self) -> Duration {
        self.inner.error_timeout
    }

    /// Schedule clearing of the global error message
    ///
    /// A later call does not cancel an earlier one; whichever timer fires
    /// clears whatever message is current at that moment. Returns `None`
    /// when called outside a tokio runtime, in which case nothing is
    /// scheduled.
    pub fn delete_error(&self) -> Option<JoinHandle<()>> {
        let handle = tokio::runtime::Handle::try_current().ok()?;
        let store = self.clone();
        let delay = self.inner.error_timeout;

        Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            store.dispatch(Action::SetError(None));
        }))
    }

    /// Show `message` on the global error channel and schedule its removal
    pub fn process_error(&self, message: impl Into<String>) -> Option<JoinHandle<()>> {
        self.dispatch(Action::SetError(Some(message.into())));
        self.delete_error()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(crate::config::UiConfig::default().error_timeout())
    }
}

impl ErrorSink for Store {
    fn report(&self, message: &str) {
        self.process_error(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CityName, SortOption};

    #[test]
    fn test_dispatch_updates_state() {
        let store = Store::new(Duration::from_millis(10));
        store.dispatch(Action::ChangeCity(CityName::Hamburg));
        store.dispatch(Action::SetSortOption(SortOption::TopRatedFirst));

        let state = store.state();
        assert_eq!(state.city.name, CityName::Hamburg);
        assert_eq!(state.sort_option, SortOption::TopRatedFirst);
    }

    #[test]
    fn test_clones_share_state() {
        let store = Store::new(Duration::from_millis(10));
        let other = store.clone();
        other.dispatch(Action::SetError(Some("boom".to_string())));
        assert_eq!(store.state().error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn test_subscribers_skip_noop_dispatch() {
        let store = Store::new(Duration::from_millis(10));
        let mut receiver = store.subscribe();

        store.dispatch(Action::GetOffersOp(Lifecycle::Pending));
        store.dispatch(Action::SetIsFetchingOffers(true));

        let snapshot = receiver.recv().await.unwrap();
        assert!(snapshot.is_fetch_offers);
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_error_clears_after_timeout() {
        let store = Store::new(Duration::from_millis(2000));
        let handle = store.process_error("Offer not found").unwrap();

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(store.state().error.as_deref(), Some("Offer not found"));

        handle.await.unwrap();
        assert!(store.state().error.is_none());
    }

    #[test]
    fn test_take_redirect_consumes_request() {
        let store = Store::new(Duration::from_millis(10));
        assert_eq!(store.take_redirect(), None);

        store.dispatch(Action::RedirectToRoute(AppRoute::Main));
        assert_eq!(store.take_redirect(), Some(AppRoute::Main));
        assert_eq!(store.take_redirect(), None);
        assert!(store.state().redirect.is_none());
    }

    #[test]
    fn test_delete_error_outside_runtime() {
        let store = Store::new(Duration::from_millis(10));
        assert!(store.delete_error().is_none());
    }
}
