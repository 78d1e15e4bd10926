//! Application state
//!
//! Immutable snapshot; all transitions happen through the reducer
//! (see `reducer.rs`). Collections sit behind `Arc` so a transition that
//! leaves a slice alone keeps that slice's identity.

use std::sync::Arc;

use crate::types::{AppRoute, AuthStatus, City, CityName, CurrentOfferBundle, Offer, SortOption};

/// Root application state
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Selected city, always carrying its canonical location
    pub city: City,

    /// Full unfiltered offer collection
    pub offers: Arc<Vec<Offer>>,

    pub sort_option: SortOption,

    pub auth_status: AuthStatus,

    pub is_fetch_offers: bool,

    pub is_fetch_single_offer: bool,

    /// Global error message
    pub error: Option<String>,

    /// Detail page bundle
    pub current_offer: Arc<CurrentOfferBundle>,

    /// Pending navigation request
    ///
    /// Set by redirects, consumed through `Store::take_redirect`.
    pub redirect: Option<AppRoute>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            city: City::canonical(CityName::Paris),
            offers: Arc::new(Vec::new()),
            sort_option: SortOption::Popular,
            auth_status: AuthStatus::Unknown,
            is_fetch_offers: false,
            is_fetch_single_offer: false,
            error: None,
            current_offer: Arc::new(CurrentOfferBundle::default()),
            redirect: None,
        }
    }
}

impl AppState {
    /// Create new application state with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authorized(&self) -> bool {
        self.auth_status == AuthStatus::Auth
    }
}
