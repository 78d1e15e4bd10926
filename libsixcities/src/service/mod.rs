//! Service layer for six-cities
//!
//! The asynchronous operations of the client live here. Each one talks to
//! the backend through an [`OfferApi`] and reports every step to the
//! [`Store`], which stays the single owner of application state.
//!
//! # Architecture
//!
//! `SixCitiesService` is a facade over specialized sub-services:
//!
//! - `OffersService`: offer list, detail page bundle, favorites
//! - `ReviewsService`: review submission
//! - `AuthService`: session check, login, logout
//! - `ValidationService`: client-side form checks
//!
//! # Example
//!
//! ```no_run
//! use libsixcities::service::SixCitiesService;
//! use libsixcities::Config;
//!
//! # async fn example() -> libsixcities::Result<()> {
//! let service = SixCitiesService::new(&Config::load_or_default()?)?;
//!
//! service.auth().check_auth().await;
//! service.offers().get_offers().await?;
//!
//! println!("{} offers loaded", service.store().state().offers.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod offers;
pub mod reviews;
pub mod validation;

use std::sync::Arc;

use self::auth::AuthService;
use self::offers::OffersService;
use self::reviews::ReviewsService;
use self::validation::ValidationService;
use crate::api::{HttpApi, OfferApi};
use crate::store::{StateReceiver, Store};
use crate::token::{create_token_store, TokenStore};
use crate::{Config, Result};

/// Main service facade
///
/// All sub-services share one `Store`, one `OfferApi` and one `TokenStore`.
pub struct SixCitiesService {
    store: Store,
    tokens: Arc<dyn TokenStore>,
    offers: OffersService,
    reviews: ReviewsService,
    auth: AuthService,
    validation: ValidationService,
}

impl SixCitiesService {
    /// Wire the HTTP backend, the configured token store and a fresh store
    ///
    /// The store doubles as the HTTP adapter's error sink, so 4xx replies
    /// show up on the global error channel.
    pub fn new(config: &Config) -> Result<Self> {
        let store = Store::new(config.ui.error_timeout());
        let tokens = create_token_store(&config.token)?;
        let api = HttpApi::new(&config.api, Arc::clone(&tokens), Arc::new(store.clone()))?;
        tracing::debug!("Using backend at {}", api.base_url());

        Ok(Self::from_parts(store, Arc::new(api), tokens))
    }

    /// Build the facade around existing parts
    pub fn from_parts(store: Store, api: Arc<dyn OfferApi>, tokens: Arc<dyn TokenStore>) -> Self {
        let validation = ValidationService::new(store.clone());
        let offers = OffersService::new(store.clone(), Arc::clone(&api));
        let reviews = ReviewsService::new(store.clone(), Arc::clone(&api), validation.clone());
        let auth = AuthService::new(
            store.clone(),
            api,
            Arc::clone(&tokens),
            validation.clone(),
        );

        Self {
            store,
            tokens,
            offers,
            reviews,
            auth,
            validation,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn tokens(&self) -> &dyn TokenStore {
        self.tokens.as_ref()
    }

    pub fn offers(&self) -> &OffersService {
        &self.offers
    }

    pub fn reviews(&self) -> &ReviewsService {
        &self.reviews
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn validation(&self) -> &ValidationService {
        &self.validation
    }

    /// Subscribe to state snapshots
    pub fn subscribe(&self) -> StateReceiver {
        self.store.subscribe()
    }
}
