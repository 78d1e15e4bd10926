//! Six cities - rental offers client core
//!
//! This library holds the state container, the backend client and the
//! session handling behind the six-cities rental listings front end.

pub mod api;
pub mod cities;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod store;
pub mod token;
pub mod types;

// Re-export commonly used types
pub use api::{HttpApi, MockApi, OfferApi};
pub use cities::CITIES;
pub use config::Config;
pub use error::{ApiError, Result, SixCitiesError};
pub use service::SixCitiesService;
pub use store::{Action, AppState, Lifecycle, Store};
pub use token::{create_token_store, TokenStore};
pub use types::{
    AuthStatus, City, CityName, CurrentOfferBundle, DetailedOffer, Offer, Review, SortOption,
};
