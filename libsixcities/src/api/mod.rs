//! Backend API abstraction
//!
//! This module defines the `OfferApi` trait with one method per backend
//! endpoint. Two implementations are provided:
//!
//! - [`http::HttpApi`]: the real REST client on `reqwest`
//! - [`mock::MockApi`]: canned responses for tests (available for all builds)
//!
//! Services only depend on the trait, so the store logic can be exercised
//! without a network.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ApiError;
use crate::types::{
    AuthInfo, CommentInfo, DetailedOffer, FavoriteStatus, Offer, Review, UserAuthInfo,
};

pub mod http;
pub mod mock;

pub use http::HttpApi;
pub use mock::MockApi;

/// Result alias for backend calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Header carrying the session token
pub const TOKEN_HEADER: &str = "X-Token";

/// Receiver for user-facing error messages
///
/// The HTTP adapter reports every 4xx reply here before the error is
/// returned to the caller.
pub trait ErrorSink: Send + Sync {
    fn report(&self, message: &str);
}

/// Error body sent by the backend on 4xx replies
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "errorType", alias = "type", default)]
    pub error_type: String,
    pub message: String,
}

/// Backend endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRoute<'a> {
    Offers,
    Offer(&'a str),
    Nearby(&'a str),
    Comments(&'a str),
    Favorite(&'a str, FavoriteStatus),
    Login,
    Logout,
}

impl ApiRoute<'_> {
    pub fn path(&self) -> String {
        match self {
            ApiRoute::Offers => "/offers".to_string(),
            ApiRoute::Offer(id) => format!("/offers/{}", id),
            ApiRoute::Nearby(id) => format!("/offers/{}/nearby", id),
            ApiRoute::Comments(id) => format!("/comments/{}", id),
            ApiRoute::Favorite(id, status) => {
                format!("/favorite/{}/{}", id, status.as_path_segment())
            }
            ApiRoute::Login => "/login".to_string(),
            ApiRoute::Logout => "/logout".to_string(),
        }
    }
}

/// Six-cities backend
#[async_trait]
pub trait OfferApi: Send + Sync {
    /// GET /offers
    async fn fetch_offers(&self) -> ApiResult<Vec<Offer>>;

    /// GET /offers/{id}
    async fn fetch_offer(&self, id: &str) -> ApiResult<DetailedOffer>;

    /// GET /offers/{id}/nearby
    async fn fetch_nearby(&self, id: &str) -> ApiResult<Vec<Offer>>;

    /// GET /comments/{id}
    async fn fetch_reviews(&self, id: &str) -> ApiResult<Vec<Review>>;

    /// POST /comments/{id}
    async fn post_review(&self, id: &str, comment: &CommentInfo) -> ApiResult<Review>;

    /// POST /favorite/{id}/{0|1}
    async fn set_favorite(&self, id: &str, status: FavoriteStatus) -> ApiResult<DetailedOffer>;

    /// GET /login
    ///
    /// Session probe. Failures are an expected outcome and are never
    /// reported to the error sink.
    async fn check_login(&self) -> ApiResult<()>;

    /// POST /login
    async fn login(&self, auth: &AuthInfo) -> ApiResult<UserAuthInfo>;

    /// DELETE /logout
    async fn logout(&self) -> ApiResult<()>;
}
