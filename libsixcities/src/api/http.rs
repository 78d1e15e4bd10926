//! REST client for the six-cities backend

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{ApiResult, ApiRoute, ErrorResponse, ErrorSink, OfferApi, TOKEN_HEADER};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::token::TokenStore;
use crate::types::{
    AuthInfo, CommentInfo, DetailedOffer, FavoriteStatus, Offer, Review, UserAuthInfo,
};

/// Whether a failed reply goes to the error sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reporting {
    Report,
    Quiet,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// `reqwest`-backed [`OfferApi`]
///
/// The token is read from the token store on every request, so a login or
/// logout is picked up without rebuilding the client.
pub struct HttpApi {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    errors: Arc<dyn ErrorSink>,
}

impl HttpApi {
    pub fn new(
        config: &ApiConfig,
        tokens: Arc<dyn TokenStore>,
        errors: Arc<dyn ErrorSink>,
    ) -> ApiResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
            errors,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn current_token(&self) -> Option<String> {
        match self.tokens.load() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(
                    "Failed to read token from {} store, sending request without it: {}",
                    self.tokens.backend_name(),
                    e
                );
                None
            }
        }
    }

    fn request(&self, method: Method, route: ApiRoute<'_>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, route.path());
        let mut req = self.client.request(method, url);
        if let Some(token) = self.current_token() {
            req = req.header(TOKEN_HEADER, token);
        }
        req
    }

    async fn execute(&self, request: RequestBuilder, reporting: Reporting) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string()),
        };

        if status.is_client_error() && reporting == Reporting::Report {
            self.errors.report(&message);
        }
        tracing::debug!("Request failed with {}: {}", status, message);

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, route: ApiRoute<'_>) -> ApiResult<T> {
        let response = self
            .execute(self.request(Method::GET, route), Reporting::Report)
            .await?;
        Ok(response.json().await?)
    }

    async fn post_json<T, B>(&self, route: ApiRoute<'_>, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let request = self.request(Method::POST, route).json(body);
        let response = self.execute(request, Reporting::Report).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl OfferApi for HttpApi {
    async fn fetch_offers(&self) -> ApiResult<Vec<Offer>> {
        self.get_json(ApiRoute::Offers).await
    }

    async fn fetch_offer(&self, id: &str) -> ApiResult<DetailedOffer> {
        self.get_json(ApiRoute::Offer(id)).await
    }

    async fn fetch_nearby(&self, id: &str) -> ApiResult<Vec<Offer>> {
        self.get_json(ApiRoute::Nearby(id)).await
    }

    async fn fetch_reviews(&self, id: &str) -> ApiResult<Vec<Review>> {
        self.get_json(ApiRoute::Comments(id)).await
    }

    async fn post_review(&self, id: &str, comment: &CommentInfo) -> ApiResult<Review> {
        self.post_json(ApiRoute::Comments(id), comment).await
    }

    async fn set_favorite(&self, id: &str, status: FavoriteStatus) -> ApiResult<DetailedOffer> {
        let request = self.request(Method::POST, ApiRoute::Favorite(id, status));
        let response = self.execute(request, Reporting::Report).await?;
        Ok(response.json().await?)
    }

    async fn check_login(&self) -> ApiResult<()> {
        self.execute(self.request(Method::GET, ApiRoute::Login), Reporting::Quiet)
            .await?;
        Ok(())
    }

    async fn login(&self, auth: &AuthInfo) -> ApiResult<UserAuthInfo> {
        let body = LoginBody {
            email: &auth.email,
            password: auth.password(),
        };
        self.post_json(ApiRoute::Login, &body).await
    }

    async fn logout(&self) -> ApiResult<()> {
        self.execute(self.request(Method::DELETE, ApiRoute::Logout), Reporting::Report)
            .await?;
        Ok(())
    }
}
