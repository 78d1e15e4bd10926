//! Session management
//!
//! The token returned by login is persisted through the configured
//! `TokenStore`; the HTTP adapter reads it back for every request.

use std::sync::Arc;

use super::validation::ValidationService;
use crate::api::OfferApi;
use crate::error::Result;
use crate::store::{Action, Lifecycle, Store};
use crate::token::TokenStore;
use crate::types::{AppRoute, AuthInfo, AuthStatus, UserAuthInfo};

#[derive(Clone)]
pub struct AuthService {
    store: Store,
    api: Arc<dyn OfferApi>,
    tokens: Arc<dyn TokenStore>,
    validation: ValidationService,
}

impl AuthService {
    pub fn new(
        store: Store,
        api: Arc<dyn OfferApi>,
        tokens: Arc<dyn TokenStore>,
        validation: ValidationService,
    ) -> Self {
        Self {
            store,
            api,
            tokens,
            validation,
        }
    }

    /// Probe the session
    ///
    /// Never fails: any error, network ones included, just means the user
    /// is not signed in.
    pub async fn check_auth(&self) -> AuthStatus {
        self.store.dispatch(Action::CheckAuthOp(Lifecycle::Pending));

        let status = match self.api.check_login().await {
            Ok(()) => AuthStatus::Auth,
            Err(e) => {
                tracing::debug!("Session check failed: {}", e);
                AuthStatus::NoAuth
            }
        };
        self.store.dispatch(Action::SetAuthStatus(status));
        self.store.dispatch(Action::CheckAuthOp(Lifecycle::Fulfilled(())));
        status
    }

    /// Sign in and persist the session token
    pub async fn login(&self, auth: &AuthInfo) -> Result<UserAuthInfo> {
        self.validation.validate_login(auth)?;

        self.store.dispatch(Action::LoginOp(Lifecycle::Pending));
        match self.establish_session(auth).await {
            Ok(user) => {
                tracing::info!("Logged in as {}", auth.email);
                self.store.dispatch(Action::SetAuthStatus(AuthStatus::Auth));
                self.store.dispatch(Action::RedirectToRoute(AppRoute::Main));
                self.store.dispatch(Action::LoginOp(Lifecycle::Fulfilled(())));
                Ok(user)
            }
            Err(e) => {
                tracing::warn!("Login failed: {}", e);
                self.store
                    .dispatch(Action::LoginOp(Lifecycle::Rejected(e.to_string())));
                Err(e)
            }
        }
    }

    async fn establish_session(&self, auth: &AuthInfo) -> Result<UserAuthInfo> {
        let user = self.api.login(auth).await?;
        self.tokens.save(&user.token)?;
        Ok(user)
    }

    /// End the session and forget the stored token
    pub async fn logout(&self) -> Result<()> {
        self.store.dispatch(Action::LogoutOp(Lifecycle::Pending));
        match self.end_session().await {
            Ok(()) => {
                tracing::info!("Logged out");
                self.store.dispatch(Action::SetAuthStatus(AuthStatus::NoAuth));
                self.store.dispatch(Action::RedirectToRoute(AppRoute::Main));
                self.store.dispatch(Action::LogoutOp(Lifecycle::Fulfilled(())));
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Logout failed: {}", e);
                self.store
                    .dispatch(Action::LogoutOp(Lifecycle::Rejected(e.to_string())));
                Err(e)
            }
        }
    }

    async fn end_session(&self) -> Result<()> {
        self.api.logout().await?;
        self.tokens.clear()?;
        Ok(())
    }
}
