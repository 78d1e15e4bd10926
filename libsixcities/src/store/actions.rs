//! Actions for the reducer pattern
//!
//! All state transitions are triggered by actions. Synchronous actions carry
//! plain data; asynchronous operations report each phase of their lifecycle
//! through a `Lifecycle` payload.

use crate::types::{
    AppRoute, AuthStatus, CityName, CurrentOfferBundle, DetailedOffer, Offer, Review, SortOption,
};

/// Phase of an asynchronous operation
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle<T> {
    /// Operation started
    Pending,

    /// Operation settled with a value
    Fulfilled(T),

    /// Operation settled with a failure reason
    Rejected(String),
}

impl<T> Lifecycle<T> {
    pub fn phase(&self) -> &'static str {
        match self {
            Lifecycle::Pending => "pending",
            Lifecycle::Fulfilled(_) => "fulfilled",
            Lifecycle::Rejected(_) => "rejected",
        }
    }
}

/// Actions that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // === Synchronous ===
    /// Select a city; its location is reset to the canonical one
    ChangeCity(CityName),

    /// Replace the full offer collection
    SetOffers(Vec<Offer>),

    SetSortOption(SortOption),

    SetAuthStatus(AuthStatus),

    /// Set or clear the global error message
    SetError(Option<String>),

    SetIsFetchingOffers(bool),

    /// Replace the current offer bundle wholesale
    GetOfferInfo(CurrentOfferBundle),

    /// Append a freshly submitted review to the current bundle
    AppendReview(Review),

    /// Request navigation
    RedirectToRoute(AppRoute),

    /// Mark the pending navigation request as handled
    ClearRedirect,

    // === Asynchronous lifecycles ===
    GetOffersOp(Lifecycle<()>),

    GetOfferInfoOp(Lifecycle<CurrentOfferBundle>),

    SendReviewOp(Lifecycle<()>),

    AddFavouriteOp(Lifecycle<DetailedOffer>),

    CheckAuthOp(Lifecycle<()>),

    LoginOp(Lifecycle<()>),

    LogoutOp(Lifecycle<()>),
}

impl Action {
    /// Stable type tag, used in logs
    pub fn tag(&self) -> String {
        match self {
            Action::ChangeCity(_) => "ChangeCity".to_string(),
            Action::SetOffers(_) => "SetOffers".to_string(),
            Action::SetSortOption(_) => "SetSortOption".to_string(),
            Action::SetAuthStatus(_) => "SetAuthStatus".to_string(),
            Action::SetError(_) => "SetError".to_string(),
            Action::SetIsFetchingOffers(_) => "SetIsFetchOffers".to_string(),
            Action::GetOfferInfo(_) => "GetOfferInfo".to_string(),
            Action::AppendReview(_) => "SendReview".to_string(),
            Action::RedirectToRoute(_) => "RedirectToRoute".to_string(),
            Action::ClearRedirect => "ClearRedirect".to_string(),
            Action::GetOffersOp(l) => format!("offer/getOffers/{}", l.phase()),
            Action::GetOfferInfoOp(l) => format!("offer/getOfferInfoAction/{}", l.phase()),
            Action::SendReviewOp(l) => format!("review/sendReviewAction/{}", l.phase()),
            Action::AddFavouriteOp(l) => format!("user/addFavourite/{}", l.phase()),
            Action::CheckAuthOp(l) => format!("user/checkAuth/{}", l.phase()),
            Action::LoginOp(l) => format!("user/login/{}", l.phase()),
            Action::LogoutOp(l) => format!("user/logout/{}", l.phase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert_eq!(Action::ChangeCity(CityName::Paris).tag(), "ChangeCity");
        assert_eq!(
            Action::GetOfferInfoOp(Lifecycle::Pending).tag(),
            "offer/getOfferInfoAction/pending"
        );
        assert_eq!(
            Action::AddFavouriteOp(Lifecycle::Rejected("boom".to_string())).tag(),
            "user/addFavourite/rejected"
        );
    }
}
