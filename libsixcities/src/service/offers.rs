//! Offer loading and favorites
//!
//! Each operation reports its lifecycle to the store: `Pending` before the
//! first request, then `Fulfilled` or `Rejected` once it settles.

use std::sync::Arc;

use crate::api::OfferApi;
use crate::error::{Result, SixCitiesError};
use crate::store::{Action, Lifecycle, Store};
use crate::types::{CurrentOfferBundle, DetailedOffer, FavoriteStatus, Offer};

/// Rejection reason for any failed detail page load
pub const OFFER_NOT_FOUND: &str = "Offer not found";

/// Dispatches its action when dropped, unless disarmed first
///
/// Holds a loading flag's reset across `.await` points, so the reset also
/// runs when the caller drops the operation mid-flight.
struct DispatchOnDrop<'a> {
    store: &'a Store,
    action: Option<Action>,
}

impl<'a> DispatchOnDrop<'a> {
    fn new(store: &'a Store, action: Action) -> Self {
        Self {
            store,
            action: Some(action),
        }
    }

    fn disarm(mut self) {
        self.action = None;
    }
}

impl Drop for DispatchOnDrop<'_> {
    fn drop(&mut self) {
        if let Some(action) = self.action.take() {
            self.store.dispatch(action);
        }
    }
}

#[derive(Clone)]
pub struct OffersService {
    store: Store,
    api: Arc<dyn OfferApi>,
}

impl OffersService {
    pub fn new(store: Store, api: Arc<dyn OfferApi>) -> Self {
        Self { store, api }
    }

    /// Load the full offer list
    ///
    /// The fetching flag is cleared on every path, including when the future
    /// is dropped before the request settles.
    pub async fn get_offers(&self) -> Result<Arc<Vec<Offer>>> {
        self.store.dispatch(Action::GetOffersOp(Lifecycle::Pending));
        self.store.dispatch(Action::SetIsFetchingOffers(true));
        let reset_flag = DispatchOnDrop::new(&self.store, Action::SetIsFetchingOffers(false));

        let result = self.api.fetch_offers().await;
        if let Ok(offers) = &result {
            self.store.dispatch(Action::SetOffers(offers.clone()));
        }
        drop(reset_flag);

        match result {
            Ok(offers) => {
                tracing::debug!("Loaded {} offers", offers.len());
                self.store.dispatch(Action::GetOffersOp(Lifecycle::Fulfilled(())));
                Ok(Arc::clone(&self.store.state().offers))
            }
            Err(e) => {
                tracing::warn!("Failed to load offers: {}", e);
                self.store
                    .dispatch(Action::GetOffersOp(Lifecycle::Rejected(e.to_string())));
                Err(e.into())
            }
        }
    }

    /// Load the detail page bundle for `id`
    ///
    /// Detail, nearby offers and reviews are fetched one after another. Any
    /// failure rejects with [`OFFER_NOT_FOUND`]; there is no retry. Dropping
    /// the future mid-load rejects the same way, so the loading flag never
    /// outlives the call.
    pub async fn get_offer_info(&self, id: &str) -> Result<CurrentOfferBundle> {
        self.store.dispatch(Action::GetOfferInfoOp(Lifecycle::Pending));
        let cancelled = DispatchOnDrop::new(
            &self.store,
            Action::GetOfferInfoOp(Lifecycle::Rejected(OFFER_NOT_FOUND.to_string())),
        );

        let result = self.fetch_bundle(id).await;
        cancelled.disarm();

        match result {
            Ok(bundle) => {
                self.store
                    .dispatch(Action::GetOfferInfoOp(Lifecycle::Fulfilled(bundle.clone())));
                Ok(bundle)
            }
            Err(e) => {
                tracing::warn!("Failed to load offer {}: {}", id, e);
                self.store.dispatch(Action::GetOfferInfoOp(Lifecycle::Rejected(
                    OFFER_NOT_FOUND.to_string(),
                )));
                Err(SixCitiesError::NotFound(OFFER_NOT_FOUND.to_string()))
            }
        }
    }

    async fn fetch_bundle(&self, id: &str) -> Result<CurrentOfferBundle> {
        let offer_info = self.api.fetch_offer(id).await?;
        let nearest_offers = self.api.fetch_nearby(id).await?;
        let reviews = self.api.fetch_reviews(id).await?;

        Ok(CurrentOfferBundle {
            offer_info: Some(offer_info),
            nearest_offers,
            reviews,
        })
    }

    /// Add or remove an offer from favorites
    ///
    /// On success every copy of the offer held in state gets the new flag.
    pub async fn add_favourite(&self, id: &str, status: FavoriteStatus) -> Result<DetailedOffer> {
        self.store.dispatch(Action::AddFavouriteOp(Lifecycle::Pending));

        match self.api.set_favorite(id, status).await {
            Ok(updated) => {
                self.store
                    .dispatch(Action::AddFavouriteOp(Lifecycle::Fulfilled(updated.clone())));
                Ok(updated)
            }
            Err(e) => {
                tracing::warn!("Failed to update favorite {}: {}", id, e);
                self.store
                    .dispatch(Action::AddFavouriteOp(Lifecycle::Rejected(e.to_string())));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{sample_detailed_offer, sample_offer, MockApi, MockEndpoint};
    use crate::error::ApiError;
    use crate::types::CityName;
    use std::time::Duration;

    fn service(api: MockApi) -> (OffersService, Store, Arc<MockApi>) {
        let store = Store::new(Duration::from_millis(10));
        let api = Arc::new(api);
        (OffersService::new(store.clone(), api.clone()), store, api)
    }

    #[tokio::test]
    async fn test_get_offers_stores_list() {
        let (offers, store, _) = service(
            MockApi::new().with_offers(vec![sample_offer("1", CityName::Paris, 100, 4.0)]),
        );

        let loaded = offers.get_offers().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(store.state().offers.len(), 1);
        assert!(!store.state().is_fetch_offers);
    }

    #[tokio::test]
    async fn test_get_offers_failure_clears_flag() {
        let (offers, store, _) = service(
            MockApi::new().fail(MockEndpoint::FetchOffers, ApiError::Network("down".to_string())),
        );

        assert!(offers.get_offers().await.is_err());
        assert!(!store.state().is_fetch_offers);
        assert!(store.state().offers.is_empty());
    }

    #[tokio::test]
    async fn test_offer_info_stops_at_first_failure() {
        let (offers, store, api) = service(MockApi::new());

        let err = offers.get_offer_info("missing").await.unwrap_err();
        assert_eq!(err.to_string(), OFFER_NOT_FOUND);
        assert_eq!(store.state().error.as_deref(), Some(OFFER_NOT_FOUND));
        assert!(!store.state().is_fetch_single_offer);
        assert_eq!(api.call_count(MockEndpoint::FetchNearby), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_get_offers_clears_flag() {
        let (offers, store, _) = service(
            MockApi::new()
                .with_offers(vec![sample_offer("1", CityName::Paris, 100, 4.0)])
                .with_delay(Duration::from_secs(10)),
        );

        let outcome = tokio::time::timeout(Duration::from_secs(1), offers.get_offers()).await;

        assert!(outcome.is_err());
        assert!(!store.state().is_fetch_offers);
        assert!(store.state().offers.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_get_offer_info_settles_as_rejected() {
        let (offers, store, _) = service(
            MockApi::new()
                .with_offer_detail(sample_detailed_offer("1", false), vec![], vec![])
                .with_delay(Duration::from_secs(10)),
        );
        let before = store.state().current_offer.clone();

        let outcome =
            tokio::time::timeout(Duration::from_secs(1), offers.get_offer_info("1")).await;

        assert!(outcome.is_err());
        let state = store.state();
        assert!(!state.is_fetch_single_offer);
        assert_eq!(state.error.as_deref(), Some(OFFER_NOT_FOUND));
        assert!(Arc::ptr_eq(&before, &state.current_offer));
    }

    #[tokio::test]
    async fn test_settled_offer_info_does_not_dispatch_on_drop() {
        let (offers, store, _) = service(
            MockApi::new().with_offer_detail(sample_detailed_offer("1", false), vec![], vec![]),
        );

        offers.get_offer_info("1").await.unwrap();

        let state = store.state();
        assert!(state.error.is_none());
        assert!(state.current_offer.offer_info.is_some());
    }

    #[tokio::test]
    async fn test_add_favourite_failure_leaves_state() {
        let (offers, store, _) = service(
            MockApi::new().with_offers(vec![sample_offer("1", CityName::Paris, 100, 4.0)]),
        );
        offers.get_offers().await.unwrap();
        let before = store.state();

        let err = offers.add_favourite("2", FavoriteStatus::Add).await.unwrap_err();
        assert!(matches!(err, SixCitiesError::Api(_)));
        assert!(Arc::ptr_eq(&before, &store.state()));
    }

    #[tokio::test]
    async fn test_add_favourite_marks_offer() {
        let (offers, store, _) = service(
            MockApi::new()
                .with_offers(vec![sample_offer("1", CityName::Paris, 100, 4.0)])
                .with_offer_detail(sample_detailed_offer("1", false), vec![], vec![]),
        );
        offers.get_offers().await.unwrap();

        let updated = offers.add_favourite("1", FavoriteStatus::Add).await.unwrap();
        assert!(updated.is_favorite);
        assert!(store.state().offers[0].is_favorite);
    }
}
