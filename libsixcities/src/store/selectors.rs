//! Memoized selectors over the current offer bundle
//!
//! A selector caches its last input slice and output. When the next input
//! slice is the same `Arc` (pointer equality, never deep comparison) the
//! cached output is handed back, so callers can compare results with
//! `Arc::ptr_eq` to skip work.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::state::AppState;
use crate::types::{CurrentOfferBundle, DetailedOffer, Offer, Review};

/// Identity passthrough to the current offer bundle
pub fn select_current_offer(state: &AppState) -> Arc<CurrentOfferBundle> {
    Arc::clone(&state.current_offer)
}

/// Selector memoized on the identity of its input slice
pub struct MemoSelector<I, T> {
    input: fn(&AppState) -> Arc<I>,
    project: fn(&I) -> T,
    cache: Mutex<Option<(Arc<I>, Arc<T>)>>,
    recomputations: AtomicUsize,
}

impl<I, T> MemoSelector<I, T> {
    pub const fn new(input: fn(&AppState) -> Arc<I>, project: fn(&I) -> T) -> Self {
        Self {
            input,
            project,
            cache: Mutex::new(None),
            recomputations: AtomicUsize::new(0),
        }
    }

    /// Derive the output for `state`, reusing the cached value when the
    /// input slice is unchanged
    pub fn select(&self, state: &AppState) -> Arc<T> {
        let input = (self.input)(state);
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((cached_input, cached_output)) = cache.as_ref() {
            if Arc::ptr_eq(cached_input, &input) {
                return Arc::clone(cached_output);
            }
        }

        let output = Arc::new((self.project)(&input));
        self.recomputations.fetch_add(1, Ordering::Relaxed);
        *cache = Some((input, Arc::clone(&output)));
        output
    }

    /// How many times the projection has run
    pub fn recomputations(&self) -> usize {
        self.recomputations.load(Ordering::Relaxed)
    }
}

pub type OfferInfoSelector = MemoSelector<CurrentOfferBundle, Option<DetailedOffer>>;
pub type NearbyOffersSelector = MemoSelector<CurrentOfferBundle, Vec<Offer>>;
pub type ReviewsSelector = MemoSelector<CurrentOfferBundle, Vec<Review>>;

pub fn select_offer_info() -> OfferInfoSelector {
    MemoSelector::new(select_current_offer, |bundle: &CurrentOfferBundle| {
        bundle.offer_info.clone()
    })
}

pub fn select_nearby_offers() -> NearbyOffersSelector {
    MemoSelector::new(select_current_offer, |bundle: &CurrentOfferBundle| {
        bundle.nearest_offers.clone()
    })
}

pub fn select_reviews() -> ReviewsSelector {
    MemoSelector::new(select_current_offer, |bundle: &CurrentOfferBundle| {
        bundle.reviews.clone()
    })
}

/// The offer page's selectors, each with its own cache
pub struct OfferPageSelectors {
    pub offer_info: OfferInfoSelector,
    pub nearby_offers: NearbyOffersSelector,
    pub reviews: ReviewsSelector,
}

impl Default for OfferPageSelectors {
    fn default() -> Self {
        Self {
            offer_info: select_offer_info(),
            nearby_offers: select_nearby_offers(),
            reviews: select_reviews(),
        }
    }
}

impl OfferPageSelectors {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{sample_detailed_offer, sample_offer, sample_review};
    use crate::store::{reduce, Action};
    use crate::types::{AuthStatus, CityName, SortOption};

    fn loaded_state() -> Arc<AppState> {
        let bundle = CurrentOfferBundle {
            offer_info: Some(sample_detailed_offer("1", false)),
            nearest_offers: vec![sample_offer("2", CityName::Paris, 80, 3.5)],
            reviews: vec![sample_review("r1", "2024-03-01T12:00:00Z")],
        };
        reduce(&Arc::new(AppState::new()), Action::GetOfferInfo(bundle))
    }

    #[test]
    fn test_current_offer_passthrough() {
        let state = loaded_state();
        assert!(Arc::ptr_eq(&select_current_offer(&state), &state.current_offer));
    }

    #[test]
    fn test_same_reference_for_unrelated_changes() {
        let selectors = OfferPageSelectors::new();
        let state = loaded_state();

        let info = selectors.offer_info.select(&state);
        let nearby = selectors.nearby_offers.select(&state);
        let reviews = selectors.reviews.select(&state);

        let state = reduce(&state, Action::SetSortOption(SortOption::PriceLowToHigh));
        let state = reduce(&state, Action::SetAuthStatus(AuthStatus::NoAuth));

        assert!(Arc::ptr_eq(&info, &selectors.offer_info.select(&state)));
        assert!(Arc::ptr_eq(&nearby, &selectors.nearby_offers.select(&state)));
        assert!(Arc::ptr_eq(&reviews, &selectors.reviews.select(&state)));
        assert_eq!(selectors.offer_info.recomputations(), 1);
    }

    #[test]
    fn test_recomputes_when_bundle_replaced() {
        let selector = select_reviews();
        let state = loaded_state();
        let before = selector.select(&state);

        let review = sample_review("r2", "2024-04-01T12:00:00Z");
        let state = reduce(&state, Action::AppendReview(review));
        let after = selector.select(&state);

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.len(), 2);
        assert_eq!(selector.recomputations(), 2);
    }

    #[test]
    fn test_empty_bundle() {
        let selector = select_offer_info();
        let state = AppState::new();
        assert!(selector.select(&state).is_none());
    }
}
