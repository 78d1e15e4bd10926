//! Pure reducer function for state transitions
//!
//! `(&State, Action) -> State`, with no side effects. Network calls and
//! timers live in the service layer, which reports their outcome back here
//! as actions.

use std::sync::Arc;

use super::actions::{Action, Lifecycle};
use super::state::AppState;
use crate::types::{City, CurrentOfferBundle, DetailedOffer, Offer};

/// Pure reducer function
///
/// Takes the current snapshot and an action, returns the next snapshot.
///
/// # Identity Guarantees
///
/// - Actions the reducer does not react to return the input `Arc` itself
/// - Slices untouched by a transition keep their `Arc` identity, so
///   memoized selectors over them do not recompute
pub fn reduce(state: &Arc<AppState>, action: Action) -> Arc<AppState> {
    match action {
        // === Synchronous ===
        Action::ChangeCity(name) => Arc::new(AppState {
            city: City::canonical(name),
            ..AppState::clone(state)
        }),

        Action::SetOffers(offers) => Arc::new(AppState {
            offers: Arc::new(offers),
            ..AppState::clone(state)
        }),

        Action::SetSortOption(sort_option) => Arc::new(AppState {
            sort_option,
            ..AppState::clone(state)
        }),

        Action::SetAuthStatus(auth_status) => Arc::new(AppState {
            auth_status,
            ..AppState::clone(state)
        }),

        Action::SetError(error) => Arc::new(AppState {
            error,
            ..AppState::clone(state)
        }),

        Action::SetIsFetchingOffers(is_fetch_offers) => Arc::new(AppState {
            is_fetch_offers,
            ..AppState::clone(state)
        }),

        Action::GetOfferInfo(bundle) => Arc::new(AppState {
            current_offer: Arc::new(bundle),
            ..AppState::clone(state)
        }),

        Action::AppendReview(review) => {
            let mut reviews = state.current_offer.reviews.clone();
            reviews.push(review);
            Arc::new(AppState {
                current_offer: Arc::new(CurrentOfferBundle {
                    reviews,
                    ..CurrentOfferBundle::clone(&state.current_offer)
                }),
                ..AppState::clone(state)
            })
        }

        Action::RedirectToRoute(route) => Arc::new(AppState {
            redirect: Some(route),
            ..AppState::clone(state)
        }),

        Action::ClearRedirect if state.redirect.is_none() => Arc::clone(state),

        Action::ClearRedirect => Arc::new(AppState {
            redirect: None,
            ..AppState::clone(state)
        }),

        // === Offer detail lifecycle ===
        Action::GetOfferInfoOp(Lifecycle::Pending) => Arc::new(AppState {
            error: None,
            is_fetch_single_offer: true,
            ..AppState::clone(state)
        }),

        Action::GetOfferInfoOp(Lifecycle::Fulfilled(bundle)) => Arc::new(AppState {
            is_fetch_single_offer: false,
            error: None,
            current_offer: Arc::new(bundle),
            ..AppState::clone(state)
        }),

        Action::GetOfferInfoOp(Lifecycle::Rejected(reason)) => Arc::new(AppState {
            is_fetch_single_offer: false,
            error: Some(reason),
            ..AppState::clone(state)
        }),

        // === Favorites ===
        Action::AddFavouriteOp(Lifecycle::Fulfilled(updated)) => {
            propagate_favorite(state, &updated)
        }

        // Phases other slices already account for
        Action::AddFavouriteOp(_)
        | Action::GetOffersOp(_)
        | Action::SendReviewOp(_)
        | Action::CheckAuthOp(_)
        | Action::LoginOp(_)
        | Action::LogoutOp(_) => Arc::clone(state),
    }
}

/// Apply a favorite flag to every home of the offer
///
/// The flat list, the nearby list and the detail page offer are updated
/// together. Collections without a matching id keep their identity.
fn propagate_favorite(state: &Arc<AppState>, updated: &DetailedOffer) -> Arc<AppState> {
    let id = updated.id.as_str();
    let is_favorite = updated.is_favorite;

    let in_offers = contains_offer(&state.offers, id);
    let bundle = &state.current_offer;
    let in_nearby = contains_offer(&bundle.nearest_offers, id);
    let in_info = bundle.offer_info.as_ref().is_some_and(|info| info.id == id);

    if !(in_offers || in_nearby || in_info) {
        return Arc::clone(state);
    }

    let offers = if in_offers {
        Arc::new(mark_favorite(&state.offers, id, is_favorite))
    } else {
        Arc::clone(&state.offers)
    };

    let current_offer = if in_nearby || in_info {
        let offer_info = bundle.offer_info.clone().map(|mut info| {
            if info.id == id {
                info.is_favorite = is_favorite;
            }
            info
        });
        let nearest_offers = if in_nearby {
            mark_favorite(&bundle.nearest_offers, id, is_favorite)
        } else {
            bundle.nearest_offers.clone()
        };
        Arc::new(CurrentOfferBundle {
            offer_info,
            nearest_offers,
            reviews: bundle.reviews.clone(),
        })
    } else {
        Arc::clone(bundle)
    };

    Arc::new(AppState {
        offers,
        current_offer,
        ..AppState::clone(state)
    })
}

fn contains_offer(offers: &[Offer], id: &str) -> bool {
    offers.iter().any(|offer| offer.id == id)
}

fn mark_favorite(offers: &[Offer], id: &str, is_favorite: bool) -> Vec<Offer> {
    offers
        .iter()
        .map(|offer| {
            if offer.id == id {
                Offer {
                    is_favorite,
                    ..offer.clone()
                }
            } else {
                offer.clone()
            }
        })
        .collect()
}
