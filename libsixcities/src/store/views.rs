//! Derived views composed by consumers
//!
//! Plain functions over state slices. None of them mutate their input.

use crate::cities::CITIES;
use crate::types::{CityName, DetailedOffer, MapPoint, Offer, Review, SortOption};

use super::state::AppState;

/// Nearby offers shown on the detail page map and list
pub const MAX_NEARBY_POINTS: usize = 3;

/// Reviews shown on the detail page
pub const MAX_REVIEWS: usize = 10;

pub fn filter_by_city(offers: &[Offer], city: CityName) -> Vec<Offer> {
    offers
        .iter()
        .filter(|offer| offer.city.name == city)
        .cloned()
        .collect()
}

/// Stable sort; ties keep their original relative order
pub fn sort_offers(offers: &[Offer], option: SortOption) -> Vec<Offer> {
    let mut sorted = offers.to_vec();
    match option {
        SortOption::Popular => {}
        SortOption::PriceLowToHigh => sorted.sort_by_key(|offer| offer.price),
        SortOption::PriceHighToLow => sorted.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOption::TopRatedFirst => sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }
    sorted
}

/// Offers of the selected city in the selected order
pub fn visible_offers(state: &AppState) -> Vec<Offer> {
    sort_offers(&filter_by_city(&state.offers, state.city.name), state.sort_option)
}

/// First nearby offers listed under the detail page map
pub fn nearby_preview(nearby: &[Offer]) -> &[Offer] {
    &nearby[..nearby.len().min(MAX_NEARBY_POINTS)]
}

/// Map points for the detail page: up to three neighbours plus the offer itself
pub fn map_points(offer_info: Option<&DetailedOffer>, nearby: &[Offer]) -> Vec<MapPoint> {
    let mut points: Vec<MapPoint> = nearby_preview(nearby)
        .iter()
        .map(|offer| MapPoint {
            id: offer.id.clone(),
            location: offer.location,
        })
        .collect();

    if let Some(info) = offer_info {
        points.push(MapPoint {
            id: info.id.clone(),
            location: info.location,
        });
    }
    points
}

/// Newest first, capped to the latest ten
pub fn sorted_reviews(reviews: &[Review]) -> Vec<Review> {
    let mut sorted = reviews.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(MAX_REVIEWS);
    sorted
}

pub fn favorite_offers(offers: &[Offer]) -> Vec<Offer> {
    offers.iter().filter(|offer| offer.is_favorite).cloned().collect()
}

/// Favorites grouped by city in table order; cities without favorites are skipped
pub fn favorites_by_city(offers: &[Offer]) -> Vec<(CityName, Vec<Offer>)> {
    let favorites = favorite_offers(offers);
    CITIES
        .iter()
        .map(|city| (city.name, filter_by_city(&favorites, city.name)))
        .filter(|(_, group)| !group.is_empty())
        .collect()
}
