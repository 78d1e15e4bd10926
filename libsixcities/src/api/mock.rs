//! Mock backend for testing
//!
//! `MockApi` serves canned data from memory, can be told to fail any
//! endpoint and records every call it receives. It's available for all
//! builds so integration tests and downstream crates can drive the services
//! without a server. The `sample_*` functions build realistic fixtures.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::sleep;

use super::{ApiResult, OfferApi};
use crate::cities::canonical_location;
use crate::error::ApiError;
use crate::types::{
    AuthInfo, City, CityName, CommentInfo, DetailedOffer, FavoriteStatus, Location, Offer,
    PlaceType, Review, User, UserAuthInfo,
};

pub const MOCK_TOKEN: &str = "T2xpdmVyLmNvbm5lckBnbWFpbC5jb20=";

const SAMPLE_TEXT: &str = "A quiet cozy and picturesque that hides behind a a river \
                           by the unique lightness of Amsterdam.";

/// Endpoint identifiers for failure injection and call inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockEndpoint {
    FetchOffers,
    FetchOffer,
    FetchNearby,
    FetchReviews,
    PostReview,
    SetFavorite,
    CheckLogin,
    Login,
    Logout,
}

/// One recorded request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub endpoint: MockEndpoint,
    /// Offer id or email, when the endpoint takes one
    pub target: Option<String>,
}

#[derive(Default)]
struct MockData {
    offers: Vec<Offer>,
    details: HashMap<String, DetailedOffer>,
    nearby: HashMap<String, Vec<Offer>>,
    reviews: HashMap<String, Vec<Review>>,
    authorized: bool,
    posted_reviews: Vec<CommentInfo>,
    next_review_id: usize,
}

/// In-memory [`OfferApi`]
pub struct MockApi {
    data: Mutex<MockData>,
    failures: Mutex<HashMap<MockEndpoint, ApiError>>,
    calls: Mutex<Vec<MockCall>>,
    token: String,
    delay: Duration,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            data: Mutex::new(MockData::default()),
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            token: MOCK_TOKEN.to_string(),
            delay: Duration::ZERO,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found(id: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("Offer with id {} not found.", id),
    }
}

impl MockApi {
    /// Empty backend with no session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offers(self, offers: Vec<Offer>) -> Self {
        lock(&self.data).offers = offers;
        self
    }

    /// Register the detail page data for one offer
    pub fn with_offer_detail(
        self,
        offer: DetailedOffer,
        nearby: Vec<Offer>,
        reviews: Vec<Review>,
    ) -> Self {
        {
            let mut data = lock(&self.data);
            let id = offer.id.clone();
            data.nearby.insert(id.clone(), nearby);
            data.reviews.insert(id.clone(), reviews);
            data.details.insert(id, offer);
        }
        self
    }

    /// Start with a valid session
    pub fn authorized(self) -> Self {
        lock(&self.data).authorized = true;
        self
    }

    /// Token handed out by `login`
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = token.to_string();
        self
    }

    /// Simulated network latency applied to every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make `endpoint` fail with `error` until cleared
    pub fn fail(self, endpoint: MockEndpoint, error: ApiError) -> Self {
        self.set_failure(endpoint, Some(error));
        self
    }

    pub fn set_failure(&self, endpoint: MockEndpoint, error: Option<ApiError>) {
        let mut failures = lock(&self.failures);
        match error {
            Some(error) => failures.insert(endpoint, error),
            None => failures.remove(&endpoint),
        };
    }

    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, endpoint: MockEndpoint) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .count()
    }

    /// Review bodies received by `post_review`
    pub fn posted_reviews(&self) -> Vec<CommentInfo> {
        lock(&self.data).posted_reviews.clone()
    }

    pub fn is_authorized(&self) -> bool {
        lock(&self.data).authorized
    }

    async fn enter(&self, endpoint: MockEndpoint, target: Option<&str>) -> ApiResult<()> {
        lock(&self.calls).push(MockCall {
            endpoint,
            target: target.map(str::to_string),
        });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match lock(&self.failures).get(&endpoint) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl OfferApi for MockApi {
    async fn fetch_offers(&self) -> ApiResult<Vec<Offer>> {
        self.enter(MockEndpoint::FetchOffers, None).await?;
        Ok(lock(&self.data).offers.clone())
    }

    async fn fetch_offer(&self, id: &str) -> ApiResult<DetailedOffer> {
        self.enter(MockEndpoint::FetchOffer, Some(id)).await?;
        lock(&self.data)
            .details
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn fetch_nearby(&self, id: &str) -> ApiResult<Vec<Offer>> {
        self.enter(MockEndpoint::FetchNearby, Some(id)).await?;
        lock(&self.data)
            .nearby
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn fetch_reviews(&self, id: &str) -> ApiResult<Vec<Review>> {
        self.enter(MockEndpoint::FetchReviews, Some(id)).await?;
        Ok(lock(&self.data).reviews.get(id).cloned().unwrap_or_default())
    }

    async fn post_review(&self, id: &str, comment: &CommentInfo) -> ApiResult<Review> {
        self.enter(MockEndpoint::PostReview, Some(id)).await?;
        let mut data = lock(&self.data);
        if !data.authorized {
            return Err(ApiError::Status {
                status: 401,
                message: "Access deny.".to_string(),
            });
        }
        if !data.details.contains_key(id) {
            return Err(not_found(id));
        }

        data.next_review_id += 1;
        let review = Review {
            id: format!("mock-review-{}", data.next_review_id),
            date: Utc::now(),
            user: sample_user(),
            comment: comment.comment.clone(),
            rating: comment.rating,
        };
        data.posted_reviews.push(comment.clone());
        data.reviews
            .entry(id.to_string())
            .or_default()
            .push(review.clone());
        Ok(review)
    }

    async fn set_favorite(&self, id: &str, status: FavoriteStatus) -> ApiResult<DetailedOffer> {
        self.enter(MockEndpoint::SetFavorite, Some(id)).await?;
        let is_favorite = status == FavoriteStatus::Add;
        let mut data = lock(&self.data);

        let known = data.offers.iter().any(|offer| offer.id == id);
        for offer in data.offers.iter_mut().filter(|offer| offer.id == id) {
            offer.is_favorite = is_favorite;
        }

        match data.details.get_mut(id) {
            Some(detail) => {
                detail.is_favorite = is_favorite;
                Ok(detail.clone())
            }
            None if known => Ok(sample_detailed_offer(id, is_favorite)),
            None => Err(not_found(id)),
        }
    }

    async fn check_login(&self) -> ApiResult<()> {
        self.enter(MockEndpoint::CheckLogin, None).await?;
        if lock(&self.data).authorized {
            Ok(())
        } else {
            Err(ApiError::Status {
                status: 401,
                message: "Unauthorized".to_string(),
            })
        }
    }

    async fn login(&self, auth: &AuthInfo) -> ApiResult<UserAuthInfo> {
        self.enter(MockEndpoint::Login, Some(&auth.email)).await?;
        lock(&self.data).authorized = true;
        Ok(UserAuthInfo {
            token: self.token.clone(),
            email: Some(auth.email.clone()),
            name: Some(sample_user().name),
            avatar_url: Some(sample_user().avatar_url),
            is_pro: false,
        })
    }

    async fn logout(&self) -> ApiResult<()> {
        self.enter(MockEndpoint::Logout, None).await?;
        lock(&self.data).authorized = false;
        Ok(())
    }
}

// === Fixtures ===

pub fn sample_user() -> User {
    User {
        name: "Oliver Conner".to_string(),
        avatar_url: "https://url-to-image/image.png".to_string(),
        is_pro: false,
    }
}

fn offset_location(city: CityName, seed: &str) -> Location {
    let base = canonical_location(city);
    let shift = seed.bytes().map(f64::from).sum::<f64>() % 100.0 / 10_000.0;
    Location {
        latitude: base.latitude + shift,
        longitude: base.longitude + shift,
        zoom: 16,
    }
}

/// Offer summary in `city` with the given price and rating
pub fn sample_offer(id: &str, city: CityName, price: u32, rating: f64) -> Offer {
    Offer {
        id: id.to_string(),
        title: format!("Nice, cozy, warm big bed apartment #{}", id),
        place_type: PlaceType::Apartment,
        price,
        preview_image: "https://url-to-image/image.png".to_string(),
        is_premium: false,
        is_bookmarked: false,
        is_favorite: false,
        rating,
        location: offset_location(city, id),
        city: City::canonical(city),
    }
}

/// Detailed offer in Paris
pub fn sample_detailed_offer(id: &str, is_favorite: bool) -> DetailedOffer {
    DetailedOffer {
        id: id.to_string(),
        title: format!("Beautiful & luxurious studio at great location #{}", id),
        place_type: PlaceType::Apartment,
        price: 120,
        is_premium: false,
        is_bookmarked: false,
        is_favorite,
        rating: 4.0,
        location: offset_location(CityName::Paris, id),
        city: City::canonical(CityName::Paris),
        description: SAMPLE_TEXT.to_string(),
        bedrooms: 3,
        goods: vec!["Heating".to_string(), "Kitchen".to_string(), "Wi-Fi".to_string()],
        host: User {
            name: "Angelina".to_string(),
            avatar_url: "https://url-to-image/image.png".to_string(),
            is_pro: true,
        },
        max_adults: 4,
        images: vec!["https://url-to-image/image.png".to_string()],
    }
}

/// Review dated `date` (RFC 3339); an unparsable date falls back to the epoch
pub fn sample_review(id: &str, date: &str) -> Review {
    Review {
        id: id.to_string(),
        date: DateTime::parse_from_rfc3339(date)
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_default(),
        user: sample_user(),
        comment: SAMPLE_TEXT.to_string(),
        rating: 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls() {
        let api = MockApi::new().with_offers(vec![sample_offer("1", CityName::Paris, 100, 4.0)]);
        let offers = api.fetch_offers().await.unwrap();
        assert_eq!(offers.len(), 1);

        let _ = api.fetch_offer("1").await;
        assert_eq!(api.call_count(MockEndpoint::FetchOffers), 1);
        assert_eq!(
            api.calls()[1],
            MockCall {
                endpoint: MockEndpoint::FetchOffer,
                target: Some("1".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_offer_is_404() {
        let api = MockApi::new();
        let err = api.fetch_offer("nope").await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let api = MockApi::new().fail(
            MockEndpoint::FetchOffers,
            ApiError::Network("Connection refused".to_string()),
        );
        assert!(api.fetch_offers().await.is_err());

        api.set_failure(MockEndpoint::FetchOffers, None);
        assert!(api.fetch_offers().await.is_ok());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let api = MockApi::new();
        assert!(api.check_login().await.is_err());

        let reply = api
            .login(&AuthInfo::new("Oliver.conner@gmail.com", "12345678a"))
            .await
            .unwrap();
        assert_eq!(reply.token, MOCK_TOKEN);
        assert!(api.check_login().await.is_ok());

        api.logout().await.unwrap();
        assert!(!api.is_authorized());
    }

    #[tokio::test]
    async fn test_set_favorite_updates_detail() {
        let api =
            MockApi::new().with_offer_detail(sample_detailed_offer("1", false), vec![], vec![]);
        let updated = api.set_favorite("1", FavoriteStatus::Add).await.unwrap();
        assert!(updated.is_favorite);
        assert!(api.fetch_offer("1").await.unwrap().is_favorite);
    }

    #[test]
    fn test_sample_review_date() {
        let review = sample_review("r1", "2024-03-01T12:00:00Z");
        assert_eq!(review.date.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }
}
