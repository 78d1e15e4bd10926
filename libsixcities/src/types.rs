//! Core data types for six-cities
//!
//! Wire names follow the backend's camelCase JSON.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known city identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CityName {
    Paris,
    Cologne,
    Brussels,
    Amsterdam,
    Hamburg,
    Dusseldorf,
}

impl CityName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CityName::Paris => "Paris",
            CityName::Cologne => "Cologne",
            CityName::Brussels => "Brussels",
            CityName::Amsterdam => "Amsterdam",
            CityName::Hamburg => "Hamburg",
            CityName::Dusseldorf => "Dusseldorf",
        }
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CityName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paris" => Ok(CityName::Paris),
            "cologne" => Ok(CityName::Cologne),
            "brussels" => Ok(CityName::Brussels),
            "amsterdam" => Ok(CityName::Amsterdam),
            "hamburg" => Ok(CityName::Hamburg),
            "dusseldorf" => Ok(CityName::Dusseldorf),
            _ => Err(format!(
                "Unknown city: '{}'. Valid options: {}",
                s,
                "Paris, Cologne, Brussels, Amsterdam, Hamburg, Dusseldorf"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: CityName,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceType {
    Apartment,
    Room,
    House,
    Hotel,
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceType::Apartment => write!(f, "Apartment"),
            PlaceType::Room => write!(f, "Room"),
            PlaceType::House => write!(f, "House"),
            PlaceType::Hotel => write!(f, "Hotel"),
        }
    }
}

/// Offer summary as shown in lists and on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub place_type: PlaceType,
    pub price: u32,
    pub preview_image: String,
    pub is_premium: bool,
    #[serde(default)]
    pub is_bookmarked: bool,
    pub is_favorite: bool,
    pub rating: f64,
    pub location: Location,
    pub city: City,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub avatar_url: String,
    pub is_pro: bool,
}

/// Offer hosts carry the same fields as review authors
pub type Host = User;

/// Full offer data for a single offer page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedOffer {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub place_type: PlaceType,
    pub price: u32,
    pub is_premium: bool,
    #[serde(default)]
    pub is_bookmarked: bool,
    pub is_favorite: bool,
    pub rating: f64,
    pub location: Location,
    pub city: City,
    pub description: String,
    pub bedrooms: u32,
    pub goods: Vec<String>,
    pub host: Host,
    pub max_adults: u32,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub date: DateTime<Utc>,
    pub user: User,
    pub comment: String,
    pub rating: u8,
}

/// Detail page aggregate: the offer, its neighbours and its reviews
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentOfferBundle {
    pub offer_info: Option<DetailedOffer>,
    pub nearest_offers: Vec<Offer>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    #[default]
    Popular,
    PriceLowToHigh,
    PriceHighToLow,
    TopRatedFirst,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::Popular,
        SortOption::PriceLowToHigh,
        SortOption::PriceHighToLow,
        SortOption::TopRatedFirst,
    ];

    /// Label shown in the sort dropdown
    pub fn label(&self) -> &'static str {
        match self {
            SortOption::Popular => "Popular",
            SortOption::PriceLowToHigh => "Price: low to high",
            SortOption::PriceHighToLow => "Price: high to low",
            SortOption::TopRatedFirst => "Top rated first",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "popular" => Ok(SortOption::Popular),
            "price-low" | "price: low to high" => Ok(SortOption::PriceLowToHigh),
            "price-high" | "price: high to low" => Ok(SortOption::PriceHighToLow),
            "top-rated" | "top rated first" => Ok(SortOption::TopRatedFirst),
            _ => Err(format!(
                "Invalid sort option: '{}'. Valid options: {}",
                s, "popular, price-low, price-high, top-rated"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AuthStatus {
    #[default]
    Unknown,
    Auth,
    NoAuth,
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStatus::Unknown => write!(f, "unknown"),
            AuthStatus::Auth => write!(f, "authorized"),
            AuthStatus::NoAuth => write!(f, "not authorized"),
        }
    }
}

/// Favorite toggle target, rendered as `0`/`1` in the request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteStatus {
    Remove = 0,
    Add = 1,
}

impl FavoriteStatus {
    pub fn as_path_segment(&self) -> u8 {
        *self as u8
    }
}

impl From<bool> for FavoriteStatus {
    fn from(is_favorite: bool) -> Self {
        if is_favorite {
            FavoriteStatus::Add
        } else {
            FavoriteStatus::Remove
        }
    }
}

/// Review submission body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentInfo {
    pub comment: String,
    pub rating: u8,
}

/// Login credentials
///
/// The password stays wrapped until it is written into the request body.
#[derive(Debug)]
pub struct AuthInfo {
    pub email: String,
    pub password: SecretString,
}

impl AuthInfo {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

/// Login reply; only the token is required
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAuthInfo {
    pub token: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_pro: bool,
}

/// Client-side navigation targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Main,
    Login,
    Favorites,
    Offer(String),
    NotFound,
}

impl AppRoute {
    pub fn path(&self) -> String {
        match self {
            AppRoute::Main => "/".to_string(),
            AppRoute::Login => "/login".to_string(),
            AppRoute::Favorites => "/favorites".to_string(),
            AppRoute::Offer(id) => format!("/offer/{}", id),
            AppRoute::NotFound => "/404".to_string(),
        }
    }
}

/// Coordinate handed to the map widget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub id: String,
    pub location: Location,
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFER_JSON: &str = r#"{
        "id": "6af6f711-c28d-4121-82cd-e0b462a27f00",
        "title": "Beautiful & luxurious studio at great location",
        "type": "apartment",
        "price": 120,
        "city": {
            "name": "Amsterdam",
            "location": { "latitude": 52.35514938496378, "longitude": 4.673877537499948, "zoom": 8 }
        },
        "location": { "latitude": 52.35514938496378, "longitude": 4.673877537499948, "zoom": 8 },
        "isFavorite": false,
        "isPremium": false,
        "rating": 4,
        "previewImage": "https://url-to-image/image.png"
    }"#;

    #[test]
    fn test_offer_deserializes_wire_format() {
        let offer: Offer = serde_json::from_str(OFFER_JSON).unwrap();
        assert_eq!(offer.place_type, PlaceType::Apartment);
        assert_eq!(offer.city.name, CityName::Amsterdam);
        assert_eq!(offer.price, 120);
        assert_eq!(offer.rating, 4.0);
        // Not sent by the server
        assert!(!offer.is_bookmarked);
    }

    #[test]
    fn test_review_date_parses_iso_string() {
        let json = r#"{
            "id": "b67ddfd5-b953-4a30-8c8d-bd083cd6b62a",
            "date": "2019-05-08T14:13:56.569Z",
            "user": {
                "name": "Oliver Conner",
                "avatarUrl": "https://url-to-image/image.png",
                "isPro": false
            },
            "comment": "A quiet cozy and picturesque place by the river.",
            "rating": 4
        }"#;
        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.date.timestamp(), 1557324836);
        assert_eq!(review.user.name, "Oliver Conner");
    }

    #[test]
    fn test_city_name_from_str() {
        assert_eq!("amsterdam".parse::<CityName>().unwrap(), CityName::Amsterdam);
        assert_eq!("DUSSELDORF".parse::<CityName>().unwrap(), CityName::Dusseldorf);
        assert!("Berlin".parse::<CityName>().unwrap_err().contains("Unknown city"));
    }

    #[test]
    fn test_sort_option_from_str() {
        assert_eq!("price-low".parse::<SortOption>().unwrap(), SortOption::PriceLowToHigh);
        assert_eq!("Top rated first".parse::<SortOption>().unwrap(), SortOption::TopRatedFirst);
        assert!("cheapest".parse::<SortOption>().is_err());
        for option in SortOption::ALL {
            assert_eq!(option.label().parse::<SortOption>().unwrap(), option);
        }
    }

    #[test]
    fn test_favorite_status_path_segment() {
        assert_eq!(FavoriteStatus::Add.as_path_segment(), 1);
        assert_eq!(FavoriteStatus::Remove.as_path_segment(), 0);
        assert_eq!(FavoriteStatus::from(true), FavoriteStatus::Add);
    }

    #[test]
    fn test_auth_info_debug_redacts_password() {
        let auth = AuthInfo::new("Oliver.conner@gmail.com", "12345678a");
        let debug = format!("{:?}", auth);
        assert!(!debug.contains("12345678a"));
        assert_eq!(auth.password(), "12345678a");
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(AppRoute::Main.path(), "/");
        assert_eq!(AppRoute::Offer("42".to_string()).path(), "/offer/42");
    }
}
