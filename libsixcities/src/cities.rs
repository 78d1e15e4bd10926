//! Static city reference table

use crate::types::{City, CityName, Location};

const DEFAULT_ZOOM: u8 = 10;

const fn city(name: CityName, latitude: f64, longitude: f64) -> City {
    City {
        name,
        location: Location {
            latitude,
            longitude,
            zoom: DEFAULT_ZOOM,
        },
    }
}

/// The six known cities in display order
pub const CITIES: [City; 6] = [
    city(CityName::Paris, 48.856663, 2.351556),
    city(CityName::Cologne, 50.930779, 6.938399),
    city(CityName::Brussels, 50.846697, 4.352544),
    city(CityName::Amsterdam, 52.374, 4.88969),
    city(CityName::Hamburg, 53.550688, 9.992895),
    city(CityName::Dusseldorf, 51.230569, 6.787428),
];

/// Canonical map location for a city
pub fn canonical_location(name: CityName) -> Location {
    CITIES
        .iter()
        .find(|city| city.name == name)
        .map(|city| city.location)
        // Every CityName has a row; kept total for exhaustiveness
        .unwrap_or(CITIES[0].location)
}

impl City {
    /// Build a city carrying its canonical location
    pub fn canonical(name: CityName) -> Self {
        City {
            name,
            location: canonical_location(name),
        }
    }
}
