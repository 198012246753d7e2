//! Cities the user can put on the dashboard

use chrono_tz::{Africa, America, Asia, Australia, Europe, Tz};
use std::fmt::{self, Display, Formatter};

/// Every city that can be searched for and added. Never mutated.
pub const CATALOG: &[City] = &[
    City::new("Los Angeles", America::Los_Angeles, "USA"),
    City::new("New York", America::New_York, "USA"),
    City::new("London", Europe::London, "UK"),
    City::new("Tokyo", Asia::Tokyo, "Japan"),
    City::new("Sydney", Australia::Sydney, "Australia"),
    City::new("Paris", Europe::Paris, "France"),
    City::new("Berlin", Europe::Berlin, "Germany"),
    City::new("Moscow", Europe::Moscow, "Russia"),
    City::new("Beijing", Asia::Shanghai, "China"),
    City::new("Mumbai", Asia::Kolkata, "India"),
    City::new("São Paulo", America::Sao_Paulo, "Brazil"),
    City::new("Cairo", Africa::Cairo, "Egypt"),
    City::new("Johannesburg", Africa::Johannesburg, "South Africa"),
    City::new("Dubai", Asia::Dubai, "UAE"),
    City::new("Singapore", Asia::Singapore, "Singapore"),
    City::new("Mogadishu", Africa::Mogadishu, "Somalia"),
];

/// Queries shorter than this (in characters) never match anything
const MIN_QUERY_LENGTH: usize = 2;

/// A named place, and the zone its clock follows. The timezone is the city's
/// identity: two entries with the same zone are the same city.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub timezone: Tz,
    pub country: &'static str,
}

impl City {
    pub const fn new(
        name: &'static str,
        timezone: Tz,
        country: &'static str,
    ) -> Self {
        Self {
            name,
            timezone,
            country,
        }
    }

    /// IANA identifier of this city's zone, e.g. `Europe/London`
    pub fn zone_id(&self) -> &'static str {
        self.timezone.name()
    }
}

impl Display for City {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.name, self.country)
    }
}

/// Look up a catalog city by its exact zone identifier
pub fn find(zone_id: &str) -> Option<&'static City> {
    CATALOG.iter().find(|city| city.zone_id() == zone_id)
}

/// Search the catalog for cities whose name or country contains the query,
/// ignoring case. Results are in catalog order.
pub fn search(query: &str) -> Vec<&'static City> {
    search_in(CATALOG, query)
}

/// [search], over an arbitrary list of cities
pub fn search_in<'a>(cities: &'a [City], query: &str) -> Vec<&'a City> {
    if query.chars().count() < MIN_QUERY_LENGTH {
        return Vec::new();
    }
    let query = query.to_lowercase();
    cities
        .iter()
        .filter(|city| {
            city.name.to_lowercase().contains(&query)
                || city.country.to_lowercase().contains(&query)
        })
        .collect()
}
