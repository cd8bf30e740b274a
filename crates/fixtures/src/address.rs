//! Address fixtures
//!
//! Each preset exercises a different validation path of the address form:
//! a fully geocoded address, one the geocoder cannot resolve, results only
//! precise to the street or to the city, and an address outside France.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::FixtureError;

/// How precisely the geocoder resolved an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeocodePrecision {
    StreetNumber,
    Street,
    City,
}

impl GeocodePrecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeocodePrecision::StreetNumber => "street_number",
            GeocodePrecision::Street => "street",
            GeocodePrecision::City => "city",
        }
    }
}

/// A postal address, optionally geocoded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street_number: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub country_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub precision: Option<GeocodePrecision>,
}

impl Address {
    /// Body fragment expected by the candidate API
    pub fn api_payload(&self) -> Value {
        let mut payload = json!({
            "street_number": self.street_number,
            "street": self.street,
            "postal_code": self.postal_code,
            "city": self.city,
            "country": self.country,
            "country_code": self.country_code,
        });

        if let Value::Object(map) = &mut payload {
            if let (Some(lat), Some(lng)) = (self.latitude, self.longitude) {
                map.insert("latitude".to_string(), json!(lat));
                map.insert("longitude".to_string(), json!(lng));
            }
            if let Some(precision) = self.precision {
                map.insert("precision".to_string(), json!(precision.as_str()));
            }
        }

        payload
    }

    /// Single-line form, as typed into the address autocomplete
    pub fn one_line(&self) -> String {
        let street = join_non_empty(&[&self.street_number, &self.street], " ");
        let locality = join_non_empty(&[&self.postal_code, &self.city], " ");
        join_non_empty(&[&street, &locality, &self.country], ", ")
    }

    pub fn is_geocoded(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.one_line())
    }
}

fn join_non_empty(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Canned addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressPreset {
    Valid,
    Invalid,
    StreetPrecision,
    CityPrecision,
    Foreign,
}

impl AddressPreset {
    pub const ALL: [AddressPreset; 5] = [
        AddressPreset::Valid,
        AddressPreset::Invalid,
        AddressPreset::StreetPrecision,
        AddressPreset::CityPrecision,
        AddressPreset::Foreign,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AddressPreset::Valid => "valid",
            AddressPreset::Invalid => "invalid",
            AddressPreset::StreetPrecision => "street-precision",
            AddressPreset::CityPrecision => "city-precision",
            AddressPreset::Foreign => "foreign",
        }
    }

    pub fn address(&self) -> Address {
        match self {
            AddressPreset::Valid => Address {
                street_number: "10".to_string(),
                street: "Rue de Rivoli".to_string(),
                postal_code: "75004".to_string(),
                city: "Paris".to_string(),
                country: "France".to_string(),
                country_code: "FR".to_string(),
                latitude: Some(48.855_7),
                longitude: Some(2.358_8),
                precision: None,
            },
            AddressPreset::Invalid => Address {
                street_number: "999".to_string(),
                street: "Rue Qui N'Existe Pas".to_string(),
                postal_code: "00000".to_string(),
                city: "Nulle-Part".to_string(),
                country: "France".to_string(),
                country_code: "FR".to_string(),
                latitude: None,
                longitude: None,
                precision: None,
            },
            AddressPreset::StreetPrecision => Address {
                street_number: String::new(),
                street: "Rue de la Paix".to_string(),
                postal_code: "75002".to_string(),
                city: "Paris".to_string(),
                country: "France".to_string(),
                country_code: "FR".to_string(),
                latitude: Some(48.869_3),
                longitude: Some(2.331_4),
                precision: Some(GeocodePrecision::Street),
            },
            AddressPreset::CityPrecision => Address {
                street_number: String::new(),
                street: String::new(),
                postal_code: "69001".to_string(),
                city: "Lyon".to_string(),
                country: "France".to_string(),
                country_code: "FR".to_string(),
                latitude: Some(45.767_5),
                longitude: Some(4.834_1),
                precision: Some(GeocodePrecision::City),
            },
            AddressPreset::Foreign => Address {
                street_number: "77".to_string(),
                street: "Unter den Linden".to_string(),
                postal_code: "10117".to_string(),
                city: "Berlin".to_string(),
                country: "Germany".to_string(),
                country_code: "DE".to_string(),
                latitude: Some(52.516_9),
                longitude: Some(13.380_2),
                precision: Some(GeocodePrecision::StreetNumber),
            },
        }
    }
}

impl FromStr for AddressPreset {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        AddressPreset::ALL
            .into_iter()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| FixtureError::UnknownAddressPreset(s.to_string()))
    }
}

impl fmt::Display for AddressPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
