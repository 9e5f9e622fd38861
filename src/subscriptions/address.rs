//! Delivery addresses

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A city quarter name that is not one of the delivery routes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown city quarter: {0}")]
pub struct UnknownCityQuarter(pub String);

/// Delivery route. Drivers work the quarters in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CityQuarter {
    /// City centre.
    Downtown,

    /// North east.
    NorthEast,

    /// North west.
    NorthWest,

    /// South east.
    SouthEast,

    /// South west.
    SouthWest,
}

impl CityQuarter {
    /// Every quarter, in route order.
    pub const ALL: [CityQuarter; 5] = [
        CityQuarter::Downtown,
        CityQuarter::NorthEast,
        CityQuarter::NorthWest,
        CityQuarter::SouthEast,
        CityQuarter::SouthWest,
    ];

    /// Stored name of the quarter.
    pub fn name(self) -> &'static str {
        match self {
            CityQuarter::Downtown => "Downtown",
            CityQuarter::NorthEast => "NE",
            CityQuarter::NorthWest => "NW",
            CityQuarter::SouthEast => "SE",
            CityQuarter::SouthWest => "SW",
        }
    }
}

impl fmt::Display for CityQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CityQuarter {
    type Err = UnknownCityQuarter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|quarter| quarter.name() == s)
            .ok_or_else(|| UnknownCityQuarter(s.to_string()))
    }
}

impl TryFrom<String> for CityQuarter {
    type Error = UnknownCityQuarter;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CityQuarter> for String {
    fn from(quarter: CityQuarter) -> Self {
        quarter.name().to_string()
    }
}

/// Where tiffins are delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryAddress {
    /// Street address.
    pub line1: String,

    /// City.
    pub city: String,

    /// Province.
    pub province: String,

    /// Postal code.
    pub zipcode: String,

    /// Delivery route.
    pub city_quarter: CityQuarter,
}

/// Who receives the tiffins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// Recipient name.
    pub name: String,

    /// Phone number, grouped as `ddd-ddd-dddd`.
    pub phone: String,
}

/// Normalise a ten digit phone number to `ddd-ddd-dddd`.
///
/// Any non-digit characters are ignored. Returns `None` unless exactly ten digits
/// remain.
pub fn format_phone(input: &str) -> Option<String> {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();

    if digits.len() != 10 {
        return None;
    }

    let (area, rest) = digits.split_at_checked(3)?;
    let (exchange, line) = rest.split_at_checked(3)?;

    Some(format!("{area}-{exchange}-{line}"))
}
