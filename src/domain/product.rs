use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized stock status shared by all retailers.
///
/// Each retailer reports availability in its own format (status codes, CSS
/// classes, free text). The score maps all of them onto one ordered scale so
/// that the catalog can be sorted by "how soon can I get it".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AvailabilityScore {
    Available = 1,
    WithinDays = 2,
    WithinWeeks = 3,
    #[default]
    Unknown = 4,
}

impl AvailabilityScore {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<AvailabilityScore> for u8 {
    fn from(score: AvailabilityScore) -> Self {
        score.as_u8()
    }
}

impl TryFrom<u8> for AvailabilityScore {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Available),
            2 => Ok(Self::WithinDays),
            3 => Ok(Self::WithinWeeks),
            4 => Ok(Self::Unknown),
            other => Err(format!("invalid availability score: {other}")),
        }
    }
}

/// One catalog entry as scraped from a retailer listing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Product {
    pub retailer: String,
    pub manufacturer: String,
    pub model: String,
    pub category: String,
    pub is_available: bool,
    pub availability_info: String,
    pub availability_score: AvailabilityScore,
    pub price: f64,
    pub product_url: String,
    pub thumbnail_url: String,
    /// Set by the store on first insert, never by retailers
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Set by the store on every upsert
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Identity key: retailer, manufacturer and model uniquely identify a listing.
    ///
    /// The format doubles as the key of the snapshot file, so it must stay stable.
    pub fn identity_key(&self) -> String {
        format!("{}-{}-{}", self.retailer, self.manufacturer, self.model)
    }

    /// Case-insensitive substring match against "<manufacturer> <model>"
    pub fn matches_search(&self, search: &str) -> bool {
        self.to_string()
            .to_lowercase()
            .contains(&search.to_lowercase())
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.manufacturer, self.model)
    }
}
