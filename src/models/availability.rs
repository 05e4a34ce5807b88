use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ProviderDescriptor;

/// Credit line shown alongside every availability result
pub const AVAILABILITY_ATTRIBUTION: &str = "Streaming data powered by Watchmode.com";

/// Bucket an offer is listed under
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OfferKind {
    Stream,
    Rent,
    Buy,
}

impl OfferKind {
    /// Classifies a source `type` tag, case-insensitively
    ///
    /// `free` (ad-supported) and `sub` (subscription) are both streamable.
    pub fn from_source_type(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "stream" | "free" | "sub" => Some(OfferKind::Stream),
            "rent" => Some(OfferKind::Rent),
            "buy" => Some(OfferKind::Buy),
            _ => None,
        }
    }
}

/// One way of watching a title on one provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub provider: ProviderDescriptor,
    pub price: Option<f64>,
    pub outbound_url: Option<String>,
    /// Video format as reported by the provider (`SD`, `HD`, `4K`)
    pub quality: Option<String>,
}

/// Where a title can be streamed, rented or bought in one region
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRecord {
    /// Metadata provider id of the title
    pub title_id: String,
    /// Availability provider's internal id the offers were fetched for
    pub provider_title_id: u64,
    pub region: String,
    pub last_updated: DateTime<Utc>,
    pub stream_offers: Vec<Offer>,
    pub rent_offers: Vec<Offer>,
    pub buy_offers: Vec<Offer>,
    pub attribution: String,
}

impl AvailabilityRecord {
    pub fn is_empty(&self) -> bool {
        self.stream_offers.is_empty() && self.rent_offers.is_empty() && self.buy_offers.is_empty()
    }

    pub fn offer_count(&self) -> usize {
        self.stream_offers.len() + self.rent_offers.len() + self.buy_offers.len()
    }
}

/// Name-search candidate returned by the availability provider
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ProviderMatch {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub title_type: String,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Raw per-title source record from the availability provider
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct AvailabilitySource {
    #[serde(default)]
    pub source_id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub source_type: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub format: Option<String>,
}

impl AvailabilitySource {
    /// The source's own URL if present, else its web URL; blank values count as absent
    pub fn outbound_url(&self) -> Option<&str> {
        fn non_blank(value: &Option<String>) -> Option<&str> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
        }

        non_blank(&self.url).or_else(|| non_blank(&self.web_url))
    }
}
