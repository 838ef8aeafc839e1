use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for marketplace listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingId(pub String);

/// Reference to the seller who owns a listing. The marketplace never resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SellerId(pub String);

/// Structured address attached to a listing. Every component is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingLocation {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl ListingLocation {
    /// Non-empty components in city, region, country order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        [&self.city, &self.region, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.components().next().is_none()
    }

    /// Human readable label such as `Nakuru, Rift Valley, Kenya`.
    pub fn label(&self) -> String {
        self.components().collect::<Vec<_>>().join(", ")
    }

    pub(crate) fn matches(&self, wanted: &str) -> bool {
        let wanted = wanted.trim();
        self.components()
            .any(|part| part.eq_ignore_ascii_case(wanted))
    }
}

/// A seller's offer of a commodity. Treated as an immutable snapshot by the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_per_unit: f64,
    pub unit: String,
    pub available_quantity: f64,
    pub minimum_order: f64,
    #[serde(default)]
    pub quality_grade: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub location: Option<ListingLocation>,
    pub created_at: DateTime<Utc>,
    pub seller_id: SellerId,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Listing {
    pub fn has_certification(&self, label: &str) -> bool {
        self.certifications.iter().any(|cert| cert == label)
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn matches_location(&self, wanted: &str) -> bool {
        self.location
            .as_ref()
            .map(|location| location.matches(wanted))
            .unwrap_or(false)
    }
}
