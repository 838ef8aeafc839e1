use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound of the price range a fresh filter starts with.
pub const DEFAULT_PRICE_CEILING: f64 = 10_000.0;

const WILDCARD: &str = "all";

/// Inclusive price window. Bounds are kept ordered so `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPriceRange")]
pub struct PriceRange {
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct RawPriceRange {
    min: f64,
    max: f64,
}

impl From<RawPriceRange> for PriceRange {
    fn from(raw: RawPriceRange) -> Self {
        PriceRange::new(raw.min, raw.max)
    }
}

impl PriceRange {
    pub fn new(a: f64, b: f64) -> Self {
        if b < a {
            Self { min: b, max: a }
        } else {
            Self { min: a, max: b }
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_PRICE_CEILING)
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum SortOrder {
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    Quantity,
}

impl SortOrder {
    /// Parses a sort key; anything unrecognised sorts newest first.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "price_low" => Self::PriceLow,
            "price_high" => Self::PriceHigh,
            "quantity" => Self::Quantity,
            _ => Self::Newest,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::PriceLow => "price_low",
            SortOrder::PriceHigh => "price_high",
            SortOrder::Quantity => "quantity",
        }
    }
}

impl From<String> for SortOrder {
    fn from(value: String) -> Self {
        SortOrder::parse(&value)
    }
}

/// User chosen search, filter, and sort criteria for a listing collection.
///
/// Categorical filters use `None` as the wildcard. When deserialized, the
/// legacy `"all"` sentinel and empty strings both map to `None`. The price
/// ceiling is carried as `price_ceiling` and defaults to
/// [`DEFAULT_PRICE_CEILING`] when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub price_range: PriceRange,
    #[serde(default, deserialize_with = "wildcard_as_none")]
    pub quality_grade: Option<String>,
    #[serde(default, deserialize_with = "wildcard_as_none")]
    pub certification: Option<String>,
    #[serde(default, deserialize_with = "wildcard_as_none")]
    pub location: Option<String>,
    /// Carried for forward compatibility; has no effect on filtering.
    #[serde(default, deserialize_with = "wildcard_as_none")]
    pub product_type: Option<String>,
    #[serde(default)]
    pub sort_by: SortOrder,
    #[serde(rename = "price_ceiling", default = "default_ceiling")]
    ceiling: f64,
}

fn default_ceiling() -> f64 {
    DEFAULT_PRICE_CEILING
}

impl Default for FilterState {
    fn default() -> Self {
        Self::with_price_ceiling(DEFAULT_PRICE_CEILING)
    }
}

impl FilterState {
    pub fn with_price_ceiling(ceiling: f64) -> Self {
        Self {
            search_query: String::new(),
            price_range: PriceRange::new(0.0, ceiling),
            quality_grade: None,
            certification: None,
            location: None,
            product_type: None,
            sort_by: SortOrder::Newest,
            ceiling,
        }
    }

    /// Restores defaults while keeping the current price ceiling.
    pub fn reset(&mut self) {
        *self = Self::with_price_ceiling(self.ceiling);
    }

    pub fn price_ceiling(&self) -> f64 {
        self.ceiling
    }

    pub fn is_default(&self) -> bool {
        *self == Self::with_price_ceiling(self.ceiling)
    }
}

/// Maps the `"all"` wildcard and blank values to `None`. Anything else is kept as given.
pub fn category_filter(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.trim().is_empty() && !value.eq_ignore_ascii_case(WILDCARD))
        .map(str::to_string)
}

fn wildcard_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(category_filter(opt.as_deref()))
}
