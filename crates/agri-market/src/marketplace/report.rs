use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::Listing;

const UNGRADED: &str = "ungraded";

/// Price statistics for one group of listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceStats {
    pub listing_count: usize,
    pub lowest_price: f64,
    pub highest_price: f64,
    pub average_price: f64,
    pub total_available_quantity: f64,
}

#[derive(Debug, Default)]
struct PriceAccumulator {
    count: usize,
    lowest: f64,
    highest: f64,
    price_total: f64,
    quantity_total: f64,
}

impl PriceAccumulator {
    fn record(&mut self, listing: &Listing) {
        let price = listing.price_per_unit;
        if self.count == 0 {
            self.lowest = price;
            self.highest = price;
        } else {
            self.lowest = self.lowest.min(price);
            self.highest = self.highest.max(price);
        }
        self.count += 1;
        self.price_total += price;
        self.quantity_total += listing.available_quantity;
    }

    fn finish(&self) -> Option<PriceStats> {
        if self.count == 0 {
            return None;
        }

        Some(PriceStats {
            listing_count: self.count,
            lowest_price: self.lowest,
            highest_price: self.highest,
            average_price: self.price_total / self.count as f64,
            total_available_quantity: self.quantity_total,
        })
    }
}

/// Pricing dashboard figures for a listing snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall: Option<PriceStats>,
    pub by_grade: BTreeMap<String, PriceStats>,
}

impl PriceSummary {
    pub fn from_listings(listings: &[Listing]) -> Self {
        let mut overall = PriceAccumulator::default();
        let mut grades: BTreeMap<String, PriceAccumulator> = BTreeMap::new();

        for listing in listings {
            overall.record(listing);
            let grade = listing
                .quality_grade
                .as_deref()
                .map(str::trim)
                .filter(|grade| !grade.is_empty())
                .unwrap_or(UNGRADED);
            grades.entry(grade.to_string()).or_default().record(listing);
        }

        Self {
            overall: overall.finish(),
            by_grade: grades
                .into_iter()
                .filter_map(|(grade, acc)| acc.finish().map(|stats| (grade, stats)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.overall.is_none()
    }
}
