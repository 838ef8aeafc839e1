mod options;
mod state;

pub use options::FilterOptions;
pub use state::{category_filter, FilterState, PriceRange, SortOrder, DEFAULT_PRICE_CEILING};

use std::cmp::Ordering;

use super::domain::Listing;

/// Stateless pipeline turning a listing snapshot and a filter into the displayed order.
///
/// Stages run in a fixed order: search, price, quality, certification, location,
/// then a stable sort. `product_type` is accepted but never filters.
#[derive(Debug, Default, Clone, Copy)]
pub struct ListingFilterEngine;

impl ListingFilterEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, listings: &[Listing], filters: &FilterState) -> Vec<Listing> {
        apply(listings, filters)
    }
}

/// Filters and orders `listings` according to `filters`. Never mutates its input.
pub fn apply(listings: &[Listing], filters: &FilterState) -> Vec<Listing> {
    let query = filters.search_query.to_lowercase();

    let mut kept: Vec<Listing> = listings
        .iter()
        .filter(|listing| matches_search(listing, &query))
        .filter(|listing| filters.price_range.contains(listing.price_per_unit))
        .filter(|listing| matches_quality(listing, filters.quality_grade.as_deref()))
        .filter(|listing| matches_certification(listing, filters.certification.as_deref()))
        .filter(|listing| matches_location(listing, filters.location.as_deref()))
        .cloned()
        .collect();

    // slice::sort_by is stable, equal keys keep upstream order.
    kept.sort_by(|a, b| compare(a, b, filters.sort_by));
    kept
}

pub(crate) fn matches_search(listing: &Listing, folded_query: &str) -> bool {
    if folded_query.is_empty() {
        return true;
    }

    listing.title.to_lowercase().contains(folded_query)
        || listing.description_text().to_lowercase().contains(folded_query)
}

fn matches_quality(listing: &Listing, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(grade) => listing.quality_grade.as_deref() == Some(grade),
    }
}

fn matches_certification(listing: &Listing, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(label) => listing.has_certification(label),
    }
}

fn matches_location(listing: &Listing, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(place) => listing.matches_location(place),
    }
}

fn compare(a: &Listing, b: &Listing, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Newest => b.created_at.cmp(&a.created_at),
        SortOrder::PriceLow => a.price_per_unit.total_cmp(&b.price_per_unit),
        SortOrder::PriceHigh => b.price_per_unit.total_cmp(&a.price_per_unit),
        SortOrder::Quantity => b.available_quantity.total_cmp(&a.available_quantity),
    }
}
