//! End-to-end listing discovery through the public marketplace facade: CSV
//! import into a listing source, refresh, and filtered browsing.

use std::io::Cursor;
use std::sync::Arc;

use agri_market::marketplace::{
    apply, FilterState, Listing, ListingCsvImporter, ListingSource, ListingSourceError,
    MarketplaceService, PriceRange, PriceSummary, SortOrder,
};

const EXPORT: &str = "\
id,title,description,price_per_unit,unit,available_quantity,minimum_order,quality_grade,certifications,city,region,country,created_at,seller_id,is_active
lst-100,Yellow Maize,Sun dried,42,kg,5000,100,Grade 1,,Nakuru,Rift Valley,Kenya,2025-03-05T09:00:00Z,seller-1,true
lst-101,Arabica Coffee,Washed AA beans,310,kg,80,10,AA,Organic;Fairtrade,Nyeri,Central,Kenya,2025-03-04T09:00:00Z,seller-2,true
lst-102,Rosecoco Beans,,95,kg,700,50,Grade 1,Organic,,,,2025-03-03,seller-3,true
lst-103,Black Tea CTC,Premium blend,250,kg,1200,20,,,Kericho,Rift Valley,Kenya,2025-03-02T09:00:00Z,seller-4,false
lst-104,Red Sorghum,,42,kg,700,25,,,Kisumu,Nyanza,Kenya,2025-03-01T09:00:00Z,seller-5,true
";

struct CsvSource {
    listings: Vec<Listing>,
}

impl ListingSource for CsvSource {
    fn fetch_active_listings(&self) -> Result<Vec<Listing>, ListingSourceError> {
        let mut active: Vec<Listing> = self
            .listings
            .iter()
            .filter(|listing| listing.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }
}

fn service() -> MarketplaceService<CsvSource> {
    let listings = ListingCsvImporter::from_reader(Cursor::new(EXPORT)).expect("export parses");
    let service = MarketplaceService::new(Arc::new(CsvSource { listings }));
    service.refresh().expect("refresh succeeds");
    service
}

fn ids(listings: &[Listing]) -> Vec<String> {
    listings.iter().map(|listing| listing.id.0.clone()).collect()
}

#[test]
fn inactive_rows_never_reach_the_browser() {
    let service = service();
    let shown = service.browse(&FilterState::default());
    assert_eq!(ids(&shown), ["lst-100", "lst-101", "lst-102", "lst-104"]);
}

#[test]
fn buyer_narrows_to_affordable_organic_produce() {
    let service = service();
    let mut filters = service.default_filters();
    filters.price_range = PriceRange::new(0.0, 100.0);
    filters.certification = Some("Organic".to_string());
    assert_eq!(ids(&service.browse(&filters)), ["lst-102"]);

    filters.reset();
    filters.location = Some("kenya".to_string());
    filters.sort_by = SortOrder::PriceLow;
    assert_eq!(
        ids(&service.browse(&filters)),
        ["lst-100", "lst-104", "lst-101"]
    );
}

#[test]
fn browsing_is_a_projection() {
    let service = service();
    let mut filters = FilterState::default();
    filters.search_query = "BEANS".to_string();
    filters.sort_by = SortOrder::Quantity;

    let once = service.browse(&filters);
    assert_eq!(ids(&once), ["lst-102", "lst-101"]);
    assert_eq!(apply(&once, &filters), once);
}

#[test]
fn dashboard_summarises_active_prices() {
    let summary = PriceSummary::from_listings(&service().snapshot());
    let overall = summary.overall.expect("stats present");
    assert_eq!(overall.listing_count, 4);
    assert_eq!(overall.lowest_price, 42.0);
    assert_eq!(overall.highest_price, 310.0);
    assert_eq!(summary.by_grade["Grade 1"].listing_count, 2);
}
