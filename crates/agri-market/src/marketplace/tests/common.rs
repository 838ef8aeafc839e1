use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::marketplace::domain::{Listing, ListingId, ListingLocation, SellerId};
use crate::marketplace::repository::{ListingSource, ListingSourceError};
use crate::marketplace::service::MarketplaceService;
use crate::marketplace::{marketplace_router, FilterState};

pub(super) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn listing(id: &str, price: f64, day_offset: i64) -> Listing {
    Listing {
        id: ListingId(id.to_string()),
        title: format!("Lot {id}"),
        description: None,
        price_per_unit: price,
        unit: "kg".to_string(),
        available_quantity: 100.0,
        minimum_order: 10.0,
        quality_grade: None,
        certifications: Vec::new(),
        location: None,
        created_at: base_time() + Duration::days(day_offset),
        seller_id: SellerId("seller-1".to_string()),
        is_active: true,
    }
}

pub(super) fn located(mut listing: Listing, city: &str, region: &str, country: &str) -> Listing {
    listing.location = Some(ListingLocation {
        city: Some(city.to_string()),
        region: Some(region.to_string()),
        country: Some(country.to_string()),
    });
    listing
}

/// A small, varied catalogue in upstream (newest first) order.
pub(super) fn catalogue() -> Vec<Listing> {
    let mut maize = located(listing("maize", 42.0, 5), "Nakuru", "Rift Valley", "Kenya");
    maize.title = "Yellow Maize".to_string();
    maize.description = Some("Sun dried, low moisture".to_string());
    maize.quality_grade = Some("Grade 1".to_string());
    maize.available_quantity = 5_000.0;

    let mut coffee = located(listing("coffee", 310.0, 4), "Nyeri", "Central", "Kenya");
    coffee.title = "Arabica Coffee".to_string();
    coffee.description = Some("Washed AA beans, organic".to_string());
    coffee.quality_grade = Some("AA".to_string());
    coffee.certifications = vec!["Organic".to_string(), "Fairtrade".to_string()];
    coffee.available_quantity = 80.0;

    let mut beans = listing("beans", 95.0, 3);
    beans.title = "Rosecoco Beans".to_string();
    beans.quality_grade = Some("Grade 1".to_string());
    beans.certifications = vec!["Organic".to_string()];
    beans.available_quantity = 700.0;

    let mut tea = located(listing("tea", 250.0, 2), "Kericho", "Rift Valley", "Kenya");
    tea.title = "Black Tea CTC".to_string();
    tea.description = Some("Premium MAIZE-free blend".to_string());
    tea.available_quantity = 1_200.0;

    let mut sorghum = listing("sorghum", 42.0, 1);
    sorghum.title = "Red Sorghum".to_string();
    sorghum.available_quantity = 700.0;

    vec![maize, coffee, beans, tea, sorghum]
}

pub(super) fn ids(listings: &[Listing]) -> Vec<&str> {
    listings.iter().map(|listing| listing.id.0.as_str()).collect()
}

pub(super) fn filters() -> FilterState {
    FilterState::default()
}

#[derive(Default)]
pub(super) struct MemorySource {
    listings: Mutex<Vec<Listing>>,
}

impl MemorySource {
    pub(super) fn with(listings: Vec<Listing>) -> Self {
        Self {
            listings: Mutex::new(listings),
        }
    }

    pub(super) fn replace(&self, listings: Vec<Listing>) {
        *self.listings.lock().expect("source mutex poisoned") = listings;
    }
}

impl ListingSource for MemorySource {
    fn fetch_active_listings(&self) -> Result<Vec<Listing>, ListingSourceError> {
        Ok(self
            .listings
            .lock()
            .expect("source mutex poisoned")
            .iter()
            .filter(|listing| listing.is_active)
            .cloned()
            .collect())
    }
}

/// Succeeds once, then reports the platform as unavailable.
pub(super) struct FlakySource {
    first: Mutex<Option<Vec<Listing>>>,
}

impl FlakySource {
    pub(super) fn with(listings: Vec<Listing>) -> Self {
        Self {
            first: Mutex::new(Some(listings)),
        }
    }
}

impl ListingSource for FlakySource {
    fn fetch_active_listings(&self) -> Result<Vec<Listing>, ListingSourceError> {
        self.first
            .lock()
            .expect("source mutex poisoned")
            .take()
            .ok_or_else(|| ListingSourceError::Unavailable("connection reset".to_string()))
    }
}

pub(super) fn loaded_service(listings: Vec<Listing>) -> Arc<MarketplaceService<MemorySource>> {
    let service = MarketplaceService::new(Arc::new(MemorySource::with(listings)));
    service.refresh().expect("memory source refreshes");
    Arc::new(service)
}

pub(super) fn router_with_catalogue() -> axum::Router {
    marketplace_router(loaded_service(catalogue()))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
