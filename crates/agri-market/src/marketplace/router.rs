use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::Listing;
use super::filters::{category_filter, FilterState, PriceRange, SortOrder};
use super::repository::ListingSource;
use super::service::MarketplaceService;

/// Router builder exposing listing discovery and pricing endpoints.
pub fn marketplace_router<S>(service: Arc<MarketplaceService<S>>) -> Router
where
    S: ListingSource + 'static,
{
    Router::new()
        .route("/api/v1/listings", get(browse_handler::<S>))
        .route("/api/v1/listings/options", get(options_handler::<S>))
        .route("/api/v1/listings/summary", get(summary_handler::<S>))
        .route("/api/v1/listings/refresh", post(refresh_handler::<S>))
        .with_state(service)
}

/// Flat query-string form of [`FilterState`].
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub certification: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

impl ListingQuery {
    /// Overlay the query onto `base`; absent parameters keep the base value.
    pub fn into_filters(self, base: FilterState) -> FilterState {
        let mut filters = base;
        if let Some(q) = self.q {
            filters.search_query = q;
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            filters.price_range = PriceRange::new(
                self.min_price.unwrap_or(filters.price_range.min()),
                self.max_price.unwrap_or(filters.price_range.max()),
            );
        }
        if self.quality.is_some() {
            filters.quality_grade = category_filter(self.quality.as_deref());
        }
        if self.certification.is_some() {
            filters.certification = category_filter(self.certification.as_deref());
        }
        if self.location.is_some() {
            filters.location = category_filter(self.location.as_deref());
        }
        if self.product_type.is_some() {
            filters.product_type = category_filter(self.product_type.as_deref());
        }
        if let Some(sort) = self.sort.as_deref() {
            filters.sort_by = SortOrder::parse(sort);
        }
        filters
    }
}

#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub sort_by: SortOrder,
    pub total: usize,
    pub listings: Vec<Listing>,
}

pub(crate) async fn browse_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
    Query(query): Query<ListingQuery>,
) -> Response
where
    S: ListingSource + 'static,
{
    let filters = query.into_filters(service.default_filters());
    let listings = service.browse(&filters);
    let body = BrowseResponse {
        sort_by: filters.sort_by,
        total: listings.len(),
        listings,
    };
    (StatusCode::OK, axum::Json(body)).into_response()
}

pub(crate) async fn options_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
) -> Response
where
    S: ListingSource + 'static,
{
    (StatusCode::OK, axum::Json(service.filter_options())).into_response()
}

pub(crate) async fn summary_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
) -> Response
where
    S: ListingSource + 'static,
{
    (StatusCode::OK, axum::Json(service.price_summary())).into_response()
}

pub(crate) async fn refresh_handler<S>(
    State(service): State<Arc<MarketplaceService<S>>>,
) -> Response
where
    S: ListingSource + 'static,
{
    match service.refresh() {
        Ok(count) => {
            let payload = json!({ "refreshed": count });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
                "retained": service.snapshot().len(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
    }
}
