use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use super::domain::Listing;
use super::filters::{FilterOptions, FilterState, ListingFilterEngine, DEFAULT_PRICE_CEILING};
use super::report::PriceSummary;
use super::repository::{ListingSource, ListingSourceError};

/// Service composing the listing source, the last good snapshot, and the filter engine.
pub struct MarketplaceService<S> {
    source: Arc<S>,
    engine: ListingFilterEngine,
    snapshot: RwLock<Arc<Vec<Listing>>>,
    price_ceiling: f64,
}

impl<S> MarketplaceService<S>
where
    S: ListingSource + 'static,
{
    pub fn new(source: Arc<S>) -> Self {
        Self::with_price_ceiling(source, DEFAULT_PRICE_CEILING)
    }

    pub fn with_price_ceiling(source: Arc<S>, price_ceiling: f64) -> Self {
        Self {
            source,
            engine: ListingFilterEngine::new(),
            snapshot: RwLock::new(Arc::new(Vec::new())),
            price_ceiling,
        }
    }

    /// Fresh filter state using the configured price ceiling.
    pub fn default_filters(&self) -> FilterState {
        FilterState::with_price_ceiling(self.price_ceiling)
    }

    /// Pull active listings from the source.
    ///
    /// On failure the previous snapshot stays in place and the error is returned
    /// so the caller can surface it.
    pub fn refresh(&self) -> Result<usize, MarketplaceError> {
        match self.source.fetch_active_listings() {
            Ok(listings) => {
                let count = listings.len();
                *self
                    .snapshot
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = Arc::new(listings);
                info!(count, "listing snapshot refreshed");
                Ok(count)
            }
            Err(err) => {
                warn!(error = %err, "listing refresh failed; keeping previous snapshot");
                Err(MarketplaceError::Source(err))
            }
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<Listing>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Listings as displayed for the given filter.
    pub fn browse(&self, filters: &FilterState) -> Vec<Listing> {
        self.engine.apply(&self.snapshot(), filters)
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_listings(&self.snapshot())
    }

    pub fn price_summary(&self) -> PriceSummary {
        PriceSummary::from_listings(&self.snapshot())
    }
}

/// Error raised by the marketplace service.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("could not load listings: {0}")]
    Source(#[from] ListingSourceError),
}
