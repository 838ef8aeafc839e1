//! Listing discovery for the commodity marketplace: the filter engine, the
//! listing source port, CSV import, pricing summaries, and HTTP routes.

pub mod domain;
pub mod filters;
pub mod import;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Listing, ListingId, ListingLocation, SellerId};
pub use filters::{
    apply, category_filter, FilterOptions, FilterState, ListingFilterEngine, PriceRange,
    SortOrder, DEFAULT_PRICE_CEILING,
};
pub use import::{ListingCsvImporter, ListingImportError};
pub use report::{PriceStats, PriceSummary};
pub use repository::{ListingSource, ListingSourceError};
pub use router::{marketplace_router, ListingQuery};
pub use service::{MarketplaceError, MarketplaceService};
