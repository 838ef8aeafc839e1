use super::domain::Listing;

/// Port onto the hosted data platform's listing table.
///
/// Implementations return only active listings, newest first.
pub trait ListingSource: Send + Sync {
    fn fetch_active_listings(&self) -> Result<Vec<Listing>, ListingSourceError>;
}

/// Error enumeration for listing source failures.
#[derive(Debug, thiserror::Error)]
pub enum ListingSourceError {
    #[error("listing source unavailable: {0}")]
    Unavailable(String),
    #[error("listing source returned malformed data: {0}")]
    Malformed(String),
}
