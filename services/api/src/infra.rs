use agri_market::access::{
    AuthClient, AuthError, AuthenticatedUser, Profile, ProfileStore, ProfileStoreError, UserId,
};
use agri_market::marketplace::{
    Listing, ListingCsvImporter, ListingId, ListingImportError, ListingLocation, ListingSource,
    ListingSourceError, SellerId,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Listing table stand-in serving active rows newest first.
#[derive(Default)]
pub(crate) struct InMemoryListingSource {
    rows: RwLock<Vec<Listing>>,
}

impl InMemoryListingSource {
    pub(crate) fn new(rows: Vec<Listing>) -> Self {
        Self {
            rows: RwLock::new(rows),
        }
    }

    /// Seed from a CSV export when one is configured, otherwise from demo rows.
    pub(crate) fn seeded(csv: Option<&Path>) -> Result<Self, ListingImportError> {
        let rows = match csv {
            Some(path) => ListingCsvImporter::from_path(path)?,
            None => demo_listings(),
        };
        Ok(Self::new(rows))
    }
}

impl ListingSource for InMemoryListingSource {
    fn fetch_active_listings(&self) -> Result<Vec<Listing>, ListingSourceError> {
        let guard = self
            .rows
            .read()
            .map_err(|_| ListingSourceError::Unavailable("listing lock poisoned".to_string()))?;
        let mut active: Vec<Listing> = guard
            .iter()
            .filter(|listing| listing.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileStore {
    rows: Arc<Mutex<HashMap<UserId, Profile>>>,
}

impl ProfileStore for InMemoryProfileStore {
    fn find_by_user_id(&self, id: &UserId) -> Result<Option<Profile>, ProfileStoreError> {
        let guard = self
            .rows
            .lock()
            .map_err(|_| ProfileStoreError::Unavailable("profile lock poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn insert(&self, profile: Profile) -> Result<(), ProfileStoreError> {
        let mut guard = self
            .rows
            .lock()
            .map_err(|_| ProfileStoreError::Unavailable("profile lock poisoned".to_string()))?;
        if guard.contains_key(&profile.user_id) {
            return Err(ProfileStoreError::Conflict);
        }
        guard.insert(profile.user_id.clone(), profile);
        Ok(())
    }
}

/// Auth client for local runs: reports a fixed user and always signs out cleanly.
pub(crate) struct LocalAuthClient {
    user: Option<AuthenticatedUser>,
}

impl LocalAuthClient {
    pub(crate) fn new(user: Option<AuthenticatedUser>) -> Self {
        Self { user }
    }
}

impl AuthClient for LocalAuthClient {
    fn current_user(&self) -> Result<Option<AuthenticatedUser>, AuthError> {
        Ok(self.user.clone())
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

fn demo_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 6, 0, 0)
        .single()
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn demo_listing(
    id: &str,
    title: &str,
    description: Option<&str>,
    price: f64,
    quantity: f64,
    grade: Option<&str>,
    certifications: &[&str],
    place: Option<(&str, &str)>,
    days_after_epoch: i64,
) -> Listing {
    Listing {
        id: ListingId(id.to_string()),
        title: title.to_string(),
        description: description.map(str::to_string),
        price_per_unit: price,
        unit: "kg".to_string(),
        available_quantity: quantity,
        minimum_order: (quantity / 20.0).floor(),
        quality_grade: grade.map(str::to_string),
        certifications: certifications.iter().map(|c| c.to_string()).collect(),
        location: place.map(|(city, region)| ListingLocation {
            city: Some(city.to_string()),
            region: Some(region.to_string()),
            country: Some("Kenya".to_string()),
        }),
        created_at: demo_epoch() + Duration::days(days_after_epoch),
        seller_id: SellerId(format!("seller-{id}")),
        is_active: true,
    }
}

pub(crate) fn demo_listings() -> Vec<Listing> {
    vec![
        demo_listing(
            "demo-maize",
            "Yellow Maize",
            Some("Sun dried, below 13% moisture"),
            42.0,
            5_000.0,
            Some("Grade 1"),
            &[],
            Some(("Nakuru", "Rift Valley")),
            6,
        ),
        demo_listing(
            "demo-coffee",
            "Arabica Coffee",
            Some("Washed AA beans from smallholder cooperative"),
            310.0,
            80.0,
            Some("AA"),
            &["Organic", "Fairtrade"],
            Some(("Nyeri", "Central")),
            5,
        ),
        demo_listing(
            "demo-beans",
            "Rosecoco Beans",
            None,
            95.0,
            700.0,
            Some("Grade 1"),
            &["Organic"],
            None,
            4,
        ),
        demo_listing(
            "demo-tea",
            "Black Tea CTC",
            Some("Highland grown, auction grade"),
            250.0,
            1_200.0,
            None,
            &["Rainforest Alliance"],
            Some(("Kericho", "Rift Valley")),
            3,
        ),
        demo_listing(
            "demo-sorghum",
            "Red Sorghum",
            Some("Brewing grade"),
            38.5,
            2_400.0,
            Some("Grade 2"),
            &[],
            Some(("Kisumu", "Nyanza")),
            1,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_serves_active_rows_newest_first() {
        let mut rows = demo_listings();
        rows.reverse();
        rows[0].is_active = false;
        let source = InMemoryListingSource::new(rows);

        let served = source.fetch_active_listings().expect("fetch succeeds");
        assert_eq!(served.len(), 4);
        assert!(served
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[test]
    fn profile_store_rejects_duplicates() {
        let store = InMemoryProfileStore::default();
        let profile = Profile {
            user_id: UserId("u-1".to_string()),
            full_name: "amina".to_string(),
            email: None,
            user_role: "farmer".to_string(),
            account_type: "seller".to_string(),
            phone: None,
            company_name: None,
        };

        store.insert(profile.clone()).expect("first insert");
        assert!(matches!(
            store.insert(profile),
            Err(ProfileStoreError::Conflict)
        ));
    }
}
