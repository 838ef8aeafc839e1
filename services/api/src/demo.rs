use crate::infra::{InMemoryListingSource, InMemoryProfileStore, LocalAuthClient};
use agri_market::access::{
    AccessPolicy, AuthEvent, AuthenticatedUser, GateDecision, ProfileStore, SessionManager,
};
use agri_market::error::AppError;
use agri_market::marketplace::{
    category_filter, FilterState, Listing, MarketplaceService, PriceRange, PriceSummary,
    SortOrder, DEFAULT_PRICE_CEILING,
};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct BrowseArgs {
    /// Listing CSV export to browse (defaults to the bundled demo listings)
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Case-insensitive text matched against titles and descriptions
    #[arg(long, short = 'q')]
    pub(crate) query: Option<String>,
    /// Lowest price per unit to include
    #[arg(long)]
    pub(crate) min_price: Option<f64>,
    /// Highest price per unit to include
    #[arg(long)]
    pub(crate) max_price: Option<f64>,
    /// Exact quality grade, or "all"
    #[arg(long)]
    pub(crate) quality: Option<String>,
    /// Certification label the listing must carry, or "all"
    #[arg(long)]
    pub(crate) certification: Option<String>,
    /// City, region, or country, or "all"
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// newest, price_low, price_high, or quantity
    #[arg(long, default_value = "newest")]
    pub(crate) sort: String,
    /// Print the pricing summary after the listing table
    #[arg(long)]
    pub(crate) summary: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AccessCheckArgs {
    /// Role declared by the signed-in user; omit to check a signed-out visitor
    #[arg(long)]
    pub(crate) role: Option<String>,
    /// Email of the simulated user
    #[arg(long, default_value = "demo.farmer@example.com")]
    pub(crate) email: String,
    /// Roles with full access to the view (repeatable)
    #[arg(long = "require")]
    pub(crate) required: Vec<String>,
    /// Roles with read-only access to the view (repeatable)
    #[arg(long = "view-only")]
    pub(crate) view_only: Vec<String>,
    /// Path the user asked for
    #[arg(long, default_value = "/dashboard")]
    pub(crate) path: String,
}

pub(crate) fn run_browse(args: BrowseArgs) -> Result<(), AppError> {
    let source = InMemoryListingSource::seeded(args.csv.as_deref())?;
    let service = MarketplaceService::new(Arc::new(source));
    service.refresh()?;

    let filters = filters_from_args(&args);
    let shown = service.browse(&filters);
    render_listings(&shown, &filters);

    if args.summary {
        render_summary(&service.price_summary());
    }

    Ok(())
}

fn filters_from_args(args: &BrowseArgs) -> FilterState {
    let mut filters = FilterState::default();
    if let Some(query) = &args.query {
        filters.search_query = query.clone();
    }
    filters.price_range = PriceRange::new(
        args.min_price.unwrap_or(0.0),
        args.max_price.unwrap_or(DEFAULT_PRICE_CEILING),
    );
    filters.quality_grade = category_filter(args.quality.as_deref());
    filters.certification = category_filter(args.certification.as_deref());
    filters.location = category_filter(args.location.as_deref());
    filters.sort_by = SortOrder::parse(&args.sort);
    filters
}

fn render_listings(listings: &[Listing], filters: &FilterState) {
    println!(
        "{} listing(s), sorted by {}",
        listings.len(),
        filters.sort_by.label()
    );
    for listing in listings {
        let grade = listing.quality_grade.as_deref().unwrap_or("-");
        let place = listing
            .location
            .as_ref()
            .map(|location| location.label())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<16} {:<18} {:>9.2}/{:<3} qty {:>8.0}  grade {:<8} {}",
            listing.id.0,
            listing.title,
            listing.price_per_unit,
            listing.unit,
            listing.available_quantity,
            grade,
            place
        );
        if !listing.certifications.is_empty() {
            println!("    certified: {}", listing.certifications.join(", "));
        }
    }
}

fn render_summary(summary: &PriceSummary) {
    let Some(overall) = &summary.overall else {
        println!("\nNo active listings to summarise");
        return;
    };

    println!("\nPricing summary");
    println!(
        "  overall: {} listing(s), low {:.2}, high {:.2}, avg {:.2}, qty {:.0}",
        overall.listing_count,
        overall.lowest_price,
        overall.highest_price,
        overall.average_price,
        overall.total_available_quantity
    );
    for (grade, stats) in &summary.by_grade {
        println!(
            "  {:<10} {} listing(s), avg {:.2}",
            grade, stats.listing_count, stats.average_price
        );
    }
}

pub(crate) async fn run_access_check(args: AccessCheckArgs) -> Result<(), AppError> {
    let profiles = Arc::new(InMemoryProfileStore::default());
    let manager = SessionManager::new(Arc::new(LocalAuthClient::new(None)), profiles.clone());
    manager.initialize();

    if let Some(role) = &args.role {
        let user = AuthenticatedUser::new("local-user", args.email.clone()).with_role(role);
        if let Some(task) = manager.handle_event(AuthEvent::SignedIn(user)) {
            if let Err(err) = task.await {
                tracing::warn!(error = %err, "profile provisioning task did not complete");
            }
        }
    }

    let policy = AccessPolicy::requiring(args.required).with_view_only(args.view_only);
    let session = manager.current();
    let decision = policy.decide(&session);

    println!("Decision for {}: {}", args.path, decision.label());
    if let Some(redirect) = policy.redirect_for(&session, &args.path) {
        match redirect.return_to {
            Some(return_to) => println!("  redirect to {} (return to {})", redirect.to, return_to),
            None => println!("  redirect to {}", redirect.to),
        }
    }
    if decision == GateDecision::Allow {
        if let Some(user) = &session.user {
            if let Ok(Some(profile)) = profiles.find_by_user_id(&user.id) {
                println!(
                    "  profile: {} ({} / {})",
                    profile.full_name, profile.user_role, profile.account_type
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browse_args_map_wildcards_and_sort() {
        let args = BrowseArgs {
            quality: Some("all".to_string()),
            certification: Some("Organic".to_string()),
            min_price: Some(500.0),
            max_price: Some(50.0),
            sort: "price_high".to_string(),
            ..BrowseArgs::default()
        };

        let filters = filters_from_args(&args);
        assert!(filters.quality_grade.is_none());
        assert_eq!(filters.certification.as_deref(), Some("Organic"));
        assert_eq!(filters.price_range, PriceRange::new(50.0, 500.0));
        assert_eq!(filters.sort_by, SortOrder::PriceHigh);
    }

    #[test]
    fn browse_runs_against_demo_listings() {
        let args = BrowseArgs {
            summary: true,
            sort: "quantity".to_string(),
            ..BrowseArgs::default()
        };
        run_browse(args).expect("demo browse succeeds");
    }

    #[tokio::test]
    async fn access_check_runs_for_signed_in_user() {
        let args = AccessCheckArgs {
            role: Some("farmer".to_string()),
            email: "demo.farmer@example.com".to_string(),
            required: vec!["trader".to_string()],
            view_only: vec!["farmer".to_string()],
            path: "/dashboard".to_string(),
        };
        run_access_check(args).await.expect("check succeeds");
    }
}
