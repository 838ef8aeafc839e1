use std::collections::BTreeSet;

use serde::Serialize;

use super::super::domain::Listing;

/// Distinct values present in a snapshot, used to populate filter controls.
///
/// `locations` holds every city, region, and country seen, each of which is a
/// valid location filter value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub quality_grades: Vec<String>,
    pub certifications: Vec<String>,
    pub locations: Vec<String>,
    pub highest_price: Option<f64>,
}

impl FilterOptions {
    pub fn from_listings(listings: &[Listing]) -> Self {
        let mut grades = BTreeSet::new();
        let mut certifications = BTreeSet::new();
        let mut locations = BTreeSet::new();
        let mut highest_price: Option<f64> = None;

        for listing in listings {
            if let Some(grade) = listing.quality_grade.as_deref().map(str::trim) {
                if !grade.is_empty() {
                    grades.insert(grade.to_string());
                }
            }

            certifications.extend(
                listing
                    .certifications
                    .iter()
                    .map(|cert| cert.trim())
                    .filter(|cert| !cert.is_empty())
                    .map(str::to_string),
            );

            if let Some(location) = &listing.location {
                locations.extend(location.components().map(str::to_string));
            }

            highest_price = Some(match highest_price {
                Some(current) => current.max(listing.price_per_unit),
                None => listing.price_per_unit,
            });
        }

        Self {
            quality_grades: grades.into_iter().collect(),
            certifications: certifications.into_iter().collect(),
            locations: locations.into_iter().collect(),
            highest_price,
        }
    }
}
