use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::domain::{Listing, ListingId, ListingLocation, SellerId};

#[derive(Debug, thiserror::Error)]
pub enum ListingImportError {
    #[error("failed to read listing export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid listing CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("listing '{listing}' has an unreadable created_at value '{value}'")]
    InvalidTimestamp { listing: String, value: String },
    #[error("listing '{listing}' has a negative {field}")]
    NegativeValue { listing: String, field: &'static str },
    #[error("listing '{listing}' has a non-finite {field}")]
    NonFiniteValue { listing: String, field: &'static str },
}

/// Loads listing snapshots from a CSV export of the listings table.
pub struct ListingCsvImporter;

impl ListingCsvImporter {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<Listing>, ListingImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Listing>, ListingImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut listings = Vec::new();
        for record in csv_reader.deserialize::<ListingRow>() {
            let row = record?;
            listings.push(row.into_listing()?);
        }

        Ok(listings)
    }
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    id: String,
    title: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    price_per_unit: f64,
    unit: String,
    available_quantity: f64,
    #[serde(default)]
    minimum_order: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    quality_grade: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    certifications: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    city: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    region: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    country: Option<String>,
    created_at: String,
    seller_id: String,
    #[serde(default)]
    is_active: Option<bool>,
}

impl ListingRow {
    fn into_listing(self) -> Result<Listing, ListingImportError> {
        let minimum_order = self.minimum_order.unwrap_or(0.0);
        for (field, value) in [
            ("price_per_unit", self.price_per_unit),
            ("available_quantity", self.available_quantity),
            ("minimum_order", minimum_order),
        ] {
            if !value.is_finite() {
                return Err(ListingImportError::NonFiniteValue {
                    listing: self.id,
                    field,
                });
            }
            if value < 0.0 {
                return Err(ListingImportError::NegativeValue {
                    listing: self.id,
                    field,
                });
            }
        }

        let created_at = match parse_timestamp(&self.created_at) {
            Some(created_at) => created_at,
            None => {
                return Err(ListingImportError::InvalidTimestamp {
                    listing: self.id,
                    value: self.created_at,
                })
            }
        };

        let certifications = self
            .certifications
            .as_deref()
            .map(split_certifications)
            .unwrap_or_default();

        let location = ListingLocation {
            city: self.city,
            region: self.region,
            country: self.country,
        };

        Ok(Listing {
            id: ListingId(self.id),
            title: self.title,
            description: self.description,
            price_per_unit: self.price_per_unit,
            unit: self.unit,
            available_quantity: self.available_quantity,
            minimum_order,
            quality_grade: self.quality_grade,
            certifications,
            location: (!location.is_empty()).then_some(location),
            created_at,
            seller_id: SellerId(self.seller_id),
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

fn split_certifications(raw: &str) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for label in raw.split(';').map(str::trim).filter(|label| !label.is_empty()) {
        if !labels.iter().any(|existing| existing == label) {
            labels.push(label.to_string());
        }
    }
    labels
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "id,title,description,price_per_unit,unit,available_quantity,minimum_order,quality_grade,certifications,city,region,country,created_at,seller_id,is_active\n";

    fn import(rows: &str) -> Result<Vec<Listing>, ListingImportError> {
        ListingCsvImporter::from_reader(Cursor::new(format!("{HEADER}{rows}")))
    }

    #[test]
    fn parses_optional_columns_as_absent() {
        let listings = import("lst-1,Yellow Maize,,42.5,kg,1200,,,,,,,2025-03-01,seller-1,\n")
            .expect("row imports");

        let listing = &listings[0];
        assert_eq!(listing.id, ListingId("lst-1".to_string()));
        assert!(listing.description.is_none());
        assert!(listing.quality_grade.is_none());
        assert!(listing.certifications.is_empty());
        assert!(listing.location.is_none());
        assert_eq!(listing.minimum_order, 0.0);
        assert!(listing.is_active);
    }

    #[test]
    fn splits_and_dedupes_certifications() {
        let listings = import(
            "lst-2,Arabica Coffee,Washed,310,kg,80,10,AA,Organic; Fairtrade;Organic,Nyeri,Central,Kenya,2025-03-02T08:30:00Z,seller-2,true\n",
        )
        .expect("row imports");

        let listing = &listings[0];
        assert_eq!(listing.certifications, vec!["Organic", "Fairtrade"]);
        assert_eq!(listing.quality_grade.as_deref(), Some("AA"));
        let location = listing.location.as_ref().expect("location present");
        assert_eq!(location.label(), "Nyeri, Central, Kenya");
    }

    #[test]
    fn rejects_negative_quantities() {
        match import("lst-3,Sorghum,,12,kg,-5,,,,,,,2025-03-01,seller-3,true\n") {
            Err(ListingImportError::NegativeValue { listing, field }) => {
                assert_eq!(listing, "lst-3");
                assert_eq!(field, "available_quantity");
            }
            other => panic!("expected negative value error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_finite_prices() {
        match import("lst-5,Sorghum,,NaN,kg,5,,,,,,,2025-03-01,seller-3,true\n") {
            Err(ListingImportError::NonFiniteValue { listing, field }) => {
                assert_eq!(listing, "lst-5");
                assert_eq!(field, "price_per_unit");
            }
            other => panic!("expected non-finite value error, got {other:?}"),
        }

        let err = import("lst-6,Sorghum,,12,kg,inf,,,,,,,2025-03-01,seller-3,true\n")
            .expect_err("infinite quantity rejected");
        assert!(err.to_string().contains("non-finite available_quantity"));
    }

    #[test]
    fn rejects_unreadable_timestamps() {
        let err = import("lst-4,Sorghum,,12,kg,5,,,,,,,last tuesday,seller-3,true\n")
            .expect_err("timestamp rejected");
        assert!(err.to_string().contains("last tuesday"));
    }
}
