//! Farm database records

use crate::error::{KissanError, Result};
use crate::models::imagery::DateRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Names and emails are stored and matched lowercase
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Normalize an email address, rejecting obviously malformed ones
pub fn normalize_email(email: &str) -> Result<String> {
    let email = normalize_key(email);
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(KissanError::InvalidInput {
            field: "email".to_string(),
            reason: format!("'{}' is not an email address", email),
        })
    }
}

/// Parse season start and end dates (`YYYY-MM-DD`), rejecting reversed ranges
pub fn parse_season(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate)> {
    let range = DateRange::parse(start, end)?;
    Ok((range.start.date_naive(), range.end.date_naive()))
}

/// Reject a season that ends before it starts
pub fn check_season(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(KissanError::InvalidDateRange { start: start.to_string(), end: end.to_string() });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub id: i64,
    pub name: String,
    pub owner_email: String,
    /// Plot boundary as WKT
    pub boundary: String,
}

/// A vegetation bed: a small growing area where individual plants are tracked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationBed {
    pub id: i64,
    pub name: String,
    pub owner_email: String,
    pub boundary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variety {
    pub id: i64,
    pub name: String,
    pub species: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeason {
    pub id: i64,
    pub plot_id: i64,
    pub variety: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantSeason {
    pub id: i64,
    pub veg_bed_id: i64,
    pub variety: String,
    /// Plant position(s) as WKT
    pub position: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
