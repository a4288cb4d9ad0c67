use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::filter::Listing;
use crate::marketplace::domain::{PayType, VerificationLevel};

/// Published job as shown on the find-work board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub pay_min: Option<f64>,
    pub pay_max: Option<f64>,
    pub pay_type: Option<PayType>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub licenses: Vec<String>,
    pub employer_rating: f32,
    pub employer_verification: VerificationLevel,
    pub posted_on: Option<NaiveDate>,
}

/// Worker card as shown on the hire-workers board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfile {
    pub id: String,
    pub display_name: String,
    pub headline: String,
    pub category: String,
    pub location: String,
    pub hourly_rate: Option<f64>,
    pub skills: Vec<String>,
    pub licenses: Vec<String>,
    pub languages: Vec<String>,
    pub rating: f32,
    pub verification: VerificationLevel,
    pub available: bool,
}

impl Listing for JobListing {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn skills(&self) -> &[String] {
        &self.skills
    }

    fn languages(&self) -> &[String] {
        &self.languages
    }

    fn licenses(&self) -> &[String] {
        &self.licenses
    }

    fn pay_range(&self) -> Option<(f64, f64)> {
        match (self.pay_min, self.pay_max) {
            (Some(min), Some(max)) => Some((min, max)),
            (Some(only), None) | (None, Some(only)) => Some((only, only)),
            (None, None) => None,
        }
    }

    fn rating(&self) -> f32 {
        self.employer_rating
    }

    fn verification(&self) -> VerificationLevel {
        self.employer_verification
    }
}

impl Listing for WorkerProfile {
    fn title(&self) -> &str {
        &self.display_name
    }

    fn description(&self) -> &str {
        &self.headline
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn skills(&self) -> &[String] {
        &self.skills
    }

    fn languages(&self) -> &[String] {
        &self.languages
    }

    fn licenses(&self) -> &[String] {
        &self.licenses
    }

    fn pay_range(&self) -> Option<(f64, f64)> {
        self.hourly_rate.map(|rate| (rate, rate))
    }

    fn rating(&self) -> f32 {
        self.rating
    }

    fn verification(&self) -> VerificationLevel {
        self.verification
    }
}
