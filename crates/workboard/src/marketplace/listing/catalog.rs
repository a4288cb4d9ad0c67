use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use tracing::info;

use super::domain::{JobListing, WorkerProfile};
use crate::config::CatalogConfig;
use crate::marketplace::domain::{PayType, VerificationLevel};

/// Fixed in-memory collections backing the listing boards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub jobs: Vec<JobListing>,
    pub workers: Vec<WorkerProfile>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {message}")]
    Row { row: usize, message: String },
}

impl Catalog {
    /// Load CSV collections named by the configuration, falling back to the sample set
    /// for whichever side has no file configured.
    pub fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let sample = Self::sample();
        let jobs = match &config.jobs_csv {
            Some(path) => jobs_from_path(path)?,
            None => sample.jobs,
        };
        let workers = match &config.workers_csv {
            Some(path) => workers_from_path(path)?,
            None => sample.workers,
        };

        info!(jobs = jobs.len(), workers = workers.len(), "listing catalog loaded");
        Ok(Self { jobs, workers })
    }

    pub fn sample() -> Self {
        Self {
            jobs: sample_jobs(),
            workers: sample_workers(),
        }
    }
}

pub fn jobs_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<JobListing>, CatalogError> {
    let file = std::fs::File::open(path)?;
    jobs_from_reader(file)
}

pub fn workers_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<WorkerProfile>, CatalogError> {
    let file = std::fs::File::open(path)?;
    workers_from_reader(file)
}

pub fn jobs_from_reader<R: Read>(reader: R) -> Result<Vec<JobListing>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut jobs = Vec::new();

    for (index, record) in csv_reader.deserialize::<JobRow>().enumerate() {
        let row = record?;
        jobs.push(row.into_listing(index + 1)?);
    }

    Ok(jobs)
}

pub fn workers_from_reader<R: Read>(reader: R) -> Result<Vec<WorkerProfile>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut workers = Vec::new();

    for (index, record) in csv_reader.deserialize::<WorkerRow>().enumerate() {
        let row = record?;
        workers.push(row.into_profile(index + 1)?);
    }

    Ok(workers)
}

#[derive(Debug, Deserialize)]
struct JobRow {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    location: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pay_min: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pay_max: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pay_type: Option<String>,
    #[serde(default)]
    skills: String,
    #[serde(default)]
    languages: String,
    #[serde(default)]
    licenses: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    employer_rating: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    employer_verification: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    posted_on: Option<String>,
}

impl JobRow {
    fn into_listing(self, row: usize) -> Result<JobListing, CatalogError> {
        let pay_type = match self.pay_type.as_deref() {
            Some(raw) => Some(PayType::parse(raw).ok_or_else(|| CatalogError::Row {
                row,
                message: format!("unknown pay type `{raw}`"),
            })?),
            None => None,
        };
        let posted_on = match self.posted_on.as_deref() {
            Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                CatalogError::Row {
                    row,
                    message: format!("posted_on `{raw}` is not YYYY-MM-DD"),
                }
            })?),
            None => None,
        };

        Ok(JobListing {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            location: self.location,
            pay_min: parse_number(self.pay_min.as_deref(), "pay_min", row)?,
            pay_max: parse_number(self.pay_max.as_deref(), "pay_max", row)?,
            pay_type,
            skills: split_cell(&self.skills),
            languages: split_cell(&self.languages),
            licenses: split_cell(&self.licenses),
            employer_rating: parse_rating(self.employer_rating.as_deref(), row)?,
            employer_verification: parse_verification(
                self.employer_verification.as_deref(),
                row,
            )?,
            posted_on,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WorkerRow {
    id: String,
    display_name: String,
    #[serde(default)]
    headline: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    location: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    hourly_rate: Option<String>,
    #[serde(default)]
    skills: String,
    #[serde(default)]
    licenses: String,
    #[serde(default)]
    languages: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    rating: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    verification: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    available: Option<String>,
}

impl WorkerRow {
    fn into_profile(self, row: usize) -> Result<WorkerProfile, CatalogError> {
        let available = match self.available.as_deref().map(str::to_ascii_lowercase) {
            None => true,
            Some(raw) => match raw.as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                _ => {
                    return Err(CatalogError::Row {
                        row,
                        message: format!("available `{raw}` is not a boolean"),
                    })
                }
            },
        };

        Ok(WorkerProfile {
            id: self.id,
            display_name: self.display_name,
            headline: self.headline,
            category: self.category,
            location: self.location,
            hourly_rate: parse_number(self.hourly_rate.as_deref(), "hourly_rate", row)?,
            skills: split_cell(&self.skills),
            licenses: split_cell(&self.licenses),
            languages: split_cell(&self.languages),
            rating: parse_rating(self.rating.as_deref(), row)?,
            verification: parse_verification(self.verification.as_deref(), row)?,
            available,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// List cells use `;` between entries so they survive the comma-separated outer format.
fn split_cell(value: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for entry in value.split(';').map(str::trim).filter(|entry| !entry.is_empty()) {
        if !entries.iter().any(|existing| existing == entry) {
            entries.push(entry.to_string());
        }
    }
    entries
}

fn parse_number(value: Option<&str>, field: &str, row: usize) -> Result<Option<f64>, CatalogError> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.parse::<f64>() {
            Ok(number) if number.is_finite() && number >= 0.0 => Ok(Some(number)),
            _ => Err(CatalogError::Row {
                row,
                message: format!("{field} `{raw}` is not a non-negative number"),
            }),
        },
    }
}

fn parse_rating(value: Option<&str>, row: usize) -> Result<f32, CatalogError> {
    match value {
        None => Ok(0.0),
        Some(raw) => match raw.parse::<f32>() {
            Ok(rating) if (0.0..=5.0).contains(&rating) => Ok(rating),
            _ => Err(CatalogError::Row {
                row,
                message: format!("rating `{raw}` must be between 0 and 5"),
            }),
        },
    }
}

fn parse_verification(value: Option<&str>, row: usize) -> Result<VerificationLevel, CatalogError> {
    match value {
        None => Ok(VerificationLevel::Unverified),
        Some(raw) => VerificationLevel::parse(raw).ok_or_else(|| CatalogError::Row {
            row,
            message: format!("unknown verification level `{raw}`"),
        }),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn sample_jobs() -> Vec<JobListing> {
    vec![
        JobListing {
            id: "job-sample-01".to_string(),
            title: "Framing carpenter".to_string(),
            description: "Frame two single-family homes on a new subdivision.".to_string(),
            category: "Construction".to_string(),
            location: "Austin, TX".to_string(),
            pay_min: Some(24.0),
            pay_max: Some(32.0),
            pay_type: Some(PayType::Hourly),
            skills: strings(&["Framing", "Blueprint reading"]),
            languages: strings(&["English", "Spanish"]),
            licenses: strings(&["OSHA 10"]),
            employer_rating: 4.7,
            employer_verification: VerificationLevel::IdVerified,
            posted_on: NaiveDate::from_ymd_opt(2026, 9, 28),
        },
        JobListing {
            id: "job-sample-02".to_string(),
            title: "Warehouse associate".to_string(),
            description: "Pick, pack and load outbound orders on second shift.".to_string(),
            category: "Warehouse".to_string(),
            location: "Dallas, TX".to_string(),
            pay_min: Some(17.5),
            pay_max: Some(19.0),
            pay_type: Some(PayType::Hourly),
            skills: strings(&["Forklift", "Inventory"]),
            languages: strings(&["English"]),
            licenses: strings(&["Forklift certification"]),
            employer_rating: 4.2,
            employer_verification: VerificationLevel::EmailVerified,
            posted_on: NaiveDate::from_ymd_opt(2026, 10, 1),
        },
        JobListing {
            id: "job-sample-03".to_string(),
            title: "Residential electrician".to_string(),
            description: "Panel upgrades and rewiring for older homes.".to_string(),
            category: "Electrical".to_string(),
            location: "Tulsa, OK".to_string(),
            pay_min: Some(280.0),
            pay_max: Some(360.0),
            pay_type: Some(PayType::Daily),
            skills: strings(&["Wiring", "Panel installation"]),
            languages: strings(&["English"]),
            licenses: strings(&["Journeyman electrician"]),
            employer_rating: 4.9,
            employer_verification: VerificationLevel::BackgroundChecked,
            posted_on: NaiveDate::from_ymd_opt(2026, 10, 3),
        },
        JobListing {
            id: "job-sample-04".to_string(),
            title: "Drywall finisher".to_string(),
            description: "Tape, mud and sand drywall for a commercial build-out.".to_string(),
            category: "Construction".to_string(),
            location: "Houston, TX".to_string(),
            pay_min: Some(1800.0),
            pay_max: Some(1800.0),
            pay_type: Some(PayType::Fixed),
            skills: strings(&["Drywall", "Painting"]),
            languages: strings(&["Spanish"]),
            licenses: Vec::new(),
            employer_rating: 3.8,
            employer_verification: VerificationLevel::Unverified,
            posted_on: NaiveDate::from_ymd_opt(2026, 10, 6),
        },
        JobListing {
            id: "job-sample-05".to_string(),
            title: "Landscaping crew member".to_string(),
            description: "Mowing, edging and seasonal planting. Pay discussed on call."
                .to_string(),
            category: "Landscaping".to_string(),
            location: "San Antonio, TX".to_string(),
            pay_min: None,
            pay_max: None,
            pay_type: None,
            skills: strings(&["Mowing", "Irrigation"]),
            languages: strings(&["English", "Spanish"]),
            licenses: Vec::new(),
            employer_rating: 4.5,
            employer_verification: VerificationLevel::EmailVerified,
            posted_on: NaiveDate::from_ymd_opt(2026, 10, 9),
        },
    ]
}

fn sample_workers() -> Vec<WorkerProfile> {
    vec![
        WorkerProfile {
            id: "worker-sample-01".to_string(),
            display_name: "Marisol Vega".to_string(),
            headline: "Finish carpenter, cabinets and trim".to_string(),
            category: "Construction".to_string(),
            location: "Austin, TX".to_string(),
            hourly_rate: Some(30.0),
            skills: strings(&["Framing", "Trim carpentry"]),
            licenses: strings(&["OSHA 30"]),
            languages: strings(&["English", "Spanish"]),
            rating: 4.8,
            verification: VerificationLevel::BackgroundChecked,
            available: true,
        },
        WorkerProfile {
            id: "worker-sample-02".to_string(),
            display_name: "Devon Price".to_string(),
            headline: "Certified forklift operator, eight years in distribution".to_string(),
            category: "Warehouse".to_string(),
            location: "Dallas, TX".to_string(),
            hourly_rate: Some(19.0),
            skills: strings(&["Forklift", "Shipping"]),
            licenses: strings(&["Forklift certification"]),
            languages: strings(&["English"]),
            rating: 4.4,
            verification: VerificationLevel::IdVerified,
            available: true,
        },
        WorkerProfile {
            id: "worker-sample-03".to_string(),
            display_name: "Anh Tran".to_string(),
            headline: "Licensed electrician for residential service calls".to_string(),
            category: "Electrical".to_string(),
            location: "Tulsa, OK".to_string(),
            hourly_rate: Some(42.0),
            skills: strings(&["Wiring", "Troubleshooting"]),
            licenses: strings(&["Journeyman electrician"]),
            languages: strings(&["English", "Vietnamese"]),
            rating: 4.9,
            verification: VerificationLevel::IdVerified,
            available: false,
        },
        WorkerProfile {
            id: "worker-sample-04".to_string(),
            display_name: "Luis Ortega".to_string(),
            headline: "Landscaping and irrigation repair".to_string(),
            category: "Landscaping".to_string(),
            location: "San Antonio, TX".to_string(),
            hourly_rate: None,
            skills: strings(&["Irrigation", "Mowing"]),
            licenses: Vec::new(),
            languages: strings(&["Spanish"]),
            rating: 3.9,
            verification: VerificationLevel::Unverified,
            available: true,
        },
    ]
}
