use serde::Deserialize;

use crate::marketplace::domain::VerificationLevel;
use crate::marketplace::listing::WorkerProfile;
use crate::marketplace::sublist::dedup_values;
use crate::marketplace::wizard::StepErrors;

pub const MAX_RATING: f32 = 5.0;

/// Fields a worker may edit on their own profile. Verification is never client supplied.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub display_name: String,
    pub headline: String,
    pub category: String,
    pub location: String,
    pub hourly_rate: Option<f64>,
    pub skills: Vec<String>,
    pub licenses: Vec<String>,
    pub languages: Vec<String>,
    pub rating: Option<f32>,
    pub available: bool,
}

impl ProfileUpdate {
    pub fn normalized(mut self) -> Self {
        self.display_name = self.display_name.trim().to_string();
        self.headline = self.headline.trim().to_string();
        self.category = self.category.trim().to_string();
        self.location = self.location.trim().to_string();
        self.skills = dedup_values(&self.skills);
        self.licenses = dedup_values(&self.licenses);
        self.languages = dedup_values(&self.languages);
        self
    }

    pub fn validate(&self) -> StepErrors {
        let mut errors = StepErrors::new();
        if self.display_name.trim().is_empty() {
            errors.insert("displayName", "Display name is required");
        }
        if let Some(rate) = self.hourly_rate {
            if !rate.is_finite() || rate < 0.0 {
                errors.insert("hourlyRate", "Hourly rate must be zero or more");
            }
        }
        if let Some(rating) = self.rating {
            if !(0.0..=MAX_RATING).contains(&rating) {
                errors.insert("rating", "Rating must be between 0 and 5");
            }
        }
        errors
    }

    /// Build the stored profile, keeping rating and verification from `existing` when the
    /// update leaves them out.
    pub fn apply(self, worker_id: &str, existing: Option<&WorkerProfile>) -> WorkerProfile {
        let (rating, verification) = existing
            .map(|profile| (profile.rating, profile.verification))
            .unwrap_or((0.0, VerificationLevel::Unverified));

        WorkerProfile {
            id: worker_id.to_string(),
            display_name: self.display_name,
            headline: self.headline,
            category: self.category,
            location: self.location,
            hourly_rate: self.hourly_rate,
            skills: self.skills,
            licenses: self.licenses,
            languages: self.languages,
            rating: self.rating.unwrap_or(rating),
            verification,
            available: self.available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_trims_text_and_collapses_lists() {
        let update = ProfileUpdate {
            display_name: "  Rosa Diaz ".to_string(),
            skills: vec![
                "Drywall".to_string(),
                "Drywall".to_string(),
                " ".to_string(),
                "Painting".to_string(),
            ],
            languages: vec!["Spanish".to_string(), "Spanish".to_string()],
            ..ProfileUpdate::default()
        }
        .normalized();

        assert_eq!(update.display_name, "Rosa Diaz");
        assert_eq!(update.skills, vec!["Drywall", "Painting"]);
        assert_eq!(update.languages, vec!["Spanish"]);
    }

    #[test]
    fn rating_and_rate_bounds_are_enforced() {
        let update = ProfileUpdate {
            display_name: "Rosa".to_string(),
            hourly_rate: Some(-4.0),
            rating: Some(5.5),
            ..ProfileUpdate::default()
        };
        let errors = update.validate();
        assert!(errors.contains("hourlyRate"));
        assert!(errors.contains("rating"));

        let edge = ProfileUpdate {
            display_name: "Rosa".to_string(),
            hourly_rate: Some(0.0),
            rating: Some(MAX_RATING),
            ..ProfileUpdate::default()
        };
        assert!(edge.validate().is_empty());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let update = ProfileUpdate {
            display_name: "Rosa".to_string(),
            hourly_rate: Some(f64::NAN),
            rating: Some(f32::INFINITY),
            ..ProfileUpdate::default()
        };
        let errors = update.validate();
        assert_eq!(errors.len(), 2);
    }
}
