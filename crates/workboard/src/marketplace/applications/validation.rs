use chrono::NaiveDate;

use super::domain::{JobApplication, Reference};
use crate::marketplace::wizard::{StepErrors, WizardForm};

pub const STEP_INTRODUCTION: u8 = 1;
pub const STEP_REFERENCES: u8 = 2;
pub const STEP_AVAILABILITY: u8 = 3;
pub const STEP_SKILLS: u8 = 4;

impl WizardForm for JobApplication {
    type Rules = ();

    const STEPS: u8 = 4;

    fn step_title(step: u8) -> &'static str {
        match step {
            STEP_INTRODUCTION => "Introduce yourself",
            STEP_REFERENCES => "References",
            STEP_AVAILABILITY => "Availability",
            _ => "Confirm skills & submit",
        }
    }

    fn validate_step(&self, step: u8, _rules: &()) -> StepErrors {
        match step {
            STEP_INTRODUCTION => validate_introduction(self),
            STEP_REFERENCES => validate_references(self),
            STEP_AVAILABILITY => validate_availability(self),
            STEP_SKILLS => validate_skills(self),
            _ => StepErrors::new(),
        }
    }
}

pub fn validate_introduction(application: &JobApplication) -> StepErrors {
    let mut errors = StepErrors::new();
    if application.introduction.trim().is_empty() {
        errors.insert("introduction", "Tell the employer a little about yourself");
    }
    errors
}

pub fn validate_references(application: &JobApplication) -> StepErrors {
    let mut errors = StepErrors::new();
    for (index, reference) in application.references.items().enumerate() {
        check_reference(&mut errors, index, reference);
    }
    errors
}

fn check_reference(errors: &mut StepErrors, index: usize, reference: &Reference) {
    if reference.name.trim().is_empty() {
        errors.insert(
            format!("references.{index}.name"),
            "Reference name is required",
        );
    }

    let phone = reference.phone.trim();
    let email = reference.email.trim();
    if phone.is_empty() && email.is_empty() {
        errors.insert(
            format!("references.{index}.phone"),
            "Provide a phone number or email for this reference",
        );
    }
    if !email.is_empty() && !looks_like_email(email) {
        errors.insert(
            format!("references.{index}.email"),
            "Enter a valid email address",
        );
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

pub fn validate_availability(application: &JobApplication) -> StepErrors {
    let mut errors = StepErrors::new();
    let availability = &application.availability;

    let start = availability.start_date.trim();
    if start.is_empty() {
        errors.insert("availability.startDate", "Start date is required");
    } else if NaiveDate::parse_from_str(start, "%Y-%m-%d").is_err() {
        errors.insert(
            "availability.startDate",
            "Start date must be formatted as YYYY-MM-DD",
        );
    }

    match availability.days_per_week {
        Some(days) if (1..=7).contains(&days) => {}
        Some(_) => errors.insert(
            "availability.daysPerWeek",
            "Days per week must be between 1 and 7",
        ),
        None => errors.insert("availability.daysPerWeek", "Days per week is required"),
    }

    match availability.hours_per_day {
        Some(hours) if (1..=24).contains(&hours) => {}
        Some(_) => errors.insert(
            "availability.hoursPerDay",
            "Hours per day must be between 1 and 24",
        ),
        None => errors.insert("availability.hoursPerDay", "Hours per day is required"),
    }

    errors
}

pub fn validate_skills(application: &JobApplication) -> StepErrors {
    let mut errors = StepErrors::new();
    if application.confirm_skills.is_empty() {
        errors.insert("confirmSkills", "Confirm at least one skill for this job");
    }
    errors
}

/// Fields that must be present before an application can be handed off at all.
pub fn missing_required_fields(application: &JobApplication) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if application.job_id.trim().is_empty() {
        missing.push("jobId");
    }
    if application.applicant_id.trim().is_empty() {
        missing.push("applicantId");
    }
    if application.introduction.trim().is_empty() {
        missing.push("introduction");
    }
    if application.availability.start_date.trim().is_empty() {
        missing.push("availability.startDate");
    }
    if application.confirm_skills.is_empty() {
        missing.push("confirmSkills");
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_check_requires_both_sides() {
        assert!(looks_like_email("dana@cole.example"));
        assert!(!looks_like_email("@cole.example"));
        assert!(!looks_like_email("dana@"));
        assert!(!looks_like_email("dana.cole.example"));
        assert!(!looks_like_email("a@b@c"));
    }

    #[test]
    fn reference_errors_are_keyed_by_position() {
        let mut application = JobApplication::new("job-1", "worker-1");
        application.add_reference(Reference {
            name: "Kim Ortiz".to_string(),
            phone: "555-0101".to_string(),
            ..Reference::default()
        });
        application.add_reference(Reference {
            email: "not-an-email".to_string(),
            ..Reference::default()
        });

        let errors = validate_references(&application);
        assert!(!errors.contains("references.0.name"));
        assert!(errors.contains("references.1.name"));
        assert!(errors.contains("references.1.email"));
        assert!(!errors.contains("references.1.phone"));
    }

    #[test]
    fn references_are_optional() {
        let application = JobApplication::new("job-1", "worker-1");
        assert!(validate_references(&application).is_empty());
    }
}
