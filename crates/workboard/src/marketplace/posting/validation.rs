use serde::{Deserialize, Serialize};

use super::domain::JobPostFormData;
use crate::marketplace::domain::GateAnswer;
use crate::marketplace::wizard::{StepErrors, WizardForm};

pub const MIN_DESCRIPTION_CHARS: usize = 20;

pub const STEP_BASICS: u8 = 1;
pub const STEP_SKILLS: u8 = 2;
pub const STEP_REQUIREMENTS: u8 = 3;
pub const STEP_REVIEW: u8 = 4;

/// How the optional screening gates (background check, intro video, references) must be answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateRule {
    /// Any explicit answer passes; an unanswered gate fails.
    #[default]
    Answered,
    /// Only an affirmative answer passes.
    Affirmative,
}

impl GateRule {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "answered" => Some(GateRule::Answered),
            "affirmative" => Some(GateRule::Affirmative),
            _ => None,
        }
    }

    fn accepts(self, answer: Option<GateAnswer>) -> bool {
        match (self, answer) {
            (_, None) => false,
            (GateRule::Answered, Some(_)) => true,
            (GateRule::Affirmative, Some(answer)) => answer.is_required(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostingRules {
    pub gate_rule: GateRule,
}

impl WizardForm for JobPostFormData {
    type Rules = PostingRules;

    const STEPS: u8 = 4;

    fn step_title(step: u8) -> &'static str {
        match step {
            STEP_BASICS => "Job basics",
            STEP_SKILLS => "Skills & certifications",
            STEP_REQUIREMENTS => "Requirements",
            _ => "Review & publish",
        }
    }

    fn validate_step(&self, step: u8, rules: &PostingRules) -> StepErrors {
        match step {
            STEP_BASICS => validate_basics(self),
            STEP_SKILLS => validate_skills(self),
            STEP_REQUIREMENTS => validate_requirements(self, rules),
            _ => StepErrors::new(),
        }
    }
}

pub fn validate_basics(form: &JobPostFormData) -> StepErrors {
    let mut errors = StepErrors::new();

    if is_blank(&form.title) {
        errors.insert("title", "Job title is required");
    }
    if is_blank(&form.category) {
        errors.insert("category", "Category is required");
    }
    if is_blank(&form.description) {
        errors.insert("description", "Description is required");
    } else if form.description.trim().chars().count() < MIN_DESCRIPTION_CHARS {
        errors.insert(
            "description",
            format!("Description must be at least {MIN_DESCRIPTION_CHARS} characters"),
        );
    }
    if is_blank(&form.location) {
        errors.insert("location", "Location is required");
    }
    if form.pay_type.is_none() {
        errors.insert("payType", "Pay type is required");
    }

    let min_ok = check_pay(&mut errors, "payMin", "Minimum pay", form.pay_min);
    let max_ok = check_pay(&mut errors, "payMax", "Maximum pay", form.pay_max);
    if let (true, true, Some(min), Some(max)) = (min_ok, max_ok, form.pay_min, form.pay_max) {
        if max < min {
            errors.insert(
                "payMax",
                "Maximum pay must be greater than or equal to minimum pay",
            );
        }
    }

    errors
}

pub fn validate_skills(form: &JobPostFormData) -> StepErrors {
    let mut errors = StepErrors::new();
    if form.required_skills.is_empty() {
        errors.insert("requiredSkills", "Add at least one required skill");
    }
    errors
}

pub fn validate_requirements(form: &JobPostFormData, rules: &PostingRules) -> StepErrors {
    let mut errors = StepErrors::new();

    let gates = [
        (
            "requiresBackgroundCheck",
            "background check",
            form.requires_background_check,
        ),
        ("requiresIntroVideo", "intro video", form.requires_intro_video),
        ("requiresReferences", "references", form.requires_references),
    ];
    for (field, label, answer) in gates {
        if !rules.gate_rule.accepts(answer) {
            let message = match rules.gate_rule {
                GateRule::Answered => format!("Please indicate whether {label} is required"),
                GateRule::Affirmative => format!("Please confirm the {label} requirement"),
            };
            errors.insert(field, message);
        }
    }

    if !form.no_language_requirement && form.language_requirements.is_empty() {
        errors.insert(
            "languageRequirements",
            "Add at least one language or select no language requirement",
        );
    }

    errors
}

fn check_pay(errors: &mut StepErrors, field: &str, label: &str, value: Option<f64>) -> bool {
    match value {
        None => {
            errors.insert(field, format!("{label} is required"));
            false
        }
        Some(amount) if !amount.is_finite() => {
            errors.insert(field, format!("{label} must be a number"));
            false
        }
        Some(amount) if amount < 0.0 => {
            errors.insert(field, format!("{label} cannot be negative"));
            false
        }
        Some(_) => true,
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::domain::PayType;

    fn basics() -> JobPostFormData {
        JobPostFormData {
            title: "Warehouse associate".to_string(),
            category: "Logistics".to_string(),
            description: "Pick, pack and load outbound freight on day shift.".to_string(),
            location: "Des Moines, IA".to_string(),
            pay_min: Some(18.0),
            pay_max: Some(22.5),
            pay_type: Some(PayType::Hourly),
            ..JobPostFormData::default()
        }
    }

    #[test]
    fn complete_basics_pass() {
        assert!(validate_basics(&basics()).is_empty());
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = validate_basics(&JobPostFormData::default());
        for field in [
            "title",
            "category",
            "description",
            "location",
            "payType",
            "payMin",
            "payMax",
        ] {
            assert!(errors.contains(field), "missing error for {field}");
        }
        assert_eq!(errors.len(), 7);
    }

    #[test]
    fn inverted_pay_range_flags_max_only() {
        let form = JobPostFormData {
            pay_min: Some(30.0),
            pay_max: Some(20.0),
            ..basics()
        };

        let errors = validate_basics(&form);
        assert_eq!(errors.len(), 1);
        let message = errors.get("payMax").expect("payMax error");
        assert!(message.contains("greater than or equal to minimum"));
        assert!(!errors.contains("payMin"));
    }

    #[test]
    fn equal_pay_bounds_are_valid() {
        let form = JobPostFormData {
            pay_min: Some(25.0),
            pay_max: Some(25.0),
            ..basics()
        };
        assert!(validate_basics(&form).is_empty());
    }

    #[test]
    fn negative_pay_is_rejected() {
        let form = JobPostFormData {
            pay_min: Some(-1.0),
            ..basics()
        };
        let errors = validate_basics(&form);
        assert_eq!(errors.get("payMin"), Some("Minimum pay cannot be negative"));
        assert!(!errors.contains("payMax"));
    }

    #[test]
    fn description_threshold_is_twenty_characters() {
        let short = JobPostFormData {
            description: "x".repeat(MIN_DESCRIPTION_CHARS - 1),
            ..basics()
        };
        assert!(validate_basics(&short)
            .get("description")
            .expect("short description error")
            .contains("at least 20"));

        let exact = JobPostFormData {
            description: "x".repeat(MIN_DESCRIPTION_CHARS),
            ..basics()
        };
        assert!(!validate_basics(&exact).contains("description"));
    }

    #[test]
    fn padding_does_not_count_toward_description_length() {
        let padded = JobPostFormData {
            description: format!("{}     ", "a".repeat(MIN_DESCRIPTION_CHARS - 1)),
            ..basics()
        };
        assert!(validate_basics(&padded).contains("description"));
    }

    #[test]
    fn validators_are_idempotent() {
        let form = JobPostFormData {
            pay_min: Some(40.0),
            pay_max: Some(10.0),
            description: "short".to_string(),
            ..JobPostFormData::default()
        };
        let rules = PostingRules::default();
        for step in 1..=JobPostFormData::STEPS {
            assert_eq!(
                form.validate_step(step, &rules),
                form.validate_step(step, &rules)
            );
        }
    }

    #[test]
    fn skills_step_requires_one_skill() {
        let mut form = basics();
        assert!(validate_skills(&form).contains("requiredSkills"));
        form.add_skill("Forklift");
        assert!(validate_skills(&form).is_empty());
    }

    #[test]
    fn answered_rule_accepts_explicit_declines() {
        let form = JobPostFormData {
            requires_background_check: Some(GateAnswer::NotRequired),
            requires_intro_video: Some(GateAnswer::NotRequired),
            requires_references: Some(GateAnswer::Required),
            language_requirements: vec!["English".to_string()],
            ..basics()
        };
        assert!(validate_requirements(&form, &PostingRules::default()).is_empty());
    }

    #[test]
    fn affirmative_rule_rejects_declines() {
        let form = JobPostFormData {
            requires_background_check: Some(GateAnswer::NotRequired),
            requires_intro_video: Some(GateAnswer::Required),
            requires_references: None,
            no_language_requirement: true,
            ..basics()
        };
        let rules = PostingRules {
            gate_rule: GateRule::Affirmative,
        };
        let errors = validate_requirements(&form, &rules);
        assert!(errors.contains("requiresBackgroundCheck"));
        assert!(errors.contains("requiresReferences"));
        assert!(!errors.contains("requiresIntroVideo"));
    }

    #[test]
    fn unanswered_gates_fail_under_default_rule() {
        let form = JobPostFormData {
            no_language_requirement: true,
            ..basics()
        };
        let errors = validate_requirements(&form, &PostingRules::default());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn no_language_flag_wins_over_populated_list() {
        let form = JobPostFormData {
            no_language_requirement: true,
            language_requirements: vec!["Vietnamese".to_string()],
            requires_background_check: Some(GateAnswer::Required),
            requires_intro_video: Some(GateAnswer::Required),
            requires_references: Some(GateAnswer::Required),
            ..basics()
        };
        let errors = validate_requirements(&form, &PostingRules::default());
        assert!(!errors.contains("languageRequirements"));
        assert!(errors.is_empty());
    }

    #[test]
    fn languages_required_without_flag() {
        let form = JobPostFormData {
            requires_background_check: Some(GateAnswer::Required),
            requires_intro_video: Some(GateAnswer::Required),
            requires_references: Some(GateAnswer::Required),
            ..basics()
        };
        let errors = validate_requirements(&form, &PostingRules::default());
        assert!(errors.contains("languageRequirements"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn review_step_has_no_rules() {
        let form = JobPostFormData::default();
        assert!(form
            .validate_step(STEP_REVIEW, &PostingRules::default())
            .is_empty());
    }
}
