//! Linear multi-step form progression shared by the job-post and application flows.
//!
//! A form exposes its per-step validator through [`WizardForm`]; the wizard calls the
//! active step's validator before every forward move.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name to message mapping. A missing key means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepErrors(BTreeMap<String, String>);

impl StepErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(field, message)| (field.as_str(), message.as_str()))
    }

    pub fn merge(&mut self, other: StepErrors) {
        self.0.extend(other.0);
    }

    /// One-line summary suitable for a step-level banner.
    pub fn summary(&self) -> String {
        self.iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Form record that knows how many steps it spans and how to validate each one.
pub trait WizardForm: Clone {
    type Rules: Clone + std::fmt::Debug;

    const STEPS: u8;

    fn step_title(step: u8) -> &'static str;

    fn validate_step(&self, step: u8, rules: &Self::Rules) -> StepErrors;

    /// Validate every step in order, returning the first failing step.
    fn first_invalid_step(&self, rules: &Self::Rules) -> Option<(u8, StepErrors)> {
        (1..=Self::STEPS).find_map(|step| {
            let errors = self.validate_step(step, rules);
            (!errors.is_empty()).then_some((step, errors))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Moved { to: u8 },
    Blocked { errors: StepErrors },
    AtFinalStep,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("step {requested} is out of range 1..={steps}")]
    StepOutOfRange { requested: u8, steps: u8 },
    #[error("cannot jump forward from step {current} to {requested}; use advance")]
    ForwardJump { current: u8, requested: u8 },
    #[error("submission is only available on the final step (current step {current})")]
    NotOnFinalStep { current: u8 },
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("no submission is in flight")]
    NoSubmissionInFlight,
    #[error("step {step} is incomplete: {}", .errors.summary())]
    Incomplete { step: u8, errors: StepErrors },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-facing notification raised after an external call settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Owns one in-progress form record and its progression state.
#[derive(Debug, Clone)]
pub struct StepWizard<F: WizardForm> {
    form: F,
    rules: F::Rules,
    step: u8,
    errors: StepErrors,
    submitting: bool,
    notice: Option<Notice>,
}

impl<F: WizardForm> StepWizard<F> {
    pub fn new(form: F, rules: F::Rules) -> Self {
        Self {
            form,
            rules,
            step: 1,
            errors: StepErrors::new(),
            submitting: false,
            notice: None,
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn steps(&self) -> u8 {
        F::STEPS
    }

    pub fn step_title(&self) -> &'static str {
        F::step_title(self.step)
    }

    pub fn is_final_step(&self) -> bool {
        self.step == F::STEPS
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    /// Mutable access for input handlers. Errors shown for the step are kept until the next advance.
    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn errors(&self) -> &StepErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn validate_current(&self) -> StepErrors {
        self.form.validate_step(self.step, &self.rules)
    }

    pub fn advance(&mut self) -> Advance {
        let errors = self.validate_current();
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Advance::Blocked { errors };
        }

        self.errors = StepErrors::new();
        if self.is_final_step() {
            return Advance::AtFinalStep;
        }

        self.step += 1;
        Advance::Moved { to: self.step }
    }

    pub fn back(&mut self) -> u8 {
        if self.step > 1 {
            self.step -= 1;
        }
        self.errors = StepErrors::new();
        self.step
    }

    /// Jump to the current or any earlier step.
    pub fn go_to(&mut self, step: u8) -> Result<u8, WizardError> {
        if step == 0 || step > F::STEPS {
            return Err(WizardError::StepOutOfRange {
                requested: step,
                steps: F::STEPS,
            });
        }
        if step > self.step {
            return Err(WizardError::ForwardJump {
                current: self.step,
                requested: step,
            });
        }

        self.step = step;
        self.errors = StepErrors::new();
        Ok(self.step)
    }

    /// Snapshot the partial record without validating it.
    pub fn save_draft(&self) -> F {
        self.form.clone()
    }

    /// Re-validate every step and mark the submission in flight.
    ///
    /// When an earlier step no longer validates the wizard moves back to it.
    pub fn begin_submit(&mut self) -> Result<F, WizardError> {
        if self.submitting {
            return Err(WizardError::SubmissionInFlight);
        }
        if !self.is_final_step() {
            return Err(WizardError::NotOnFinalStep { current: self.step });
        }

        if let Some((step, errors)) = self.form.first_invalid_step(&self.rules) {
            self.step = step;
            self.errors = errors.clone();
            return Err(WizardError::Incomplete { step, errors });
        }

        self.submitting = true;
        self.notice = None;
        Ok(self.form.clone())
    }

    /// Settle the in-flight submission. Failures keep the record so the user may retry.
    pub fn finish_submit<T, E: std::fmt::Display>(
        &mut self,
        result: &Result<T, E>,
    ) -> Result<(), WizardError> {
        if !self.submitting {
            return Err(WizardError::NoSubmissionInFlight);
        }

        self.submitting = false;
        self.notice = Some(match result {
            Ok(_) => Notice {
                level: NoticeLevel::Success,
                message: "submitted".to_string(),
            },
            Err(err) => Notice {
                level: NoticeLevel::Error,
                message: format!("operation failed: {err}"),
            },
        });
        Ok(())
    }
}
