use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::marketplace::domain::{GateAnswer, PayType};
use crate::marketplace::sublist::{dedup_values, push_unique, remove_value};

/// In-progress job post, mutated step by step by the posting wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobPostFormData {
    pub title: String,
    pub category: String,
    pub description: String,
    pub location: String,
    pub pay_min: Option<f64>,
    pub pay_max: Option<f64>,
    pub pay_type: Option<PayType>,
    pub variable_hours: bool,
    pub hours_description: String,
    pub required_skills: Vec<String>,
    pub certifications: Vec<String>,
    pub language_requirements: Vec<String>,
    pub no_language_requirement: bool,
    pub requires_tools: bool,
    pub requires_transportation: bool,
    #[serde(deserialize_with = "deserialize_gate")]
    pub requires_background_check: Option<GateAnswer>,
    #[serde(deserialize_with = "deserialize_gate")]
    pub requires_intro_video: Option<GateAnswer>,
    #[serde(deserialize_with = "deserialize_gate")]
    pub requires_references: Option<GateAnswer>,
}

/// Resolved view of the language fields. The "no requirement" flag wins over a populated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "languages")]
pub enum LanguagePolicy {
    NotRequired,
    Required(Vec<String>),
    Unspecified,
}

impl JobPostFormData {
    pub fn add_skill(&mut self, skill: impl Into<String>) -> bool {
        push_unique(&mut self.required_skills, skill)
    }

    pub fn remove_skill(&mut self, skill: &str) -> bool {
        remove_value(&mut self.required_skills, skill)
    }

    pub fn add_certification(&mut self, certification: impl Into<String>) -> bool {
        push_unique(&mut self.certifications, certification)
    }

    pub fn remove_certification(&mut self, certification: &str) -> bool {
        remove_value(&mut self.certifications, certification)
    }

    /// Adding a specific language withdraws a previous "no requirement" selection.
    pub fn add_language(&mut self, language: impl Into<String>) -> bool {
        let added = push_unique(&mut self.language_requirements, language);
        if added {
            self.no_language_requirement = false;
        }
        added
    }

    pub fn remove_language(&mut self, language: &str) -> bool {
        remove_value(&mut self.language_requirements, language)
    }

    pub fn set_no_language_requirement(&mut self, value: bool) {
        self.no_language_requirement = value;
        if value {
            self.language_requirements.clear();
        }
    }

    pub fn language_policy(&self) -> LanguagePolicy {
        if self.no_language_requirement {
            LanguagePolicy::NotRequired
        } else if self.language_requirements.is_empty() {
            LanguagePolicy::Unspecified
        } else {
            LanguagePolicy::Required(self.language_requirements.clone())
        }
    }

    /// Canonical form handed to validation and persistence: trimmed scalars, deduplicated
    /// arrays and exclusive language fields.
    pub fn normalized(&self) -> Self {
        let mut form = self.clone();
        form.title = form.title.trim().to_string();
        form.category = form.category.trim().to_string();
        form.description = form.description.trim().to_string();
        form.location = form.location.trim().to_string();
        form.hours_description = form.hours_description.trim().to_string();
        form.required_skills = dedup_values(&form.required_skills);
        form.certifications = dedup_values(&form.certifications);
        form.language_requirements = dedup_values(&form.language_requirements);
        if form.no_language_requirement {
            form.language_requirements.clear();
        }
        form
    }
}

/// Accepts `true`/`false`, `"required"`/`"not_required"` or `null` for a requirement gate.
fn deserialize_gate<'de, D>(deserializer: D) -> Result<Option<GateAnswer>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawGate {
        Flag(bool),
        Answer(GateAnswer),
    }

    let raw = Option::<RawGate>::deserialize(deserializer)?;
    Ok(raw.map(|gate| match gate {
        RawGate::Flag(flag) => GateAnswer::from(flag),
        RawGate::Answer(answer) => answer,
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobPostId(pub String);

impl std::fmt::Display for JobPostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPostStatus {
    Draft,
    Published,
}

impl JobPostStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobPostStatus::Draft => "draft",
            JobPostStatus::Published => "published",
        }
    }
}

/// Persisted representation of a job post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPost {
    pub id: JobPostId,
    pub employer_id: String,
    pub status: JobPostStatus,
    pub form: JobPostFormData,
    pub updated_at: DateTime<Utc>,
}
