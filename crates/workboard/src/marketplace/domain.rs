use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayType {
    Hourly,
    Daily,
    Fixed,
}

impl PayType {
    pub const fn label(self) -> &'static str {
        match self {
            PayType::Hourly => "per hour",
            PayType::Daily => "per day",
            PayType::Fixed => "fixed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "hourly" | "hour" => Some(PayType::Hourly),
            "daily" | "day" => Some(PayType::Daily),
            "fixed" | "project" => Some(PayType::Fixed),
            _ => None,
        }
    }
}

/// Coarse trust tier attached to an employer or worker account.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VerificationLevel {
    #[default]
    Unverified,
    EmailVerified,
    IdVerified,
    BackgroundChecked,
}

impl VerificationLevel {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Unverified,
            Self::EmailVerified,
            Self::IdVerified,
            Self::BackgroundChecked,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unverified => "Unverified",
            Self::EmailVerified => "Email verified",
            Self::IdVerified => "ID verified",
            Self::BackgroundChecked => "Background checked",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "unverified" => Some(Self::Unverified),
            "email_verified" | "email" => Some(Self::EmailVerified),
            "id_verified" | "id" => Some(Self::IdVerified),
            "background_checked" | "background" => Some(Self::BackgroundChecked),
            _ => None,
        }
    }
}

/// Explicit answer to an optional requirement gate. `None` on a form means "not answered yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateAnswer {
    Required,
    NotRequired,
}

impl GateAnswer {
    pub const fn is_required(self) -> bool {
        match self {
            GateAnswer::Required => true,
            GateAnswer::NotRequired => false,
        }
    }
}

impl From<bool> for GateAnswer {
    fn from(value: bool) -> Self {
        if value {
            GateAnswer::Required
        } else {
            GateAnswer::NotRequired
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_levels_are_ordered_by_trust() {
        let levels = VerificationLevel::ordered();
        assert!(levels.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(
            VerificationLevel::parse("ID-Verified"),
            Some(VerificationLevel::IdVerified)
        );
        assert_eq!(VerificationLevel::parse("gold"), None);
    }

    #[test]
    fn pay_type_parses_aliases() {
        assert_eq!(PayType::parse(" Hourly "), Some(PayType::Hourly));
        assert_eq!(PayType::parse("project"), Some(PayType::Fixed));
        assert_eq!(PayType::parse("weekly"), None);
    }
}
