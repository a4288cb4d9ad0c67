use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::marketplace::domain::VerificationLevel;

/// Read-only view the filter needs from anything shown on a listing board.
pub trait Listing {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn category(&self) -> &str;
    fn location(&self) -> &str;
    fn skills(&self) -> &[String];
    fn languages(&self) -> &[String];
    fn licenses(&self) -> &[String];
    /// Inclusive pay range, `None` when the listing carries no pay information.
    fn pay_range(&self) -> Option<(f64, f64)>;
    fn rating(&self) -> f32;
    fn verification(&self) -> VerificationLevel;
}

/// Independent, optional narrowing criteria. The default value matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub query: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub pay_min: Option<f64>,
    pub pay_max: Option<f64>,
    pub languages: Vec<String>,
    pub skills: Vec<String>,
    pub licenses: Vec<String>,
    pub min_rating: Option<f32>,
    pub min_verification: Option<VerificationLevel>,
}

enum Predicate {
    Text(String),
    Category(String),
    Location(String),
    Pay { min: f64, max: f64 },
    AnyLanguage(Vec<String>),
    AnySkill(Vec<String>),
    AnyLicense(Vec<String>),
    MinRating(f32),
    MinVerification(VerificationLevel),
}

impl Predicate {
    fn matches<L: Listing>(&self, item: &L) -> bool {
        match self {
            Predicate::Text(needle) => {
                contains_folded(item.title(), needle)
                    || contains_folded(item.description(), needle)
                    || item.skills().iter().any(|skill| contains_folded(skill, needle))
            }
            Predicate::Category(category) => item.category().trim().to_lowercase() == *category,
            Predicate::Location(needle) => contains_folded(item.location(), needle),
            Predicate::Pay { min, max } => match item.pay_range() {
                Some((low, high)) => high >= *min && low <= *max,
                None => false,
            },
            Predicate::AnyLanguage(wanted) => intersects(item.languages(), wanted),
            Predicate::AnySkill(wanted) => intersects(item.skills(), wanted),
            Predicate::AnyLicense(wanted) => intersects(item.licenses(), wanted),
            Predicate::MinRating(minimum) => item.rating() >= *minimum,
            Predicate::MinVerification(minimum) => item.verification() >= *minimum,
        }
    }
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.predicates().is_empty()
    }

    fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if let Some(query) = non_blank(self.query.as_deref()) {
            predicates.push(Predicate::Text(query));
        }
        if let Some(category) = non_blank(self.category.as_deref()) {
            predicates.push(Predicate::Category(category));
        }
        if let Some(location) = non_blank(self.location.as_deref()) {
            predicates.push(Predicate::Location(location));
        }
        if self.pay_min.is_some() || self.pay_max.is_some() {
            predicates.push(Predicate::Pay {
                min: self.pay_min.unwrap_or(f64::NEG_INFINITY),
                max: self.pay_max.unwrap_or(f64::INFINITY),
            });
        }
        if let Some(wanted) = folded_set(&self.languages) {
            predicates.push(Predicate::AnyLanguage(wanted));
        }
        if let Some(wanted) = folded_set(&self.skills) {
            predicates.push(Predicate::AnySkill(wanted));
        }
        if let Some(wanted) = folded_set(&self.licenses) {
            predicates.push(Predicate::AnyLicense(wanted));
        }
        if let Some(minimum) = self.min_rating {
            predicates.push(Predicate::MinRating(minimum));
        }
        if let Some(minimum) = self.min_verification {
            predicates.push(Predicate::MinVerification(minimum));
        }

        predicates
    }
}

/// Narrow `items` to those satisfying every active criterion, keeping their original order.
///
/// Each criterion produces its own match mask over the full collection and the masks are
/// intersected, so no criterion depends on another's result.
pub fn filter_listings<'a, L: Listing>(items: &'a [L], criteria: &FilterCriteria) -> Vec<&'a L> {
    let predicates = criteria.predicates();
    let mut keep = vec![true; items.len()];

    for predicate in &predicates {
        let mask: Vec<bool> = items.iter().map(|item| predicate.matches(item)).collect();
        for (slot, matched) in keep.iter_mut().zip(mask) {
            *slot &= matched;
        }
    }

    let matches: Vec<&L> = items
        .iter()
        .zip(keep)
        .filter_map(|(item, kept)| kept.then_some(item))
        .collect();
    debug!(
        criteria = predicates.len(),
        total = items.len(),
        matched = matches.len(),
        "listing filter evaluated"
    );
    matches
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaySort {
    LowToHigh,
    HighToLow,
}

impl PaySort {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pay_asc" | "low_to_high" | "asc" => Some(PaySort::LowToHigh),
            "pay_desc" | "high_to_low" | "desc" => Some(PaySort::HighToLow),
            _ => None,
        }
    }
}

/// Stable sort on the upper pay bound. Listings without pay always sort last.
pub fn sort_by_pay<L: Listing>(items: &mut [&L], order: PaySort) {
    items.sort_by(|a, b| {
        match (a.pay_range(), b.pay_range()) {
            (Some((_, a_max)), Some((_, b_max))) => {
                let ordering = a_max.partial_cmp(&b_max).unwrap_or(Ordering::Equal);
                match order {
                    PaySort::LowToHigh => ordering,
                    PaySort::HighToLow => ordering.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

fn folded_set(values: &[String]) -> Option<Vec<String>> {
    let folded: Vec<String> = values
        .iter()
        .filter_map(|value| non_blank(Some(value.as_str())))
        .collect();
    (!folded.is_empty()).then_some(folded)
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    haystack.to_lowercase().contains(folded_needle)
}

fn intersects(values: &[String], wanted: &[String]) -> bool {
    values
        .iter()
        .any(|value| wanted.contains(&value.trim().to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::listing::catalog::Catalog;
    use crate::marketplace::listing::domain::JobListing;

    fn ids<'a>(items: &[&'a JobListing]) -> Vec<&'a str> {
        items.iter().map(|job| job.id.as_str()).collect()
    }

    #[test]
    fn empty_criteria_return_everything_in_order() {
        let catalog = Catalog::sample();
        let matches = filter_listings(&catalog.jobs, &FilterCriteria::default());
        let expected: Vec<&str> = catalog.jobs.iter().map(|job| job.id.as_str()).collect();
        assert_eq!(ids(&matches), expected);
    }

    #[test]
    fn query_matches_title_description_or_skill() {
        let catalog = Catalog::sample();
        let criteria = FilterCriteria {
            query: Some("  FORKLIFT ".to_string()),
            ..FilterCriteria::default()
        };

        let matches = filter_listings(&catalog.jobs, &criteria);
        assert!(!matches.is_empty());
        for job in matches {
            let hit = job.title.to_lowercase().contains("forklift")
                || job.description.to_lowercase().contains("forklift")
                || job
                    .skills
                    .iter()
                    .any(|skill| skill.to_lowercase().contains("forklift"));
            assert!(hit, "{} should not match", job.id);
        }
    }

    #[test]
    fn category_is_exact_but_case_insensitive() {
        let catalog = Catalog::sample();
        let exact = FilterCriteria {
            category: Some("construction".to_string()),
            ..FilterCriteria::default()
        };
        let partial = FilterCriteria {
            category: Some("constr".to_string()),
            ..FilterCriteria::default()
        };

        assert!(!filter_listings(&catalog.jobs, &exact).is_empty());
        assert!(filter_listings(&catalog.jobs, &partial).is_empty());
    }

    #[test]
    fn pay_bounds_select_overlapping_ranges() {
        let catalog = Catalog::sample();
        let criteria = FilterCriteria {
            pay_min: Some(25.0),
            ..FilterCriteria::default()
        };

        for job in filter_listings(&catalog.jobs, &criteria) {
            let (_, high) = job.pay_range().expect("pay present");
            assert!(high >= 25.0);
        }
    }

    #[test]
    fn adding_a_criterion_never_grows_the_result() {
        let catalog = Catalog::sample();
        let steps = [
            FilterCriteria::default(),
            FilterCriteria {
                location: Some("tx".to_string()),
                ..FilterCriteria::default()
            },
            FilterCriteria {
                location: Some("tx".to_string()),
                languages: vec!["english".to_string()],
                ..FilterCriteria::default()
            },
            FilterCriteria {
                location: Some("tx".to_string()),
                languages: vec!["english".to_string()],
                min_rating: Some(4.5),
                ..FilterCriteria::default()
            },
            FilterCriteria {
                location: Some("tx".to_string()),
                languages: vec!["english".to_string()],
                min_rating: Some(4.5),
                min_verification: Some(VerificationLevel::IdVerified),
                ..FilterCriteria::default()
            },
        ];

        let mut previous = usize::MAX;
        for criteria in &steps {
            let count = filter_listings(&catalog.jobs, criteria).len();
            assert!(count <= previous, "{criteria:?} grew the result");
            previous = count;
        }
    }

    #[test]
    fn verification_floor_uses_ordering() {
        let catalog = Catalog::sample();
        let criteria = FilterCriteria {
            min_verification: Some(VerificationLevel::BackgroundChecked),
            ..FilterCriteria::default()
        };

        for worker in filter_listings(&catalog.workers, &criteria) {
            assert_eq!(worker.verification, VerificationLevel::BackgroundChecked);
        }
    }

    #[test]
    fn blank_set_entries_are_ignored() {
        let criteria = FilterCriteria {
            skills: vec!["  ".to_string()],
            query: Some("".to_string()),
            ..FilterCriteria::default()
        };
        assert!(criteria.is_empty());
    }

    #[test]
    fn pay_sort_places_unpaid_listings_last() {
        let catalog = Catalog::sample();
        let mut jobs: Vec<&JobListing> = catalog.jobs.iter().collect();
        sort_by_pay(&mut jobs, PaySort::HighToLow);

        let highs: Vec<f64> = jobs
            .iter()
            .filter_map(|job| job.pay_range().map(|(_, high)| high))
            .collect();
        assert!(highs.windows(2).all(|pair| pair[0] >= pair[1]));
        let first_unpaid = jobs.iter().position(|job| job.pay_range().is_none());
        if let Some(index) = first_unpaid {
            assert!(jobs[index..].iter().all(|job| job.pay_range().is_none()));
        }
    }
}
