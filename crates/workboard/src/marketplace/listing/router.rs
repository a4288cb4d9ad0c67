use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::catalog::Catalog;
use super::filter::{filter_listings, sort_by_pay, FilterCriteria, Listing, PaySort};
use crate::marketplace::domain::VerificationLevel;

/// Raw query string accepted by both listing boards. Set-valued filters are comma separated.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub pay_min: Option<String>,
    pub pay_max: Option<String>,
    pub languages: Option<String>,
    pub skills: Option<String>,
    pub licenses: Option<String>,
    pub min_rating: Option<String>,
    pub min_verification: Option<String>,
    pub sort: Option<String>,
}

impl ListingQuery {
    pub fn criteria(&self) -> Result<FilterCriteria, String> {
        let min_verification = match blank_to_none(self.min_verification.as_deref()) {
            Some(raw) => Some(
                VerificationLevel::parse(raw)
                    .ok_or_else(|| format!("unknown verification level '{raw}'"))?,
            ),
            None => None,
        };

        Ok(FilterCriteria {
            query: self.q.clone(),
            category: self.category.clone(),
            location: self.location.clone(),
            pay_min: parse_number(self.pay_min.as_deref(), "pay_min")?,
            pay_max: parse_number(self.pay_max.as_deref(), "pay_max")?,
            languages: split_csv(self.languages.as_deref()),
            skills: split_csv(self.skills.as_deref()),
            licenses: split_csv(self.licenses.as_deref()),
            min_rating: parse_number(self.min_rating.as_deref(), "min_rating")?
                .map(|rating| rating as f32),
            min_verification,
        })
    }

    pub fn pay_sort(&self) -> Result<Option<PaySort>, String> {
        match blank_to_none(self.sort.as_deref()) {
            Some(raw) => PaySort::parse(raw)
                .map(Some)
                .ok_or_else(|| format!("unknown sort order '{raw}'")),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingPage<'a, L> {
    pub total: usize,
    pub items: Vec<&'a L>,
}

/// Router builder exposing the find-work and hire-workers boards.
pub fn listing_router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/api/v1/jobs", get(jobs_handler))
        .route("/api/v1/workers", get(workers_handler))
        .with_state(catalog)
}

pub(crate) async fn jobs_handler(
    State(catalog): State<Arc<Catalog>>,
    Query(query): Query<ListingQuery>,
) -> Response {
    respond(&catalog.jobs, &query)
}

pub(crate) async fn workers_handler(
    State(catalog): State<Arc<Catalog>>,
    Query(query): Query<ListingQuery>,
) -> Response {
    respond(&catalog.workers, &query)
}

fn respond<L: Listing + Serialize>(items: &[L], query: &ListingQuery) -> Response {
    let (criteria, order) = match query.criteria().and_then(|c| Ok((c, query.pay_sort()?))) {
        Ok(parsed) => parsed,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
        }
    };

    let mut matches = filter_listings(items, &criteria);
    if let Some(order) = order {
        sort_by_pay(&mut matches, order);
    }

    let page = ListingPage {
        total: matches.len(),
        items: matches,
    };
    (StatusCode::OK, Json(page)).into_response()
}

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_number(value: Option<&str>, field: &str) -> Result<Option<f64>, String> {
    match blank_to_none(value) {
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .map(Some)
            .ok_or_else(|| format!("{field} must be a number")),
        None => Ok(None),
    }
}

fn split_csv(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}
