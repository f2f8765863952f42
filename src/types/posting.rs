// src/types/posting.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A job posting joined with its company, category and job type names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Posting {
    pub id: i64,
    pub company_id: i64,
    pub company_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub benefits: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub job_type_id: Option<i64>,
    pub job_type_name: Option<String>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub is_active: bool,
    pub posted_date: Option<DateTime<Utc>>,
    pub closing_date: Option<DateTime<Utc>>,
    pub views: i64,
}

impl Posting {
    /// Salary figure used for ranking: the upper bound if set, else the lower.
    pub fn salary(&self) -> Option<i64> {
        self.salary_max.or(self.salary_min)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Relevance,
    Newest,
    SalaryHigh,
    SalaryLow,
}

impl SortOrder {
    /// Unknown values fall back to the default for the query.
    pub fn parse(value: Option<&str>, has_keywords: bool) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("relevance") => SortOrder::Relevance,
            Some("newest") | Some("date") => SortOrder::Newest,
            Some("salary_high") | Some("salary_desc") => SortOrder::SalaryHigh,
            Some("salary_low") | Some("salary_asc") => SortOrder::SalaryLow,
            _ if has_keywords => SortOrder::Relevance,
            _ => SortOrder::Newest,
        }
    }
}

/// Search filters. Ids and the salary floor are applied in SQL; `terms` and
/// `location` go through [`PostingFilter::matches_text`].
#[derive(Debug, Clone, Default)]
pub struct PostingFilter {
    pub terms: Vec<String>,
    pub category_id: Option<i64>,
    pub job_type_id: Option<i64>,
    pub location: Option<String>,
    pub min_salary: Option<i64>,
}

impl PostingFilter {
    /// True when the location (if any) is a substring of the posting's
    /// location and at least one term appears in the title, description,
    /// requirements or company name. Comparison is case-insensitive.
    pub fn matches_text(&self, posting: &Posting) -> bool {
        if let Some(location) = &self.location {
            let wanted = location.trim().to_lowercase();
            let actual = posting.location.as_deref().unwrap_or_default().to_lowercase();
            if !actual.contains(&wanted) {
                return false;
            }
        }

        if self.terms.is_empty() {
            return true;
        }

        let fields: Vec<String> = [
            Some(posting.title.as_str()),
            posting.description.as_deref(),
            posting.requirements.as_deref(),
            posting.company_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::to_lowercase)
        .collect();

        self.terms
            .iter()
            .map(|term| term.to_lowercase())
            .any(|term| fields.iter().any(|field| field.contains(&term)))
    }
}
