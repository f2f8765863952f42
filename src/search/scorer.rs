// src/search/scorer.rs
use crate::types::{Posting, SortOrder};
use chrono::{DateTime, Utc};
use serde::Serialize;

const TITLE_MATCH: u32 = 10;
const TITLE_PREFIX: u32 = 5;
// Whole multi-term query found in the title. Without it "senior developer"
// against "Senior Developer" totals 25 instead of the expected 35.
const TITLE_PHRASE: u32 = 10;
const DESCRIPTION_OCCURRENCE: u32 = 2;
const COMPANY_MATCH: u32 = 5;
const REQUIREMENTS_OCCURRENCE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPosting {
    #[serde(flatten)]
    pub posting: Posting,
    pub relevance_score: u32,
}

/// Lowercased whitespace-separated search terms.
pub fn parse_terms(keywords: &str) -> Vec<String> {
    keywords
        .split_whitespace()
        .map(|term| term.to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Score every posting against `keywords`, relative to the current time.
pub fn score(postings: Vec<Posting>, keywords: &str) -> Vec<ScoredPosting> {
    score_at(postings, keywords, Utc::now())
}

/// Score every posting against `keywords`. Output order matches input order.
pub fn score_at(postings: Vec<Posting>, keywords: &str, now: DateTime<Utc>) -> Vec<ScoredPosting> {
    let terms = parse_terms(keywords);
    let phrase = if terms.len() > 1 {
        Some(terms.join(" "))
    } else {
        None
    };

    postings
        .into_iter()
        .map(|posting| {
            let relevance_score = keyword_score(&posting, &terms, phrase.as_deref())
                + recency_bonus(posting.posted_date, now)
                + salary_bonus(posting.salary());
            ScoredPosting {
                posting,
                relevance_score,
            }
        })
        .collect()
}

fn keyword_score(posting: &Posting, terms: &[String], phrase: Option<&str>) -> u32 {
    let title = posting.title.to_lowercase();
    let description = lowercase_or_empty(&posting.description);
    let company = lowercase_or_empty(&posting.company_name);
    let requirements = lowercase_or_empty(&posting.requirements);

    let mut total = 0;

    if let Some(phrase) = phrase {
        if title.contains(phrase) {
            total += TITLE_PHRASE;
        }
    }

    for term in terms {
        if title.contains(term.as_str()) {
            total += TITLE_MATCH;
            if title.starts_with(term.as_str()) {
                total += TITLE_PREFIX;
            }
        }

        total += DESCRIPTION_OCCURRENCE * occurrences(&description, term);

        if company.contains(term.as_str()) {
            total += COMPANY_MATCH;
        }

        total += REQUIREMENTS_OCCURRENCE * occurrences(&requirements, term);
    }

    total
}

fn lowercase_or_empty(field: &Option<String>) -> String {
    field.as_deref().unwrap_or_default().to_lowercase()
}

fn occurrences(haystack: &str, term: &str) -> u32 {
    haystack.matches(term).count() as u32
}

fn recency_bonus(posted_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    let Some(posted) = posted_date else {
        return 0;
    };

    let age_days = (now - posted).num_days().max(0);
    match age_days {
        0..=7 => 3,
        8..=30 => 1,
        _ => 0,
    }
}

fn salary_bonus(salary: Option<i64>) -> u32 {
    match salary {
        Some(s) if s >= 100_000 => 2,
        Some(s) if s >= 50_000 => 1,
        _ => 0,
    }
}

/// Descending by score; ties keep their input order.
pub fn sort_by_relevance(scored: &mut [ScoredPosting]) {
    scored.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
}

/// Apply the requested ordering. Every ordering is stable.
pub fn sort_postings(scored: &mut [ScoredPosting], order: SortOrder) {
    match order {
        SortOrder::Relevance => sort_by_relevance(scored),
        SortOrder::Newest => {
            scored.sort_by(|a, b| b.posting.posted_date.cmp(&a.posting.posted_date))
        }
        SortOrder::SalaryHigh => scored.sort_by(|a, b| b.posting.salary().cmp(&a.posting.salary())),
        // Postings without a salary go last when sorting cheapest first.
        SortOrder::SalaryLow => scored.sort_by_key(|s| match s.posting.salary() {
            Some(salary) => (0, salary),
            None => (1, 0),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn posting(id: i64, title: &str) -> Posting {
        Posting {
            id,
            company_id: 1,
            company_name: None,
            title: title.to_string(),
            description: None,
            requirements: None,
            benefits: None,
            location: None,
            salary_min: None,
            salary_max: None,
            job_type_id: None,
            job_type_name: None,
            category_id: None,
            category_name: None,
            is_active: true,
            posted_date: None,
            closing_date: None,
            views: 0,
        }
    }

    fn only_score(p: Posting, keywords: &str, now: DateTime<Utc>) -> u32 {
        score_at(vec![p], keywords, now)[0].relevance_score
    }

    #[test]
    fn test_parse_terms() {
        assert_eq!(parse_terms("  Senior   RUST\tdev "), vec!["senior", "rust", "dev"]);
        assert!(parse_terms("   ").is_empty());
    }

    #[test]
    fn test_senior_developer_title_scores_35() {
        let now = Utc::now();
        let p = posting(1, "Senior Developer");
        assert_eq!(only_score(p, "senior developer", now), 35);
    }

    #[test]
    fn test_single_term_has_no_phrase_bonus() {
        let now = Utc::now();
        assert_eq!(only_score(posting(1, "Developer"), "developer", now), 15);
        assert_eq!(only_score(posting(1, "Lead Developer"), "developer", now), 10);
    }

    #[test]
    fn test_description_and_requirements_count_occurrences() {
        let now = Utc::now();
        let mut p = posting(1, "Engineer");
        p.description = Some("Rust services. We love Rust. RUST!".to_string());
        p.requirements = Some("rust, rust".to_string());
        // 3 description hits * 2 + 2 requirement hits * 1
        assert_eq!(only_score(p, "rust", now), 8);
    }

    #[test]
    fn test_company_name_match() {
        let now = Utc::now();
        let mut p = posting(1, "Engineer");
        p.company_name = Some("Acme Robotics".to_string());
        assert_eq!(only_score(p, "acme", now), 5);
    }

    #[test]
    fn test_recency_bonus() {
        let now = Utc::now();

        let mut fresh = posting(1, "Cook");
        fresh.posted_date = Some(now - Duration::days(3));
        assert_eq!(only_score(fresh, "", now), 3);

        let mut month = posting(2, "Cook");
        month.posted_date = Some(now - Duration::days(20));
        assert_eq!(only_score(month, "", now), 1);

        let mut stale = posting(3, "Cook");
        stale.posted_date = Some(now - Duration::days(40));
        assert_eq!(only_score(stale, "", now), 0);

        assert_eq!(only_score(posting(4, "Cook"), "", now), 0);
    }

    #[test]
    fn test_recency_boundaries() {
        let now = Utc::now();
        let aged = |days: i64| {
            let mut p = posting(1, "Cook");
            p.posted_date = Some(now - Duration::days(days));
            only_score(p, "", now)
        };

        assert_eq!(aged(0), 3);
        assert_eq!(aged(7), 3);
        assert_eq!(aged(8), 1);
        assert_eq!(aged(30), 1);
        assert_eq!(aged(31), 0);
        // Posted in the future counts as posted today.
        assert_eq!(aged(-5), 3);
    }

    #[test]
    fn test_salary_bonus_prefers_upper_bound() {
        let now = Utc::now();

        let mut high = posting(1, "Cook");
        high.salary_min = Some(40_000);
        high.salary_max = Some(120_000);
        assert_eq!(only_score(high, "", now), 2);

        let mut mid = posting(2, "Cook");
        mid.salary_min = Some(60_000);
        assert_eq!(only_score(mid, "", now), 1);

        let mut low = posting(3, "Cook");
        low.salary_max = Some(49_999);
        assert_eq!(only_score(low, "", now), 0);
    }

    #[test]
    fn test_scores_are_independent_of_input_order() {
        let now = Utc::now();
        let mut a = posting(1, "Rust Developer");
        a.description = Some("backend rust".to_string());
        let b = posting(2, "Frontend Developer");
        let mut c = posting(3, "Data Engineer");
        c.company_name = Some("Rusty Data".to_string());

        let forward = score_at(vec![a.clone(), b.clone(), c.clone()], "rust developer", now);
        let reversed = score_at(vec![c, b, a], "rust developer", now);

        for item in &forward {
            let twin = reversed
                .iter()
                .find(|r| r.posting.id == item.posting.id)
                .unwrap();
            assert_eq!(item.relevance_score, twin.relevance_score);
        }
    }

    #[test]
    fn test_relevance_sort_is_stable() {
        let now = Utc::now();
        let postings = vec![
            posting(1, "Rust Engineer"),
            posting(2, "Go Engineer"),
            posting(3, "Rust Engineer"),
            posting(4, "Java Engineer"),
        ];

        let mut scored = score_at(postings, "rust", now);
        sort_by_relevance(&mut scored);

        let ids: Vec<i64> = scored.iter().map(|s| s.posting.id).collect();
        assert_eq!(ids, vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_salary_low_puts_missing_salaries_last() {
        let now = Utc::now();
        let mut a = posting(1, "A");
        a.salary_max = Some(90_000);
        let b = posting(2, "B");
        let mut c = posting(3, "C");
        c.salary_min = Some(30_000);

        let mut scored = score_at(vec![a, b, c], "", now);
        sort_postings(&mut scored, SortOrder::SalaryLow);

        let ids: Vec<i64> = scored.iter().map(|s| s.posting.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
