// src/web/handlers/job_handlers.rs
use crate::auth::{AuthError, AuthenticatedAccount, OptionalAuth};
use crate::database::{Database, PostingRepository};
use crate::search::{self, DEFAULT_RECOMMENDATION_LIMIT};
use crate::types::{Posting, PostingFilter, Profile, Role, SortOrder};
use crate::web::types::{api_error, ApiError, DataResponse, RecommendationData, SearchData, SearchQuery};
use chrono::Utc;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;
const MAX_RECOMMENDATIONS: usize = 50;

fn database_error(context: &str, e: anyhow::Error) -> ApiError {
    error!("{}: {:#}", context, e);
    api_error(
        Status::InternalServerError,
        context,
        "DATABASE_ERROR",
        &["Try again in a few moments", "Contact support if the problem persists"],
    )
}

pub async fn search_jobs_handler(
    query: SearchQuery,
    auth: OptionalAuth,
    db: &State<Database>,
) -> Result<Json<DataResponse<SearchData>>, ApiError> {
    let keywords = query.keywords.unwrap_or_default();
    let terms = search::parse_terms(&keywords);
    let sort = SortOrder::parse(query.sort.as_deref(), !terms.is_empty());
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let filter = PostingFilter {
        terms,
        category_id: query.category,
        job_type_id: query.job_type,
        location: query.location.filter(|l| !l.trim().is_empty()),
        min_salary: query.min_salary,
    };

    let now = Utc::now();
    let candidates = PostingRepository::new(db.pool())
        .search_candidates(&filter, now)
        .await
        .map_err(|e| database_error("Failed to search jobs", e))?;

    let mut scored = search::score_at(candidates, &keywords, now);
    search::sort_postings(&mut scored, sort);

    let total = scored.len();
    let results: Vec<_> = scored
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .collect();

    info!(
        "Search '{}' ({:?}) by {}: {} matches",
        keywords,
        sort,
        auth.account
            .as_ref()
            .map(|a| a.username().to_string())
            .unwrap_or_else(|| "anonymous".to_string()),
        total
    );

    Ok(Json(DataResponse::success(
        format!("Found {} jobs", total),
        SearchData {
            keywords,
            sort,
            total,
            page,
            limit,
            results,
        },
    )))
}

pub async fn get_job_handler(
    id: i64,
    auth: OptionalAuth,
    db: &State<Database>,
) -> Result<Json<DataResponse<Posting>>, ApiError> {
    let repo = PostingRepository::new(db.pool());

    let posting = repo
        .find_by_id(id)
        .await
        .map_err(|e| database_error("Failed to load job", e))?
        .ok_or_else(|| {
            api_error(
                Status::NotFound,
                &format!("Job {} not found", id),
                "JOB_NOT_FOUND",
                &["Check the job id", "Search for jobs to find open postings"],
            )
        })?;

    if let Err(e) = repo.record_view(id).await {
        error!("Failed to record view for job {}: {:#}", id, e);
    }

    match &auth.account {
        Some(account) => info!("Job {} viewed by account {}", id, account.account_id()),
        None => info!("Job {} viewed anonymously", id),
    }

    Ok(Json(DataResponse::success(posting.title.clone(), posting)))
}

pub async fn recommendations_handler(
    limit: Option<usize>,
    auth: AuthenticatedAccount,
    db: &State<Database>,
) -> Result<Json<DataResponse<RecommendationData>>, ApiError> {
    if auth.role() != Role::JobSeeker {
        return Err(api_error(
            Status::Forbidden,
            AuthError::Forbidden.message(),
            "FORBIDDEN",
            &["Recommendations are available to job seekers"],
        ));
    }

    let limit = limit
        .unwrap_or(DEFAULT_RECOMMENDATION_LIMIT)
        .clamp(1, MAX_RECOMMENDATIONS);
    let fetch = limit as i64;

    // The token's profile snapshot is trusted as of login.
    let preferred_category_id = match auth.profile() {
        Some(Profile::JobSeeker(profile)) => profile.preferred_category_id,
        _ => None,
    };

    let repo = PostingRepository::new(db.pool());
    let now = Utc::now();

    let (preferred, related) = match preferred_category_id {
        Some(category_id) => (
            repo.newest_in_category(category_id, now, fetch)
                .await
                .map_err(|e| database_error("Failed to load recommendations", e))?,
            repo.newest_in_related_categories(category_id, now, fetch)
                .await
                .map_err(|e| database_error("Failed to load recommendations", e))?,
        ),
        None => (Vec::new(), Vec::new()),
    };

    let popular = repo
        .popular(now, fetch)
        .await
        .map_err(|e| database_error("Failed to load recommendations", e))?;

    let results = search::blend_recommendations(preferred, related, popular, limit);

    Ok(Json(DataResponse::success(
        format!("{} recommended jobs", results.len()),
        RecommendationData {
            preferred_category_id,
            results,
        },
    )))
}
