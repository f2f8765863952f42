// src/web/types.rs
use crate::auth::Claims;
use crate::search::ScoredPosting;
use crate::types::{Posting, Profile, Role, SortOrder};
use rocket::form::FromForm;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

/// Error half of every JSON handler: a status plus the standard envelope.
pub type ApiError = Custom<Json<StandardErrorResponse>>;

pub fn api_error(status: Status, error: &str, error_code: &str, suggestions: &[&str]) -> ApiError {
    Custom(
        status,
        Json(StandardErrorResponse::new(
            error.to_string(),
            error_code.to_string(),
            suggestions.iter().map(|s| s.to_string()).collect(),
        )),
    )
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Action,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct LoginRequest {
    #[serde(alias = "identifier", alias = "email")]
    pub username: String,
    pub password: String,
    pub user_type: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", tag = "status", rename_all = "snake_case")]
pub enum LoginData {
    Authenticated {
        token: String,
        redirect: String,
        user_type: Role,
        profile: Option<Profile>,
    },
    VerificationRequired {
        email: String,
        redirect: String,
    },
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SessionInfo {
    pub account_id: i64,
    pub username: String,
    pub email: String,
    pub user_type: Role,
    pub role_code: i64,
    pub profile: Option<Profile>,
    pub expires_at: i64,
}

impl From<Claims> for SessionInfo {
    fn from(claims: Claims) -> Self {
        Self {
            account_id: claims.account_id,
            username: claims.username,
            email: claims.email,
            user_type: claims.user_type,
            role_code: claims.role_code,
            profile: claims.profile,
            expires_at: claims.exp,
        }
    }
}

#[derive(Debug, FromForm)]
pub struct SearchQuery {
    pub keywords: Option<String>,
    pub sort: Option<String>,
    pub category: Option<i64>,
    pub job_type: Option<i64>,
    pub location: Option<String>,
    pub min_salary: Option<i64>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SearchData {
    pub keywords: String,
    pub sort: SortOrder,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub results: Vec<ScoredPosting>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct RecommendationData {
    pub preferred_category_id: Option<i64>,
    pub results: Vec<Posting>,
}
