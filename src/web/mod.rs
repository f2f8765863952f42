// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::auth::{AuthenticatedAccount, Authenticator, OptionalAuth, TokenService};
use crate::config::AppConfig;
use crate::database::{Database, SqliteAccountStore};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::figment::Figment;
use rocket::http::{CookieJar, Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

#[post("/auth/login", data = "<request>")]
pub async fn login(
    request: Json<LoginRequest>,
    authenticator: &State<Authenticator>,
    cookies: &CookieJar<'_>,
) -> Result<Json<DataResponse<LoginData>>, ApiError> {
    handlers::login_handler(request, authenticator, cookies).await
}

#[post("/auth/logout")]
pub async fn logout(cookies: &CookieJar<'_>) -> Json<ActionResponse> {
    handlers::logout_handler(cookies).await
}

#[get("/auth/me")]
pub async fn current_session(auth: AuthenticatedAccount) -> Json<DataResponse<SessionInfo>> {
    handlers::current_session_handler(auth).await
}

#[get("/jobs/search?<query..>")]
pub async fn search_jobs(
    query: SearchQuery,
    auth: OptionalAuth,
    db: &State<Database>,
) -> Result<Json<DataResponse<SearchData>>, ApiError> {
    handlers::search_jobs_handler(query, auth, db).await
}

#[get("/jobs/recommendations?<limit>")]
pub async fn recommendations(
    limit: Option<usize>,
    auth: AuthenticatedAccount,
    db: &State<Database>,
) -> Result<Json<DataResponse<RecommendationData>>, ApiError> {
    handlers::recommendations_handler(limit, auth, db).await
}

#[get("/jobs/<id>")]
pub async fn get_job(
    id: i64,
    auth: OptionalAuth,
    db: &State<Database>,
) -> Result<Json<DataResponse<crate::types::Posting>>, ApiError> {
    handlers::get_job_handler(id, auth, db).await
}

#[get("/health")]
pub async fn health(auth: OptionalAuth, db: &State<Database>) -> Result<Json<TextResponse>, ApiError> {
    handlers::health_handler(auth, db).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(401)]
pub fn unauthorized() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Authentication required".to_string(),
        "UNAUTHORIZED".to_string(),
        vec![
            "Send a valid token in the Authorization header".to_string(),
            "Log in again if your session has expired".to_string(),
        ],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the request path".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body is missing required fields".to_string(),
        "UNPROCESSABLE_ENTITY".to_string(),
        vec!["Verify all required fields are present".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Assemble the application on top of `figment` with the given state.
pub fn build_rocket(figment: Figment, db: Database, tokens: TokenService) -> Rocket<Build> {
    let store = Arc::new(SqliteAccountStore::new(db.pool().clone()));
    let authenticator = Authenticator::new(store, tokens.clone());

    rocket::custom(figment)
        .attach(Cors)
        .manage(db)
        .manage(authenticator)
        .manage(tokens)
        .register(
            "/api",
            catchers![bad_request, unauthorized, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                login,
                logout,
                current_session,
                search_jobs,
                recommendations,
                get_job,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: AppConfig) -> Result<()> {
    let db = Database::new(&config.database_path).await?;
    let tokens = TokenService::new(&config.jwt_secret, config.token_ttl_days);

    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", config.port));

    info!("Starting job board API server");
    info!("Environment: {}", config.environment);
    info!("Database: {}", config.database_path.display());
    info!("Server: http://0.0.0.0:{}", config.port);

    if let Err(e) = build_rocket(figment, db, tokens).launch().await {
        anyhow::bail!("Server failed: {}", e);
    }

    Ok(())
}
