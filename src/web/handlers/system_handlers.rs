// src/web/handlers/system_handlers.rs
use crate::auth::OptionalAuth;
use crate::database::Database;
use crate::web::types::{api_error, ApiError, TextResponse};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn health_handler(auth: OptionalAuth, db: &State<Database>) -> Result<Json<TextResponse>, ApiError> {
    if let Some(account) = auth.account {
        info!("Health check by authenticated user: {}", account.username());
    } else {
        info!("Health check by anonymous user");
    }

    if let Err(e) = db.health_check().await {
        error!("Health check failed: {:#}", e);
        return Err(api_error(
            Status::ServiceUnavailable,
            "Database unavailable",
            "DATABASE_UNAVAILABLE",
            &["Try again in a few moments"],
        ));
    }

    Ok(Json(TextResponse::success("OK".to_string())))
}
