// src/web/handlers/auth_handlers.rs
use crate::auth::{AuthenticatedAccount, Authenticator, LoginError, LoginOutcome, LEGACY_TOKEN_COOKIE};
use crate::web::types::{
    api_error, ActionResponse, ApiError, DataResponse, LoginData, LoginRequest, SessionInfo,
};
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

const VERIFY_REDIRECT: &str = "/verify";

pub async fn login_handler(
    request: Json<LoginRequest>,
    authenticator: &State<Authenticator>,
    cookies: &CookieJar<'_>,
) -> Result<Json<DataResponse<LoginData>>, ApiError> {
    let request = request.into_inner();

    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(api_error(
            Status::BadRequest,
            "Username and password are required",
            "MISSING_CREDENTIALS",
            &["Provide a username or email and a password"],
        ));
    }

    let outcome = authenticator
        .authenticate(request.username.trim(), &request.password, &request.user_type)
        .await
        .map_err(login_error_response)?;

    match outcome {
        LoginOutcome::Authenticated {
            token,
            redirect,
            claims,
        } => {
            // Legacy clients read the token from this cookie.
            cookies.add(
                Cookie::build((LEGACY_TOKEN_COOKIE, token.clone()))
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .path("/")
                    .max_age(rocket::time::Duration::seconds(claims.exp - claims.iat)),
            );

            Ok(Json(DataResponse::success(
                format!("Welcome back, {}", claims.username),
                LoginData::Authenticated {
                    token,
                    redirect: redirect.to_string(),
                    user_type: claims.user_type,
                    profile: claims.profile,
                },
            )))
        }
        LoginOutcome::VerificationRequired { email } => Ok(Json(DataResponse::success(
            "Please verify your account before logging in".to_string(),
            LoginData::VerificationRequired {
                email,
                redirect: VERIFY_REDIRECT.to_string(),
            },
        ))),
    }
}

fn login_error_response(e: LoginError) -> ApiError {
    match e {
        LoginError::InvalidCredentials => api_error(
            Status::Unauthorized,
            &e.to_string(),
            "INVALID_CREDENTIALS",
            &["Check your username or email", "Check your password"],
        ),
        LoginError::InvalidRole(_) => api_error(
            Status::BadRequest,
            &e.to_string(),
            "INVALID_USER_TYPE",
            &["Use 'jobseeker' or 'employee'"],
        ),
        LoginError::RoleMismatch { .. } => api_error(
            Status::Forbidden,
            &e.to_string(),
            "ROLE_MISMATCH",
            &["Select the user type your account was registered with"],
        ),
        LoginError::Internal(ref cause) => {
            error!("Login failed: {:#}", cause);
            api_error(
                Status::InternalServerError,
                "Login failed due to a server error",
                "INTERNAL_ERROR",
                &["Try again in a few moments"],
            )
        }
    }
}

pub async fn logout_handler(cookies: &CookieJar<'_>) -> Json<ActionResponse> {
    cookies.remove(Cookie::build(LEGACY_TOKEN_COOKIE).path("/"));
    Json(ActionResponse::success(
        "Logged out".to_string(),
        "logout".to_string(),
    ))
}

pub async fn current_session_handler(auth: AuthenticatedAccount) -> Json<DataResponse<SessionInfo>> {
    Json(DataResponse::success(
        format!("Authenticated as {}", auth.username()),
        SessionInfo::from(auth.claims),
    ))
}
