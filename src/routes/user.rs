use crate::auth::{CurrentUser, parse_user_cookie_value};
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::middleware::rate_limit::{AuthRateLimit, RateLimit};
use crate::models::user::{CreateUserRequest, LoginRequest, UserResponse};
use chrono::{Duration, Utc};
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::serde::json::Json;
use rocket::{State, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;
use validator::Validate;
use zxcvbn::{Score, zxcvbn};

const SESSION_TTL_DAYS: i64 = 30;

/// Register a new account
#[openapi(tag = "Users")]
#[post("/", data = "<payload>")]
pub async fn post_user(
    pool: &State<PgPool>,
    _rate_limit: AuthRateLimit,
    payload: Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let estimate = zxcvbn(&payload.password, &[payload.name.as_str(), payload.email.as_str()]);
    if estimate.score() < Score::Three {
        return Err(AppError::BadRequest("Password is too weak".to_string()));
    }

    let repo = PostgresRepository { pool: pool.inner().clone() };
    if repo.get_user_by_email(&payload.email).await?.is_some() {
        return Err(AppError::UserAlreadyExists(payload.email.clone()));
    }

    let user = repo.create_user(&payload.name, &payload.email, &payload.password).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Log in and receive the session cookie
#[openapi(tag = "Users")]
#[post("/login", data = "<payload>")]
pub async fn post_user_login(
    pool: &State<PgPool>,
    _rate_limit: AuthRateLimit,
    cookies: &CookieJar<'_>,
    payload: Json<LoginRequest>,
) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };

    let Some(user) = repo.get_user_by_email(&payload.email).await? else {
        // Burn the same Argon2 work as a real verification so response
        // timing does not reveal whether the account exists.
        PostgresRepository::dummy_verify(&payload.password);
        return Err(AppError::InvalidCredentials);
    };

    repo.verify_password(&user, &payload.password).await?;

    let session = repo.create_session(&user.id, Utc::now() + Duration::days(SESSION_TTL_DAYS)).await?;
    let value = format!("{}:{}", session.id, user.id);
    cookies.add_private(Cookie::build(("user", value)).path("/").http_only(true).same_site(SameSite::Lax).build());

    Ok(Status::Ok)
}

/// Log out and invalidate the session
#[openapi(tag = "Users")]
#[post("/logout")]
pub async fn post_user_logout(pool: &State<PgPool>, _rate_limit: RateLimit, cookies: &CookieJar<'_>) -> Result<Status, AppError> {
    if let Some(cookie) = cookies.get_private("user")
        && let Some((session_id, _)) = parse_user_cookie_value(cookie.value())
    {
        let repo = PostgresRepository { pool: pool.inner().clone() };
        repo.delete_session(&session_id).await?;
    }

    cookies.remove_private(Cookie::build("user").build());
    Ok(Status::Ok)
}

/// The currently authenticated user
#[openapi(tag = "Users")]
#[get("/me")]
pub async fn get_me(pool: &State<PgPool>, _rate_limit: RateLimit, current_user: CurrentUser) -> Result<Json<UserResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let user = repo.get_user_by_id(&current_user.id).await?.ok_or(AppError::UserNotFound)?;
    Ok(Json(UserResponse::from(&user)))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![post_user, post_user_login, post_user_logout, get_me]
}
