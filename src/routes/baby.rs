use crate::auth::CurrentUser;
use crate::database::baby::BabyRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::middleware::rate_limit::RateLimit;
use crate::models::baby::{BabyRequest, BabyResponse};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post, put};
use rocket_okapi::openapi;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Register a baby profile
#[openapi(tag = "Babies")]
#[post("/", data = "<payload>")]
pub async fn create_baby(
    pool: &State<PgPool>,
    _rate_limit: RateLimit,
    current_user: CurrentUser,
    payload: Json<BabyRequest>,
) -> Result<Json<BabyResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let baby = repo.create_baby(&payload, &current_user.id).await?;
    Ok(Json(BabyResponse::from(&baby)))
}

/// List the current user's babies
#[openapi(tag = "Babies")]
#[get("/")]
pub async fn list_babies(pool: &State<PgPool>, _rate_limit: RateLimit, current_user: CurrentUser) -> Result<Json<Vec<BabyResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let babies = repo.list_babies(&current_user.id).await?;
    Ok(Json(babies.iter().map(BabyResponse::from).collect()))
}

/// Fetch one baby profile
#[openapi(tag = "Babies")]
#[get("/<id>")]
pub async fn get_baby(pool: &State<PgPool>, _rate_limit: RateLimit, current_user: CurrentUser, id: &str) -> Result<Json<BabyResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id)?;
    if let Some(baby) = repo.get_baby_by_id(&uuid, &current_user.id).await? {
        Ok(Json(BabyResponse::from(&baby)))
    } else {
        Err(AppError::NotFound("Baby not found".to_string()))
    }
}

/// Update a baby profile
#[openapi(tag = "Babies")]
#[put("/<id>", data = "<payload>")]
pub async fn put_baby(
    pool: &State<PgPool>,
    _rate_limit: RateLimit,
    current_user: CurrentUser,
    id: &str,
    payload: Json<BabyRequest>,
) -> Result<Json<BabyResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id)?;
    let baby = repo.update_baby(&uuid, &payload, &current_user.id).await?;
    Ok(Json(BabyResponse::from(&baby)))
}

/// Delete a baby profile and everything attached to it
#[openapi(tag = "Babies")]
#[delete("/<id>")]
pub async fn delete_baby(pool: &State<PgPool>, _rate_limit: RateLimit, current_user: CurrentUser, id: &str) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id)?;
    repo.delete_baby(&uuid, &current_user.id).await?;
    Ok(Status::NoContent)
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![create_baby, list_babies, get_baby, put_baby, delete_baby]
}
