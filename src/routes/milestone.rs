use crate::auth::CurrentUser;
use crate::database::milestone::MilestoneRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::middleware::rate_limit::RateLimit;
use crate::models::milestone::{MilestoneRequest, MilestoneResponse};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Record a milestone for a baby's month
#[openapi(tag = "Milestones")]
#[post("/", data = "<payload>")]
pub async fn create_milestone(
    pool: &State<PgPool>,
    _rate_limit: RateLimit,
    current_user: CurrentUser,
    payload: Json<MilestoneRequest>,
) -> Result<Json<MilestoneResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let milestone = repo.create_milestone(&payload, &current_user.id).await?;
    Ok(Json(MilestoneResponse::from(&milestone)))
}

/// List a baby's milestones, newest first
#[openapi(tag = "Milestones")]
#[get("/?<baby_id>&<month>")]
pub async fn list_milestones(
    pool: &State<PgPool>,
    _rate_limit: RateLimit,
    current_user: CurrentUser,
    baby_id: &str,
    month: Option<i32>,
) -> Result<Json<Vec<MilestoneResponse>>, AppError> {
    let baby_uuid = Uuid::parse_str(baby_id)?;
    if let Some(month) = month
        && !(1..=12).contains(&month)
    {
        return Err(AppError::BadRequest("month must be between 1 and 12".to_string()));
    }

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let milestones = repo.list_milestones(&baby_uuid, &current_user.id, month).await?;
    Ok(Json(milestones.iter().map(MilestoneResponse::from).collect()))
}

/// Delete a milestone
#[openapi(tag = "Milestones")]
#[delete("/<id>")]
pub async fn delete_milestone(pool: &State<PgPool>, _rate_limit: RateLimit, current_user: CurrentUser, id: &str) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id)?;
    repo.delete_milestone(&uuid, &current_user.id).await?;
    Ok(Status::NoContent)
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![create_milestone, list_milestones, delete_milestone]
}
