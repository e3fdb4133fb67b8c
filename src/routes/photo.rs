use crate::auth::CurrentUser;
use crate::database::photo::PhotoRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::middleware::rate_limit::RateLimit;
use crate::models::pagination::{PaginatedResponse, PaginationParams};
use crate::models::photo::{PhotoRequest, PhotoResponse};
use crate::service::storage::{ImageVariant, SignedUrlService};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

/// Record an uploaded photo or video for a baby's month
#[openapi(tag = "Photos")]
#[post("/", data = "<payload>")]
pub async fn create_photo(
    pool: &State<PgPool>,
    signer: &State<SignedUrlService>,
    _rate_limit: RateLimit,
    current_user: CurrentUser,
    payload: Json<PhotoRequest>,
) -> Result<Json<PhotoResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let photo = repo.create_photo(&payload, &current_user.id).await?;
    let url = signed_url_or_none(signer, &photo, None);
    Ok(Json(PhotoResponse::from_photo(&photo, url)))
}

/// List a baby's photos, newest first, with signed URLs
#[openapi(tag = "Photos")]
#[get("/?<baby_id>&<month>&<page>&<limit>&<variant>")]
pub async fn list_photos(
    pool: &State<PgPool>,
    signer: &State<SignedUrlService>,
    _rate_limit: RateLimit,
    current_user: CurrentUser,
    baby_id: &str,
    month: Option<i32>,
    page: Option<i64>,
    limit: Option<i64>,
    variant: Option<&str>,
) -> Result<Json<PaginatedResponse<PhotoResponse>>, AppError> {
    let baby_uuid = Uuid::parse_str(baby_id)?;
    let variant = parse_variant(variant)?;
    if let Some(month) = month
        && !(1..=12).contains(&month)
    {
        return Err(AppError::BadRequest("month must be between 1 and 12".to_string()));
    }

    let params = PaginationParams::from_query(page, limit)?;
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let (photos, total) = repo.list_photos(&baby_uuid, &current_user.id, month, Some(&params)).await?;

    let responses: Vec<PhotoResponse> = photos
        .iter()
        .map(|photo| PhotoResponse::from_photo(photo, signed_url_or_none(signer, photo, variant)))
        .collect();

    let page = params.page.unwrap_or(1);
    let limit = params.effective_limit().unwrap_or(total.max(1));
    Ok(Json(PaginatedResponse::new(responses, page, limit, total)))
}

/// Fetch one photo with a signed URL
#[openapi(tag = "Photos")]
#[get("/<id>?<variant>")]
pub async fn get_photo(
    pool: &State<PgPool>,
    signer: &State<SignedUrlService>,
    _rate_limit: RateLimit,
    current_user: CurrentUser,
    id: &str,
    variant: Option<&str>,
) -> Result<Json<PhotoResponse>, AppError> {
    let uuid = Uuid::parse_str(id)?;
    let variant = parse_variant(variant)?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    if let Some(photo) = repo.get_photo_by_id(&uuid, &current_user.id).await? {
        let url = signed_url_or_none(signer, &photo, variant);
        Ok(Json(PhotoResponse::from_photo(&photo, url)))
    } else {
        Err(AppError::NotFound("Photo not found".to_string()))
    }
}

/// Delete a photo record
#[openapi(tag = "Photos")]
#[delete("/<id>")]
pub async fn delete_photo(pool: &State<PgPool>, _rate_limit: RateLimit, current_user: CurrentUser, id: &str) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id)?;
    repo.delete_photo(&uuid, &current_user.id).await?;
    Ok(Status::NoContent)
}

fn parse_variant(variant: Option<&str>) -> Result<Option<ImageVariant>, AppError> {
    match variant {
        None => Ok(None),
        Some(name) => ImageVariant::from_name(name)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown image variant: {}", name))),
    }
}

/// Signing failures degrade the one asset to `url: null` instead of
/// failing the whole listing.
fn signed_url_or_none(signer: &SignedUrlService, photo: &crate::models::photo::Photo, variant: Option<ImageVariant>) -> Option<String> {
    let variant = if photo.is_video { None } else { variant };
    match signer.sign_path(&photo.storage_path, None, variant) {
        Ok(url) => Some(url),
        Err(error) => {
            warn!(photo_id = %photo.id, %error, "failed to sign photo url, serving without one");
            None
        }
    }
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![create_photo, list_photos, get_photo, delete_photo]
}
