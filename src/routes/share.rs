use crate::auth::CurrentUser;
use crate::config::ShareConfig;
use crate::database::postgres_repository::PostgresRepository;
use crate::database::share_link::ShareLinkRepository;
use crate::error::app_error::AppError;
use crate::middleware::rate_limit::RateLimit;
use crate::models::share_link::{ShareLinkRequest, ShareLinkResponse};
use crate::service::share::ShareService;
use crate::service::storage::SignedUrlService;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, delete, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Create (or return the existing) share link for a scope
///
/// Issuing is idempotent per `(baby, month?)`: asking again for the same
/// scope returns the same link instead of rotating the token.
#[openapi(tag = "Share Links")]
#[post("/", data = "<payload>")]
pub async fn create_share_link(
    pool: &State<PgPool>,
    signer: &State<SignedUrlService>,
    share_config: &State<ShareConfig>,
    _rate_limit: RateLimit,
    current_user: CurrentUser,
    payload: Json<ShareLinkRequest>,
) -> Result<Json<ShareLinkResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let service = ShareService::new(&repo, signer, &share_config.viewer_origin);
    let link = service.issue_link(&current_user.id, &payload).await?;
    let share_url = service.share_url(&link);
    Ok(Json(ShareLinkResponse::from_link(&link, share_url)))
}

/// List the current user's share links
#[openapi(tag = "Share Links")]
#[get("/")]
pub async fn list_share_links(
    pool: &State<PgPool>,
    signer: &State<SignedUrlService>,
    share_config: &State<ShareConfig>,
    _rate_limit: RateLimit,
    current_user: CurrentUser,
) -> Result<Json<Vec<ShareLinkResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let service = ShareService::new(&repo, signer, &share_config.viewer_origin);
    let links = repo.list_share_links(&current_user.id).await?;
    Ok(Json(
        links
            .iter()
            .map(|link| ShareLinkResponse::from_link(link, service.share_url(link)))
            .collect(),
    ))
}

/// Revoke a share link
#[openapi(tag = "Share Links")]
#[delete("/<id>")]
pub async fn delete_share_link(pool: &State<PgPool>, _rate_limit: RateLimit, current_user: CurrentUser, id: &str) -> Result<Status, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let uuid = Uuid::parse_str(id)?;
    repo.delete_share_link(&uuid, &current_user.id).await?;
    Ok(Status::NoContent)
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![create_share_link, list_share_links, delete_share_link]
}
