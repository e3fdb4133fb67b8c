//! Public share-link resolution. No authentication: the token is the
//! whole credential, and every failure mode answers 404.

use crate::config::ShareConfig;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::middleware::rate_limit::RateLimit;
use crate::models::share_link::SharedViewResponse;
use crate::service::share::{SharePathScope, ShareService};
use crate::service::storage::SignedUrlService;
use rocket::serde::json::Json;
use rocket::{State, get};
use rocket_okapi::openapi;
use sqlx::PgPool;

/// Resolve a whole-baby share token into its public view
#[openapi(tag = "Shared")]
#[get("/baby/<token>")]
pub async fn get_shared_baby(
    pool: &State<PgPool>,
    signer: &State<SignedUrlService>,
    share_config: &State<ShareConfig>,
    _rate_limit: RateLimit,
    token: &str,
) -> Result<Json<SharedViewResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let service = ShareService::new(&repo, signer, &share_config.viewer_origin);
    Ok(Json(service.resolve(token, SharePathScope::Baby).await?))
}

/// Resolve a single-month share token into its public view
#[openapi(tag = "Shared")]
#[get("/month/<token>")]
pub async fn get_shared_month(
    pool: &State<PgPool>,
    signer: &State<SignedUrlService>,
    share_config: &State<ShareConfig>,
    _rate_limit: RateLimit,
    token: &str,
) -> Result<Json<SharedViewResponse>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let service = ShareService::new(&repo, signer, &share_config.viewer_origin);
    Ok(Json(service.resolve(token, SharePathScope::Month).await?))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![get_shared_baby, get_shared_month]
}
