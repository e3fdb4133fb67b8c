use crate::auth::{AdminUser, CurrentUser};
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::middleware::rate_limit::RateLimit;
use crate::models::payment::{PaymentTransactionRequest, PaymentTransactionResponse};
use rocket::serde::json::Json;
use rocket::{State, get, post};
use rocket_okapi::openapi;
use sqlx::PgPool;
use validator::Validate;

/// Record a payment transaction for the current user
#[openapi(tag = "Payments")]
#[post("/", data = "<payload>")]
pub async fn create_payment(
    pool: &State<PgPool>,
    _rate_limit: RateLimit,
    current_user: CurrentUser,
    payload: Json<PaymentTransactionRequest>,
) -> Result<Json<PaymentTransactionResponse>, AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let tx = repo.create_payment_transaction(&current_user.id, &payload).await?;
    Ok(Json(PaymentTransactionResponse::from(&tx)))
}

/// The current user's payment history
#[openapi(tag = "Payments")]
#[get("/mine")]
pub async fn list_my_payments(
    pool: &State<PgPool>,
    _rate_limit: RateLimit,
    current_user: CurrentUser,
) -> Result<Json<Vec<PaymentTransactionResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let transactions = repo.list_payment_transactions_for_user(&current_user.id).await?;
    Ok(Json(transactions.iter().map(PaymentTransactionResponse::from).collect()))
}

/// All payment transactions, admin only
#[openapi(tag = "Payments")]
#[get("/")]
pub async fn list_all_payments(pool: &State<PgPool>, _rate_limit: RateLimit, _admin: AdminUser) -> Result<Json<Vec<PaymentTransactionResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let transactions = repo.list_all_payment_transactions().await?;
    Ok(Json(transactions.iter().map(PaymentTransactionResponse::from).collect()))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![create_payment, list_my_payments, list_all_payments]
}
