use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, Default, JsonSchema, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub provider_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct PaymentTransactionRequest {
    #[validate(range(min = 1))]
    pub amount_cents: i64,
    #[validate(length(min = 3, max = 3))]
    pub currency: String,
    pub status: PaymentStatus,
    pub provider_reference: Option<String>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct PaymentTransactionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub provider_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&PaymentTransaction> for PaymentTransactionResponse {
    fn from(tx: &PaymentTransaction) -> Self {
        Self {
            id: tx.id,
            user_id: tx.user_id,
            amount_cents: tx.amount_cents,
            currency: tx.currency.clone(),
            status: tx.status,
            provider_reference: tx.provider_reference.clone(),
            created_at: tx.created_at,
        }
    }
}
