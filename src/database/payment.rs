use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::payment::{PaymentTransaction, PaymentTransactionRequest};
use uuid::Uuid;

impl PostgresRepository {
    pub async fn create_payment_transaction(&self, user_id: &Uuid, request: &PaymentTransactionRequest) -> Result<PaymentTransaction, AppError> {
        let tx = sqlx::query_as::<_, PaymentTransaction>(
            r#"
            INSERT INTO payment_transaction (user_id, amount_cents, currency, status, provider_reference)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, amount_cents, currency, status, provider_reference, created_at
            "#,
        )
        .bind(user_id)
        .bind(request.amount_cents)
        .bind(&request.currency)
        .bind(request.status)
        .bind(&request.provider_reference)
        .fetch_one(&self.pool)
        .await?;

        Ok(tx)
    }

    pub async fn list_payment_transactions_for_user(&self, user_id: &Uuid) -> Result<Vec<PaymentTransaction>, AppError> {
        let transactions = sqlx::query_as::<_, PaymentTransaction>(
            r#"
            SELECT id, user_id, amount_cents, currency, status, provider_reference, created_at
            FROM payment_transaction
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Cross-user listing. Callers must hold the AdminUser guard; there is
    /// no row-level scoping on this query by design.
    pub async fn list_all_payment_transactions(&self) -> Result<Vec<PaymentTransaction>, AppError> {
        let transactions = sqlx::query_as::<_, PaymentTransaction>(
            r#"
            SELECT id, user_id, amount_cents, currency, status, provider_reference, created_at
            FROM payment_transaction
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }
}
