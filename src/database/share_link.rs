use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::share_link::ShareLink;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait ShareLinkRepository {
    /// Exact-scope lookup for the idempotent issuer. A NULL month and a
    /// present month are distinct scopes; expired rows are not returned.
    async fn find_share_link(&self, owner: &Uuid, baby_id: &Uuid, month: Option<i32>) -> Result<Option<ShareLink>, AppError>;
    async fn create_share_link(
        &self,
        owner: &Uuid,
        baby_id: &Uuid,
        month: Option<i32>,
        token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ShareLink, AppError>;
    /// Token lookup for the resolver. Expired links are treated as absent.
    async fn get_share_link_by_token(&self, token: &str) -> Result<Option<ShareLink>, AppError>;
    async fn list_share_links(&self, owner: &Uuid) -> Result<Vec<ShareLink>, AppError>;
    async fn delete_share_link(&self, id: &Uuid, owner: &Uuid) -> Result<(), AppError>;
    async fn delete_expired_share_links(&self) -> Result<u64, AppError>;
}

#[async_trait::async_trait]
impl ShareLinkRepository for PostgresRepository {
    async fn find_share_link(&self, owner: &Uuid, baby_id: &Uuid, month: Option<i32>) -> Result<Option<ShareLink>, AppError> {
        let link = sqlx::query_as::<_, ShareLink>(
            r#"
            SELECT id, owner_user_id, baby_id, month_number, token, created_at, expires_at
            FROM shared_link
            WHERE owner_user_id = $1
              AND baby_id = $2
              AND month_number IS NOT DISTINCT FROM $3
              AND (expires_at IS NULL OR expires_at > now())
            "#,
        )
        .bind(owner)
        .bind(baby_id)
        .bind(month)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }

    async fn create_share_link(
        &self,
        owner: &Uuid,
        baby_id: &Uuid,
        month: Option<i32>,
        token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ShareLink, AppError> {
        // An expired row still occupies the scope's unique index slot;
        // clear it so re-issuing after expiry does not hit the constraint.
        sqlx::query(
            r#"
            DELETE FROM shared_link
            WHERE owner_user_id = $1
              AND baby_id = $2
              AND month_number IS NOT DISTINCT FROM $3
              AND expires_at IS NOT NULL
              AND expires_at <= now()
            "#,
        )
        .bind(owner)
        .bind(baby_id)
        .bind(month)
        .execute(&self.pool)
        .await?;

        let link = sqlx::query_as::<_, ShareLink>(
            r#"
            INSERT INTO shared_link (owner_user_id, baby_id, month_number, token, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_user_id, baby_id, month_number, token, created_at, expires_at
            "#,
        )
        .bind(owner)
        .bind(baby_id)
        .bind(month)
        .bind(token)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(link)
    }

    async fn get_share_link_by_token(&self, token: &str) -> Result<Option<ShareLink>, AppError> {
        let link = sqlx::query_as::<_, ShareLink>(
            r#"
            SELECT id, owner_user_id, baby_id, month_number, token, created_at, expires_at
            FROM shared_link
            WHERE token = $1
              AND (expires_at IS NULL OR expires_at > now())
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }

    async fn list_share_links(&self, owner: &Uuid) -> Result<Vec<ShareLink>, AppError> {
        let links = sqlx::query_as::<_, ShareLink>(
            r#"
            SELECT id, owner_user_id, baby_id, month_number, token, created_at, expires_at
            FROM shared_link
            WHERE owner_user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }

    async fn delete_share_link(&self, id: &Uuid, owner: &Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM shared_link WHERE id = $1 AND owner_user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_expired_share_links(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM shared_link WHERE expires_at IS NOT NULL AND expires_at <= now()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
