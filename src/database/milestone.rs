use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::milestone::{Milestone, MilestoneRequest};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait MilestoneRepository {
    async fn create_milestone(&self, request: &MilestoneRequest, owner: &Uuid) -> Result<Milestone, AppError>;
    async fn list_milestones(&self, baby_id: &Uuid, owner: &Uuid, month: Option<i32>) -> Result<Vec<Milestone>, AppError>;
    /// Share-link listing, scope already established by the token lookup.
    async fn list_milestones_shared(&self, baby_id: &Uuid, month: Option<i32>) -> Result<Vec<Milestone>, AppError>;
    async fn delete_milestone(&self, id: &Uuid, owner: &Uuid) -> Result<(), AppError>;
}

#[async_trait::async_trait]
impl MilestoneRepository for PostgresRepository {
    async fn create_milestone(&self, request: &MilestoneRequest, owner: &Uuid) -> Result<Milestone, AppError> {
        let milestone = sqlx::query_as::<_, Milestone>(
            r#"
            INSERT INTO milestone (baby_id, milestone_text, month_number)
            SELECT b.id, $3, $4
            FROM baby b
            WHERE b.id = $1 AND b.owner_user_id = $2
            RETURNING id, baby_id, milestone_text, month_number, created_at
            "#,
        )
        .bind(request.baby_id)
        .bind(owner)
        .bind(&request.milestone_text)
        .bind(request.month_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Baby not found".to_string()))?;

        Ok(milestone)
    }

    async fn list_milestones(&self, baby_id: &Uuid, owner: &Uuid, month: Option<i32>) -> Result<Vec<Milestone>, AppError> {
        let milestones = sqlx::query_as::<_, Milestone>(
            r#"
            SELECT m.id, m.baby_id, m.milestone_text, m.month_number, m.created_at
            FROM milestone m
            JOIN baby b ON b.id = m.baby_id
            WHERE m.baby_id = $1 AND b.owner_user_id = $2
              AND ($3::int IS NULL OR m.month_number = $3)
            ORDER BY m.created_at DESC
            "#,
        )
        .bind(baby_id)
        .bind(owner)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;

        Ok(milestones)
    }

    async fn list_milestones_shared(&self, baby_id: &Uuid, month: Option<i32>) -> Result<Vec<Milestone>, AppError> {
        let milestones = sqlx::query_as::<_, Milestone>(
            r#"
            SELECT id, baby_id, milestone_text, month_number, created_at
            FROM milestone
            WHERE baby_id = $1
              AND ($2::int IS NULL OR month_number = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(baby_id)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;

        Ok(milestones)
    }

    async fn delete_milestone(&self, id: &Uuid, owner: &Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            DELETE FROM milestone m
            USING baby b
            WHERE m.id = $1 AND b.id = m.baby_id AND b.owner_user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
