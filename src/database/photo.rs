use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::pagination::PaginationParams;
use crate::models::photo::{Photo, PhotoRequest};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait PhotoRepository {
    async fn create_photo(&self, request: &PhotoRequest, owner: &Uuid) -> Result<Photo, AppError>;
    async fn get_photo_by_id(&self, id: &Uuid, owner: &Uuid) -> Result<Option<Photo>, AppError>;
    /// Owner-facing listing, newest first, optionally month-filtered and paginated.
    async fn list_photos(
        &self,
        baby_id: &Uuid,
        owner: &Uuid,
        month: Option<i32>,
        pagination: Option<&PaginationParams>,
    ) -> Result<(Vec<Photo>, i64), AppError>;
    /// Share-link listing: no owner filter, scope was already established
    /// by the token lookup. Newest first.
    async fn list_photos_shared(&self, baby_id: &Uuid, month: Option<i32>) -> Result<Vec<Photo>, AppError>;
    async fn delete_photo(&self, id: &Uuid, owner: &Uuid) -> Result<(), AppError>;
}

#[async_trait::async_trait]
impl PhotoRepository for PostgresRepository {
    async fn create_photo(&self, request: &PhotoRequest, owner: &Uuid) -> Result<Photo, AppError> {
        let photo = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photo (baby_id, owner_user_id, month_number, storage_path, description, is_video, file_size)
            SELECT b.id, b.owner_user_id, $3, $4, $5, $6, $7
            FROM baby b
            WHERE b.id = $1 AND b.owner_user_id = $2
            RETURNING id, baby_id, owner_user_id, month_number, storage_path, description, is_video, file_size, created_at
            "#,
        )
        .bind(request.baby_id)
        .bind(owner)
        .bind(request.month_number)
        .bind(&request.storage_path)
        .bind(&request.description)
        .bind(request.is_video)
        .bind(request.file_size)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Baby not found".to_string()))?;

        Ok(photo)
    }

    async fn get_photo_by_id(&self, id: &Uuid, owner: &Uuid) -> Result<Option<Photo>, AppError> {
        let photo = sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, baby_id, owner_user_id, month_number, storage_path, description, is_video, file_size, created_at
            FROM photo
            WHERE id = $1 AND owner_user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(photo)
    }

    async fn list_photos(
        &self,
        baby_id: &Uuid,
        owner: &Uuid,
        month: Option<i32>,
        pagination: Option<&PaginationParams>,
    ) -> Result<(Vec<Photo>, i64), AppError> {
        #[derive(sqlx::FromRow)]
        struct CountRow {
            total: i64,
        }

        let count_row = sqlx::query_as::<_, CountRow>(
            r#"
            SELECT COUNT(*) as total
            FROM photo
            WHERE baby_id = $1 AND owner_user_id = $2
              AND ($3::int IS NULL OR month_number = $3)
            "#,
        )
        .bind(baby_id)
        .bind(owner)
        .bind(month)
        .fetch_one(&self.pool)
        .await?;

        let base_query = r#"
            SELECT id, baby_id, owner_user_id, month_number, storage_path, description, is_video, file_size, created_at
            FROM photo
            WHERE baby_id = $1 AND owner_user_id = $2
              AND ($3::int IS NULL OR month_number = $3)
            ORDER BY created_at DESC
            "#;

        let photos = if let Some(params) = pagination
            && let (Some(limit), Some(offset)) = (params.effective_limit(), params.offset())
        {
            sqlx::query_as::<_, Photo>(&format!("{} LIMIT $4 OFFSET $5", base_query))
                .bind(baby_id)
                .bind(owner)
                .bind(month)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
        } else {
            sqlx::query_as::<_, Photo>(base_query)
                .bind(baby_id)
                .bind(owner)
                .bind(month)
                .fetch_all(&self.pool)
                .await?
        };

        Ok((photos, count_row.total))
    }

    async fn list_photos_shared(&self, baby_id: &Uuid, month: Option<i32>) -> Result<Vec<Photo>, AppError> {
        let photos = sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, baby_id, owner_user_id, month_number, storage_path, description, is_video, file_size, created_at
            FROM photo
            WHERE baby_id = $1
              AND ($2::int IS NULL OR month_number = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(baby_id)
        .bind(month)
        .fetch_all(&self.pool)
        .await?;

        Ok(photos)
    }

    async fn delete_photo(&self, id: &Uuid, owner: &Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM photo WHERE id = $1 AND owner_user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
