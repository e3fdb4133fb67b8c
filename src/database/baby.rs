use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::baby::{Baby, BabyRequest};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait BabyRepository {
    async fn create_baby(&self, request: &BabyRequest, owner: &Uuid) -> Result<Baby, AppError>;
    async fn get_baby_by_id(&self, id: &Uuid, owner: &Uuid) -> Result<Option<Baby>, AppError>;
    /// Lookup without an owner filter, used only by the share-link resolver
    /// once a token has already been matched.
    async fn get_baby_unscoped(&self, id: &Uuid) -> Result<Option<Baby>, AppError>;
    async fn list_babies(&self, owner: &Uuid) -> Result<Vec<Baby>, AppError>;
    async fn update_baby(&self, id: &Uuid, request: &BabyRequest, owner: &Uuid) -> Result<Baby, AppError>;
    async fn delete_baby(&self, id: &Uuid, owner: &Uuid) -> Result<(), AppError>;
}

#[async_trait::async_trait]
impl BabyRepository for PostgresRepository {
    async fn create_baby(&self, request: &BabyRequest, owner: &Uuid) -> Result<Baby, AppError> {
        let baby = sqlx::query_as::<_, Baby>(
            r#"
            INSERT INTO baby (owner_user_id, name, date_of_birth, gender)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_user_id, name, date_of_birth, gender, created_at
            "#,
        )
        .bind(owner)
        .bind(&request.name)
        .bind(request.date_of_birth)
        .bind(request.gender)
        .fetch_one(&self.pool)
        .await?;

        Ok(baby)
    }

    async fn get_baby_by_id(&self, id: &Uuid, owner: &Uuid) -> Result<Option<Baby>, AppError> {
        let baby = sqlx::query_as::<_, Baby>(
            r#"
            SELECT id, owner_user_id, name, date_of_birth, gender, created_at
            FROM baby
            WHERE id = $1 AND owner_user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(baby)
    }

    async fn get_baby_unscoped(&self, id: &Uuid) -> Result<Option<Baby>, AppError> {
        let baby = sqlx::query_as::<_, Baby>(
            r#"
            SELECT id, owner_user_id, name, date_of_birth, gender, created_at
            FROM baby
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(baby)
    }

    async fn list_babies(&self, owner: &Uuid) -> Result<Vec<Baby>, AppError> {
        let babies = sqlx::query_as::<_, Baby>(
            r#"
            SELECT id, owner_user_id, name, date_of_birth, gender, created_at
            FROM baby
            WHERE owner_user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(babies)
    }

    async fn update_baby(&self, id: &Uuid, request: &BabyRequest, owner: &Uuid) -> Result<Baby, AppError> {
        let baby = sqlx::query_as::<_, Baby>(
            r#"
            UPDATE baby
            SET name = $1, date_of_birth = $2, gender = $3
            WHERE id = $4 AND owner_user_id = $5
            RETURNING id, owner_user_id, name, date_of_birth, gender, created_at
            "#,
        )
        .bind(&request.name)
        .bind(request.date_of_birth)
        .bind(request.gender)
        .bind(id)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(baby)
    }

    async fn delete_baby(&self, id: &Uuid, owner: &Uuid) -> Result<(), AppError> {
        // Photos, milestones and share links go with it via FK cascade.
        sqlx::query("DELETE FROM baby WHERE id = $1 AND owner_user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::InMemoryRepository;
    use chrono::NaiveDate;

    fn baby_request(name: &str) -> BabyRequest {
        BabyRequest {
            name: name.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            gender: None,
        }
    }

    #[tokio::test]
    async fn create_and_get_baby() {
        let repo = InMemoryRepository::new();
        let owner = Uuid::new_v4();

        let baby = repo.create_baby(&baby_request("Mina"), &owner).await.unwrap();
        let fetched = repo.get_baby_by_id(&baby.id, &owner).await.unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().name, "Mina");
    }

    #[tokio::test]
    async fn get_baby_is_owner_scoped() {
        let repo = InMemoryRepository::new();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let baby = repo.create_baby(&baby_request("Mina"), &owner).await.unwrap();
        assert!(repo.get_baby_by_id(&baby.id, &stranger).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_baby_removes_children() {
        let repo = InMemoryRepository::new();
        let owner = Uuid::new_v4();

        let baby = repo.create_baby(&baby_request("Mina"), &owner).await.unwrap();
        repo.delete_baby(&baby.id, &owner).await.unwrap();
        assert!(repo.get_baby_by_id(&baby.id, &owner).await.unwrap().is_none());
    }
}
