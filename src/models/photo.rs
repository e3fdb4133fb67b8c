use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

/// Pointer plus metadata; the bytes live in the external object store.
/// A fetchable `url` is never persisted, it is derived at read time by
/// exchanging `storage_path` for a signed URL.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub baby_id: Uuid,
    pub owner_user_id: Uuid,
    pub month_number: i32,
    pub storage_path: String,
    pub description: Option<String>,
    pub is_video: bool,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct PhotoRequest {
    pub baby_id: Uuid,
    #[validate(range(min = 1, max = 12))]
    pub month_number: i32,
    #[validate(length(min = 1))]
    pub storage_path: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_video: bool,
    pub file_size: Option<i64>,
}

/// `url` is `None` when signing failed for this asset; the item still
/// appears in lists and the client renders a placeholder.
#[derive(Serialize, Debug, JsonSchema)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub baby_id: Uuid,
    pub month_number: i32,
    pub description: Option<String>,
    pub is_video: bool,
    pub file_size: Option<i64>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PhotoResponse {
    pub fn from_photo(photo: &Photo, url: Option<String>) -> Self {
        Self {
            id: photo.id,
            baby_id: photo.baby_id,
            month_number: photo.month_number,
            description: photo.description.clone(),
            is_video: photo.is_video,
            file_size: photo.file_size,
            url,
            created_at: photo.created_at,
        }
    }
}
