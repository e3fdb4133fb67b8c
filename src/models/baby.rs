use chrono::{DateTime, NaiveDate, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Eq, PartialEq, JsonSchema, sqlx::Type)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Girl,
    Boy,
    Other,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Baby {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Option<Gender>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct BabyRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Option<Gender>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct BabyResponse {
    pub id: Uuid,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Option<Gender>,
    pub created_at: DateTime<Utc>,
}

/// Shape served through share links. Identical to [`BabyResponse`] today,
/// but kept separate so the public surface can never accidentally grow
/// owner-only fields.
#[derive(Serialize, Debug, JsonSchema)]
pub struct BabyPublicResponse {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Option<Gender>,
}

impl From<&Baby> for BabyResponse {
    fn from(baby: &Baby) -> Self {
        Self {
            id: baby.id,
            name: baby.name.clone(),
            date_of_birth: baby.date_of_birth,
            gender: baby.gender,
            created_at: baby.created_at,
        }
    }
}

impl From<&Baby> for BabyPublicResponse {
    fn from(baby: &Baby) -> Self {
        Self {
            name: baby.name.clone(),
            date_of_birth: baby.date_of_birth,
            gender: baby.gender,
        }
    }
}
