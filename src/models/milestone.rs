use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Milestone {
    pub id: Uuid,
    pub baby_id: Uuid,
    pub milestone_text: String,
    pub month_number: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct MilestoneRequest {
    pub baby_id: Uuid,
    #[validate(length(min = 1))]
    pub milestone_text: String,
    #[validate(range(min = 1, max = 12))]
    pub month_number: i32,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct MilestoneResponse {
    pub id: Uuid,
    pub baby_id: Uuid,
    pub milestone_text: String,
    pub month_number: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&Milestone> for MilestoneResponse {
    fn from(milestone: &Milestone) -> Self {
        Self {
            id: milestone.id,
            baby_id: milestone.baby_id,
            milestone_text: milestone.milestone_text.clone(),
            month_number: milestone.month_number,
            created_at: milestone.created_at,
        }
    }
}
