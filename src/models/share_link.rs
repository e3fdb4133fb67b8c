use crate::models::baby::BabyPublicResponse;
use crate::models::milestone::MilestoneResponse;
use crate::models::photo::PhotoResponse;
use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::Validate;

/// A capability row: the token alone grants read access to the scope
/// `(baby, month?)`. Rows are never mutated after creation; owners delete
/// them explicitly and expired rows are reaped by the cron binary.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShareLink {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub baby_id: Uuid,
    pub month_number: Option<i32>,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// The scope a share link is bound to. Whole-baby when `month_number`
/// is absent, single-month when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareScope {
    Baby,
    Month(i32),
}

impl ShareLink {
    pub fn scope(&self) -> ShareScope {
        match self.month_number {
            Some(month) => ShareScope::Month(month),
            None => ShareScope::Baby,
        }
    }
}

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct ShareLinkRequest {
    pub baby_id: Uuid,
    #[validate(range(min = 1, max = 12))]
    pub month_number: Option<i32>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct ShareLinkResponse {
    pub id: Uuid,
    pub baby_id: Uuid,
    pub month_number: Option<i32>,
    pub token: String,
    pub share_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShareLinkResponse {
    pub fn from_link(link: &ShareLink, share_url: String) -> Self {
        Self {
            id: link.id,
            baby_id: link.baby_id,
            month_number: link.month_number,
            token: link.token.clone(),
            share_url,
            created_at: link.created_at,
            expires_at: link.expires_at,
        }
    }
}

/// Everything a share-link viewer gets to see. Owner identity, other
/// babies, and out-of-scope months are structurally absent.
#[derive(Serialize, Debug, JsonSchema)]
pub struct SharedViewResponse {
    pub baby: BabyPublicResponse,
    pub month_number: Option<i32>,
    pub photos: Vec<PhotoResponse>,
    pub milestones: Vec<MilestoneResponse>,
}
