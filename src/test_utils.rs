//! In-memory repository for unit tests that should not need Postgres.
//!
//! Mirrors the SQL implementations closely enough for behavioral tests:
//! owner scoping, month filtering, newest-first ordering, scope-exact
//! share-link lookup, expiry filtering, and delete cascades.

use crate::database::baby::BabyRepository;
use crate::database::milestone::MilestoneRepository;
use crate::database::photo::PhotoRepository;
use crate::database::share_link::ShareLinkRepository;
use crate::error::app_error::AppError;
use crate::models::baby::{Baby, BabyRequest};
use crate::models::milestone::{Milestone, MilestoneRequest};
use crate::models::pagination::PaginationParams;
use crate::models::photo::{Photo, PhotoRequest};
use crate::models::share_link::ShareLink;
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct State {
    babies: Vec<Baby>,
    photos: Vec<Photo>,
    milestones: Vec<Milestone>,
    links: Vec<ShareLink>,
    seq: i64,
}

pub struct InMemoryRepository {
    state: Mutex<State>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    /// Strictly increasing timestamps so newest-first ordering is
    /// deterministic even for inserts within the same clock tick.
    fn next_created_at(&mut self) -> DateTime<Utc> {
        self.seq += 1;
        Utc::now() + Duration::microseconds(self.seq)
    }

    fn owns_baby(&self, baby_id: &Uuid, owner: &Uuid) -> bool {
        self.babies.iter().any(|b| b.id == *baby_id && b.owner_user_id == *owner)
    }
}

fn link_is_live(link: &ShareLink) -> bool {
    link.expires_at.is_none_or(|expires_at| expires_at > Utc::now())
}

#[async_trait::async_trait]
impl BabyRepository for InMemoryRepository {
    async fn create_baby(&self, request: &BabyRequest, owner: &Uuid) -> Result<Baby, AppError> {
        let mut state = self.state.lock().unwrap();
        let baby = Baby {
            id: Uuid::new_v4(),
            owner_user_id: *owner,
            name: request.name.clone(),
            date_of_birth: request.date_of_birth,
            gender: request.gender,
            created_at: state.next_created_at(),
        };
        state.babies.push(baby.clone());
        Ok(baby)
    }

    async fn get_baby_by_id(&self, id: &Uuid, owner: &Uuid) -> Result<Option<Baby>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.babies.iter().find(|b| b.id == *id && b.owner_user_id == *owner).cloned())
    }

    async fn get_baby_unscoped(&self, id: &Uuid) -> Result<Option<Baby>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.babies.iter().find(|b| b.id == *id).cloned())
    }

    async fn list_babies(&self, owner: &Uuid) -> Result<Vec<Baby>, AppError> {
        let state = self.state.lock().unwrap();
        let mut babies: Vec<Baby> = state.babies.iter().filter(|b| b.owner_user_id == *owner).cloned().collect();
        babies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(babies)
    }

    async fn update_baby(&self, id: &Uuid, request: &BabyRequest, owner: &Uuid) -> Result<Baby, AppError> {
        let mut state = self.state.lock().unwrap();
        let baby = state
            .babies
            .iter_mut()
            .find(|b| b.id == *id && b.owner_user_id == *owner)
            .ok_or_else(|| AppError::NotFound("Baby not found".to_string()))?;
        baby.name = request.name.clone();
        baby.date_of_birth = request.date_of_birth;
        baby.gender = request.gender;
        Ok(baby.clone())
    }

    async fn delete_baby(&self, id: &Uuid, owner: &Uuid) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        let before = state.babies.len();
        state.babies.retain(|b| !(b.id == *id && b.owner_user_id == *owner));
        if state.babies.len() < before {
            state.photos.retain(|p| p.baby_id != *id);
            state.milestones.retain(|m| m.baby_id != *id);
            state.links.retain(|l| l.baby_id != *id);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl PhotoRepository for InMemoryRepository {
    async fn create_photo(&self, request: &PhotoRequest, owner: &Uuid) -> Result<Photo, AppError> {
        let mut state = self.state.lock().unwrap();
        if !state.owns_baby(&request.baby_id, owner) {
            return Err(AppError::NotFound("Baby not found".to_string()));
        }
        let photo = Photo {
            id: Uuid::new_v4(),
            baby_id: request.baby_id,
            owner_user_id: *owner,
            month_number: request.month_number,
            storage_path: request.storage_path.clone(),
            description: request.description.clone(),
            is_video: request.is_video,
            file_size: request.file_size,
            created_at: state.next_created_at(),
        };
        state.photos.push(photo.clone());
        Ok(photo)
    }

    async fn get_photo_by_id(&self, id: &Uuid, owner: &Uuid) -> Result<Option<Photo>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.photos.iter().find(|p| p.id == *id && p.owner_user_id == *owner).cloned())
    }

    async fn list_photos(
        &self,
        baby_id: &Uuid,
        owner: &Uuid,
        month: Option<i32>,
        pagination: Option<&PaginationParams>,
    ) -> Result<(Vec<Photo>, i64), AppError> {
        let state = self.state.lock().unwrap();
        let mut photos: Vec<Photo> = state
            .photos
            .iter()
            .filter(|p| p.baby_id == *baby_id && p.owner_user_id == *owner)
            .filter(|p| month.is_none_or(|m| p.month_number == m))
            .cloned()
            .collect();
        photos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = photos.len() as i64;

        if let Some(params) = pagination
            && let (Some(limit), Some(offset)) = (params.effective_limit(), params.offset())
        {
            photos = photos.into_iter().skip(offset as usize).take(limit as usize).collect();
        }

        Ok((photos, total))
    }

    async fn list_photos_shared(&self, baby_id: &Uuid, month: Option<i32>) -> Result<Vec<Photo>, AppError> {
        let state = self.state.lock().unwrap();
        let mut photos: Vec<Photo> = state
            .photos
            .iter()
            .filter(|p| p.baby_id == *baby_id)
            .filter(|p| month.is_none_or(|m| p.month_number == m))
            .cloned()
            .collect();
        photos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(photos)
    }

    async fn delete_photo(&self, id: &Uuid, owner: &Uuid) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.photos.retain(|p| !(p.id == *id && p.owner_user_id == *owner));
        Ok(())
    }
}

#[async_trait::async_trait]
impl MilestoneRepository for InMemoryRepository {
    async fn create_milestone(&self, request: &MilestoneRequest, owner: &Uuid) -> Result<Milestone, AppError> {
        let mut state = self.state.lock().unwrap();
        if !state.owns_baby(&request.baby_id, owner) {
            return Err(AppError::NotFound("Baby not found".to_string()));
        }
        let milestone = Milestone {
            id: Uuid::new_v4(),
            baby_id: request.baby_id,
            milestone_text: request.milestone_text.clone(),
            month_number: request.month_number,
            created_at: state.next_created_at(),
        };
        state.milestones.push(milestone.clone());
        Ok(milestone)
    }

    async fn list_milestones(&self, baby_id: &Uuid, owner: &Uuid, month: Option<i32>) -> Result<Vec<Milestone>, AppError> {
        let state = self.state.lock().unwrap();
        if !state.owns_baby(baby_id, owner) {
            return Ok(Vec::new());
        }
        let mut milestones: Vec<Milestone> = state
            .milestones
            .iter()
            .filter(|m| m.baby_id == *baby_id)
            .filter(|m| month.is_none_or(|wanted| m.month_number == wanted))
            .cloned()
            .collect();
        milestones.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(milestones)
    }

    async fn list_milestones_shared(&self, baby_id: &Uuid, month: Option<i32>) -> Result<Vec<Milestone>, AppError> {
        let state = self.state.lock().unwrap();
        let mut milestones: Vec<Milestone> = state
            .milestones
            .iter()
            .filter(|m| m.baby_id == *baby_id)
            .filter(|m| month.is_none_or(|wanted| m.month_number == wanted))
            .cloned()
            .collect();
        milestones.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(milestones)
    }

    async fn delete_milestone(&self, id: &Uuid, owner: &Uuid) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        let owned: Vec<Uuid> = state
            .babies
            .iter()
            .filter(|b| b.owner_user_id == *owner)
            .map(|b| b.id)
            .collect();
        state.milestones.retain(|m| !(m.id == *id && owned.contains(&m.baby_id)));
        Ok(())
    }
}

#[async_trait::async_trait]
impl ShareLinkRepository for InMemoryRepository {
    async fn find_share_link(&self, owner: &Uuid, baby_id: &Uuid, month: Option<i32>) -> Result<Option<ShareLink>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .links
            .iter()
            .find(|l| l.owner_user_id == *owner && l.baby_id == *baby_id && l.month_number == month && link_is_live(l))
            .cloned())
    }

    async fn create_share_link(
        &self,
        owner: &Uuid,
        baby_id: &Uuid,
        month: Option<i32>,
        token: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ShareLink, AppError> {
        let mut state = self.state.lock().unwrap();
        // Mirror the SQL impl: an expired row for the same scope is
        // replaced rather than left to collide with the new one.
        state
            .links
            .retain(|l| !(l.owner_user_id == *owner && l.baby_id == *baby_id && l.month_number == month && !link_is_live(l)));
        let link = ShareLink {
            id: Uuid::new_v4(),
            owner_user_id: *owner,
            baby_id: *baby_id,
            month_number: month,
            token: token.to_string(),
            created_at: state.next_created_at(),
            expires_at,
        };
        state.links.push(link.clone());
        Ok(link)
    }

    async fn get_share_link_by_token(&self, token: &str) -> Result<Option<ShareLink>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.links.iter().find(|l| l.token == token && link_is_live(l)).cloned())
    }

    async fn list_share_links(&self, owner: &Uuid) -> Result<Vec<ShareLink>, AppError> {
        let state = self.state.lock().unwrap();
        let mut links: Vec<ShareLink> = state.links.iter().filter(|l| l.owner_user_id == *owner).cloned().collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }

    async fn delete_share_link(&self, id: &Uuid, owner: &Uuid) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        state.links.retain(|l| !(l.id == *id && l.owner_user_id == *owner));
        Ok(())
    }

    async fn delete_expired_share_links(&self) -> Result<u64, AppError> {
        let mut state = self.state.lock().unwrap();
        let before = state.links.len();
        state.links.retain(link_is_live);
        Ok((before - state.links.len()) as u64)
    }
}
