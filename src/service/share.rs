//! Share-link issuing and resolution.
//!
//! A share link is a capability: the token is the whole credential, and
//! everything a viewer can see flows from the scope stored on the row.
//! Issuing is idempotent per `(owner, baby, month?)` scope; resolution
//! never distinguishes "no such token" from "expired" or "wrong path".

use crate::database::baby::BabyRepository;
use crate::database::milestone::MilestoneRepository;
use crate::database::photo::PhotoRepository;
use crate::database::share_link::ShareLinkRepository;
use crate::error::app_error::AppError;
use crate::models::milestone::MilestoneResponse;
use crate::models::photo::PhotoResponse;
use crate::models::share_link::{ShareLink, ShareLinkRequest, ShareScope, SharedViewResponse};
use crate::service::storage::{ImageVariant, SignedUrlService};
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

const SHARE_NOT_FOUND: &str = "Share link not found";

/// Which kind of viewer path a resolution request came in on. A token
/// must be used on the path matching its stored scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePathScope {
    Baby,
    Month,
}

pub struct ShareService<'a, R> {
    repo: &'a R,
    signer: &'a SignedUrlService,
    viewer_origin: &'a str,
}

impl<'a, R> ShareService<'a, R>
where
    R: BabyRepository + PhotoRepository + MilestoneRepository + ShareLinkRepository + Sync,
{
    pub fn new(repo: &'a R, signer: &'a SignedUrlService, viewer_origin: &'a str) -> Self {
        Self { repo, signer, viewer_origin }
    }

    /// Look up or create the link for the requested scope. Repeated calls
    /// for the same scope return the same row and never rotate the token;
    /// `expires_at` on the request only applies when a new row is created.
    pub async fn issue_link(&self, owner: &Uuid, request: &ShareLinkRequest) -> Result<ShareLink, AppError> {
        if request.expires_at.is_some_and(|expires_at| expires_at <= Utc::now()) {
            return Err(AppError::BadRequest("expires_at must be in the future".to_string()));
        }

        if self.repo.get_baby_by_id(&request.baby_id, owner).await?.is_none() {
            return Err(AppError::NotFound("Baby not found".to_string()));
        }

        if let Some(existing) = self.repo.find_share_link(owner, &request.baby_id, request.month_number).await? {
            return Ok(existing);
        }

        let token = Uuid::new_v4().to_string();
        self.repo
            .create_share_link(owner, &request.baby_id, request.month_number, &token, request.expires_at)
            .await
    }

    /// The viewer-facing URL for a link, on the path matching its scope.
    pub fn share_url(&self, link: &ShareLink) -> String {
        let origin = self.viewer_origin.trim_end_matches('/');
        match link.scope() {
            ShareScope::Baby => format!("{}/shared/baby/{}", origin, link.token),
            ShareScope::Month(_) => format!("{}/shared/month/{}", origin, link.token),
        }
    }

    /// Resolve a public token into the scoped view. Any failure along the
    /// token -> link -> baby chain collapses to the same not-found error,
    /// except per-photo signing failures, which degrade that photo's `url`
    /// to `None` rather than failing the whole view.
    pub async fn resolve(&self, token: &str, path_scope: SharePathScope) -> Result<SharedViewResponse, AppError> {
        let link = self
            .repo
            .get_share_link_by_token(token)
            .await?
            .ok_or_else(|| AppError::NotFound(SHARE_NOT_FOUND.to_string()))?;

        let scope_matches = matches!(
            (path_scope, link.scope()),
            (SharePathScope::Baby, ShareScope::Baby) | (SharePathScope::Month, ShareScope::Month(_))
        );
        if !scope_matches {
            return Err(AppError::NotFound(SHARE_NOT_FOUND.to_string()));
        }

        let baby = self
            .repo
            .get_baby_unscoped(&link.baby_id)
            .await?
            .ok_or_else(|| AppError::NotFound(SHARE_NOT_FOUND.to_string()))?;

        let (photos, milestones) = tokio::try_join!(
            self.repo.list_photos_shared(&link.baby_id, link.month_number),
            self.repo.list_milestones_shared(&link.baby_id, link.month_number),
        )?;

        Ok(SharedViewResponse {
            baby: (&baby).into(),
            month_number: link.month_number,
            photos: photos.iter().map(|photo| PhotoResponse::from_photo(photo, self.signed_url_or_none(photo))).collect(),
            milestones: milestones.iter().map(MilestoneResponse::from).collect(),
        })
    }

    fn signed_url_or_none(&self, photo: &crate::models::photo::Photo) -> Option<String> {
        let variant = if photo.is_video { None } else { Some(ImageVariant::Display) };
        match self.signer.sign_path(&photo.storage_path, None, variant) {
            Ok(url) => Some(url),
            Err(error) => {
                warn!(photo_id = %photo.id, %error, "failed to sign photo url, serving without one");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use crate::models::baby::BabyRequest;
    use crate::models::milestone::MilestoneRequest;
    use crate::models::photo::PhotoRequest;
    use crate::test_utils::InMemoryRepository;
    use chrono::{Duration, NaiveDate, Utc};

    fn signer() -> SignedUrlService {
        SignedUrlService::new(&StorageConfig {
            public_base_url: "https://media.example.test".to_string(),
            signing_secret: "test-secret".to_string(),
            signed_url_expiry_seconds: 3600,
        })
    }

    fn broken_signer() -> SignedUrlService {
        SignedUrlService::new(&StorageConfig {
            public_base_url: "https://media.example.test".to_string(),
            signing_secret: String::new(),
            signed_url_expiry_seconds: 3600,
        })
    }

    async fn seed_baby(repo: &InMemoryRepository, owner: &Uuid) -> Uuid {
        repo.create_baby(
            &BabyRequest {
                name: "Mina".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
                gender: None,
            },
            owner,
        )
        .await
        .unwrap()
        .id
    }

    async fn seed_photo(repo: &InMemoryRepository, owner: &Uuid, baby_id: Uuid, month: i32, path: &str) {
        repo.create_photo(
            &PhotoRequest {
                baby_id,
                month_number: month,
                storage_path: path.to_string(),
                description: None,
                is_video: false,
                file_size: Some(2048),
            },
            owner,
        )
        .await
        .unwrap();
    }

    fn link_request(baby_id: Uuid, month: Option<i32>) -> ShareLinkRequest {
        ShareLinkRequest {
            baby_id,
            month_number: month,
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn issuing_twice_returns_the_same_token() {
        let repo = InMemoryRepository::new();
        let signer = signer();
        let owner = Uuid::new_v4();
        let baby_id = seed_baby(&repo, &owner).await;
        let service = ShareService::new(&repo, &signer, "https://app.example.test");

        let first = service.issue_link(&owner, &link_request(baby_id, Some(3))).await.unwrap();
        let second = service.issue_link(&owner, &link_request(baby_id, Some(3))).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.token, second.token);
    }

    #[tokio::test]
    async fn distinct_scopes_get_distinct_tokens() {
        let repo = InMemoryRepository::new();
        let signer = signer();
        let owner = Uuid::new_v4();
        let baby_id = seed_baby(&repo, &owner).await;
        let service = ShareService::new(&repo, &signer, "https://app.example.test");

        let whole = service.issue_link(&owner, &link_request(baby_id, None)).await.unwrap();
        let month = service.issue_link(&owner, &link_request(baby_id, Some(3))).await.unwrap();
        assert_ne!(whole.token, month.token);
    }

    #[tokio::test]
    async fn issuing_with_a_past_expiry_is_rejected() {
        let repo = InMemoryRepository::new();
        let signer = signer();
        let owner = Uuid::new_v4();
        let baby_id = seed_baby(&repo, &owner).await;
        let service = ShareService::new(&repo, &signer, "https://app.example.test");

        let request = ShareLinkRequest {
            baby_id,
            month_number: None,
            expires_at: Some(Utc::now() - Duration::hours(1)),
        };
        let denied = service.issue_link(&owner, &request).await;
        assert!(matches!(denied, Err(AppError::BadRequest(_))));
        assert!(repo.find_share_link(&owner, &baby_id, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn issuing_for_a_foreign_baby_is_not_found() {
        let repo = InMemoryRepository::new();
        let signer = signer();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let baby_id = seed_baby(&repo, &owner).await;
        let service = ShareService::new(&repo, &signer, "https://app.example.test");

        let denied = service.issue_link(&stranger, &link_request(baby_id, None)).await;
        assert!(matches!(denied, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn share_url_reflects_the_scope() {
        let repo = InMemoryRepository::new();
        let signer = signer();
        let owner = Uuid::new_v4();
        let baby_id = seed_baby(&repo, &owner).await;
        let service = ShareService::new(&repo, &signer, "https://app.example.test/");

        let whole = service.issue_link(&owner, &link_request(baby_id, None)).await.unwrap();
        let month = service.issue_link(&owner, &link_request(baby_id, Some(5))).await.unwrap();

        assert_eq!(service.share_url(&whole), format!("https://app.example.test/shared/baby/{}", whole.token));
        assert_eq!(service.share_url(&month), format!("https://app.example.test/shared/month/{}", month.token));
    }

    #[tokio::test]
    async fn resolve_unknown_token_is_not_found() {
        let repo = InMemoryRepository::new();
        let signer = signer();
        let service = ShareService::new(&repo, &signer, "https://app.example.test");

        let resolved = service.resolve("abc-123", SharePathScope::Baby).await;
        assert!(matches!(resolved, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn resolve_rejects_a_token_on_the_wrong_path() {
        let repo = InMemoryRepository::new();
        let signer = signer();
        let owner = Uuid::new_v4();
        let baby_id = seed_baby(&repo, &owner).await;
        let service = ShareService::new(&repo, &signer, "https://app.example.test");

        let month_link = service.issue_link(&owner, &link_request(baby_id, Some(3))).await.unwrap();
        let on_baby_path = service.resolve(&month_link.token, SharePathScope::Baby).await;
        assert!(matches!(on_baby_path, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn month_scope_filters_photos_and_milestones() {
        let repo = InMemoryRepository::new();
        let signer = signer();
        let owner = Uuid::new_v4();
        let baby_id = seed_baby(&repo, &owner).await;
        let service = ShareService::new(&repo, &signer, "https://app.example.test");

        seed_photo(&repo, &owner, baby_id, 3, "b/m3.jpg").await;
        seed_photo(&repo, &owner, baby_id, 5, "b/m5.jpg").await;
        for (text, month) in [("first smile", 3), ("sits up", 5)] {
            repo.create_milestone(
                &MilestoneRequest {
                    baby_id,
                    milestone_text: text.to_string(),
                    month_number: month,
                },
                &owner,
            )
            .await
            .unwrap();
        }

        let link = service.issue_link(&owner, &link_request(baby_id, Some(3))).await.unwrap();
        let view = service.resolve(&link.token, SharePathScope::Month).await.unwrap();

        assert_eq!(view.month_number, Some(3));
        assert_eq!(view.photos.len(), 1);
        assert!(view.photos.iter().all(|p| p.month_number == 3));
        assert_eq!(view.milestones.len(), 1);
        assert_eq!(view.milestones[0].milestone_text, "first smile");
    }

    #[tokio::test]
    async fn baby_scope_returns_all_months() {
        let repo = InMemoryRepository::new();
        let signer = signer();
        let owner = Uuid::new_v4();
        let baby_id = seed_baby(&repo, &owner).await;
        let service = ShareService::new(&repo, &signer, "https://app.example.test");

        seed_photo(&repo, &owner, baby_id, 3, "b/m3.jpg").await;
        seed_photo(&repo, &owner, baby_id, 5, "b/m5.jpg").await;

        let link = service.issue_link(&owner, &link_request(baby_id, None)).await.unwrap();
        let view = service.resolve(&link.token, SharePathScope::Baby).await.unwrap();

        assert_eq!(view.month_number, None);
        assert_eq!(view.photos.len(), 2);
        assert!(view.photos.iter().all(|p| p.url.is_some()));
        assert_eq!(view.baby.name, "Mina");
    }

    #[tokio::test]
    async fn resolved_photos_are_newest_first() {
        let repo = InMemoryRepository::new();
        let signer = signer();
        let owner = Uuid::new_v4();
        let baby_id = seed_baby(&repo, &owner).await;
        let service = ShareService::new(&repo, &signer, "https://app.example.test");

        for path in ["b/1.jpg", "b/2.jpg", "b/3.jpg"] {
            seed_photo(&repo, &owner, baby_id, 3, path).await;
        }

        let link = service.issue_link(&owner, &link_request(baby_id, None)).await.unwrap();
        let view = service.resolve(&link.token, SharePathScope::Baby).await.unwrap();
        let timestamps: Vec<_> = view.photos.iter().map(|p| p.created_at).collect();
        let mut sorted = timestamps.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(timestamps, sorted);
    }

    #[tokio::test]
    async fn signing_failure_degrades_to_url_none() {
        let repo = InMemoryRepository::new();
        let signer = broken_signer();
        let owner = Uuid::new_v4();
        let baby_id = seed_baby(&repo, &owner).await;
        let service = ShareService::new(&repo, &signer, "https://app.example.test");

        seed_photo(&repo, &owner, baby_id, 3, "b/m3.jpg").await;

        let link = service.issue_link(&owner, &link_request(baby_id, None)).await.unwrap();
        let view = service.resolve(&link.token, SharePathScope::Baby).await.unwrap();
        assert_eq!(view.photos.len(), 1);
        assert!(view.photos[0].url.is_none());
    }

    #[tokio::test]
    async fn expired_link_resolves_as_not_found() {
        let repo = InMemoryRepository::new();
        let signer = signer();
        let owner = Uuid::new_v4();
        let baby_id = seed_baby(&repo, &owner).await;
        let service = ShareService::new(&repo, &signer, "https://app.example.test");

        let past = Utc::now() - Duration::hours(1);
        repo.create_share_link(&owner, &baby_id, None, "stale-token", Some(past)).await.unwrap();

        let resolved = service.resolve("stale-token", SharePathScope::Baby).await;
        assert!(matches!(resolved, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn deleted_baby_makes_the_link_dead() {
        let repo = InMemoryRepository::new();
        let signer = signer();
        let owner = Uuid::new_v4();
        let baby_id = seed_baby(&repo, &owner).await;
        let service = ShareService::new(&repo, &signer, "https://app.example.test");

        let link = service.issue_link(&owner, &link_request(baby_id, None)).await.unwrap();
        let token = link.token.clone();
        repo.delete_baby(&baby_id, &owner).await.unwrap();

        let resolved = service.resolve(&token, SharePathScope::Baby).await;
        assert!(matches!(resolved, Err(AppError::NotFound(_))));
    }
}
