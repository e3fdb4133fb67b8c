//! Signed-URL mediation against the external object gateway.
//!
//! Photo rows only carry a durable `storage_path`; anything fetchable is
//! minted here as a time-boxed URL the gateway verifies with the shared
//! signing secret. Callers must not cache signed URLs past their expiry.

use crate::config::StorageConfig;
use crate::error::app_error::AppError;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "webm", "avi", "mkv"];

/// Size presets for on-the-fly image transformation. Transform parameters
/// only apply to static images; video assets are served untransformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVariant {
    Thumbnail,
    Preview,
    Display,
    Full,
}

#[derive(Debug, Clone, Copy)]
struct Transform {
    width: u32,
    quality: u32,
}

impl ImageVariant {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "thumbnail" => Some(ImageVariant::Thumbnail),
            "preview" => Some(ImageVariant::Preview),
            "display" => Some(ImageVariant::Display),
            "full" => Some(ImageVariant::Full),
            _ => None,
        }
    }

    fn transform(self) -> Option<Transform> {
        match self {
            ImageVariant::Thumbnail => Some(Transform { width: 200, quality: 60 }),
            ImageVariant::Preview => Some(Transform { width: 600, quality: 75 }),
            ImageVariant::Display => Some(Transform { width: 1200, quality: 85 }),
            ImageVariant::Full => None,
        }
    }
}

/// File-extension heuristic; the upload path records `is_video` as well,
/// but the mediator must not rely on callers passing it through.
pub fn is_video_path(path: &str) -> bool {
    path.rsplit('.')
        .next()
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[derive(Debug, Clone)]
pub struct SignedUrlService {
    base_url: String,
    secret: String,
    default_expiry_secs: u64,
}

impl SignedUrlService {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            base_url: config.public_base_url.trim_end_matches('/').to_string(),
            secret: config.signing_secret.clone(),
            default_expiry_secs: config.signed_url_expiry_seconds,
        }
    }

    pub fn default_expiry_secs(&self) -> u64 {
        self.default_expiry_secs
    }

    /// Mint a signed URL for `storage_path`, valid for `expiry_secs`
    /// (the configured default when `None`). Transform parameters are
    /// dropped for video paths regardless of the requested variant.
    pub fn sign_path(&self, storage_path: &str, expiry_secs: Option<u64>, variant: Option<ImageVariant>) -> Result<String, AppError> {
        let expires = Utc::now().timestamp() + expiry_secs.unwrap_or(self.default_expiry_secs) as i64;
        self.sign_path_at(storage_path, expires, variant)
    }

    fn sign_path_at(&self, storage_path: &str, expires: i64, variant: Option<ImageVariant>) -> Result<String, AppError> {
        let path = storage_path.trim_start_matches('/');
        let mut params: Vec<(String, String)> = vec![("expires".to_string(), expires.to_string())];

        if !is_video_path(path)
            && let Some(transform) = variant.and_then(ImageVariant::transform)
        {
            params.push(("width".to_string(), transform.width.to_string()));
            params.push(("quality".to_string(), transform.quality.to_string()));
            params.push(("resize".to_string(), "contain".to_string()));
        }

        let canonical = canonical_query(&params);
        let token = self.signature(path, &canonical)?;

        Ok(format!("{}/object/sign/{}?{}&token={}", self.base_url, path, canonical, token))
    }

    /// Check a URL previously produced by [`sign_path`] against the secret
    /// and `now`. This is the verification the gateway performs; the API
    /// only uses it in tests to pin the expiry contract.
    pub fn verify_url(&self, url: &str, now: DateTime<Utc>) -> bool {
        let prefix = format!("{}/object/sign/", self.base_url);
        let Some(rest) = url.strip_prefix(&prefix) else {
            return false;
        };
        let Some((path, query)) = rest.split_once('?') else {
            return false;
        };
        let Some((canonical, token)) = query.rsplit_once("&token=") else {
            return false;
        };

        let Some(expires) = canonical
            .split('&')
            .find_map(|pair| pair.strip_prefix("expires="))
            .and_then(|value| value.parse::<i64>().ok())
        else {
            return false;
        };

        if now.timestamp() > expires {
            return false;
        }

        match self.signature(path, canonical) {
            Ok(expected) => expected == token,
            Err(_) => false,
        }
    }

    fn signature(&self, path: &str, canonical: &str) -> Result<String, AppError> {
        if self.secret.is_empty() {
            return Err(AppError::signing("storage signing secret is not configured"));
        }

        let string_to_sign = format!("GET\n/{}\n{}\n", path, canonical);
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes()).map_err(|_| AppError::signing("invalid storage signing secret"))?;
        mac.update(string_to_sign.as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// Sorted, url-encoded query string; sorting keeps the signature
/// independent of parameter insertion order.
fn canonical_query(params: &[(String, String)]) -> String {
    let mut encoded: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    encoded.sort();
    encoded.join("&")
}
