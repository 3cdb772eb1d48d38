use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Ads an owner may keep active at once.
pub const BASE_AD_LIMIT: usize = 8;

/// Raised ceiling for verified, staff and admin accounts.
pub const ELEVATED_AD_LIMIT: usize = 20;

/// Lossy WebP quality applied when normalizing uploads.
pub const WEBP_QUALITY: f32 = 92.0;

/// Extension used when the original file name carries none.
pub const FALLBACK_EXTENSION: &str = "png";
