use tracing::info;

use crate::entities::account::{Account, AdQuota};
use crate::entities::candidate::validate_dimensions;
use crate::entities::level::LevelStatus;
use crate::entities::submission::{SubmissionAck, SubmissionForm, SubmissionPayload};
use crate::errors::SubmitError;
use crate::interfaces::clients::backend::AdBackend;
use crate::interfaces::clients::level::LevelDirectory;
use crate::media::codec;

/// Runs the submission pipeline: precondition checks, normalization, upload.
pub struct SubmitHandler<L, B>
where
    L: LevelDirectory,
    B: AdBackend,
{
    pub level_directory: L,
    pub backend: B,
}

impl<L, B> SubmitHandler<L, B>
where
    L: LevelDirectory,
    B: AdBackend,
{
    pub fn new(level_directory: L, backend: B) -> Self {
        SubmitHandler { level_directory, backend }
    }

    /// Resolve a level id against the directory.
    pub async fn check_level(&self, id: &str) -> LevelStatus {
        self.level_directory.check_level(id).await
    }

    /// Validate and forward one submission.
    ///
    /// Checks run cheapest-first and short-circuit; nothing goes out on the
    /// wire until every one of them has passed. A failed attempt leaves the
    /// form untouched for retry; the caller applies [`FormEvent::Submitted`]
    /// on success.
    ///
    /// [`FormEvent::Submitted`]: crate::entities::submission::FormEvent::Submitted
    pub async fn submit(
        &self,
        form: &SubmissionForm,
        session: Option<&Account>,
        quota: &AdQuota,
        session_cookie: &str,
    ) -> Result<SubmissionAck, SubmitError> {
        let image = form.image.as_ref().ok_or(SubmitError::MissingImage)?;

        if !form.level.is_valid() {
            return Err(SubmitError::InvalidLevel);
        }

        let actual = image.dimensions.ok_or(SubmitError::UnknownDimensions)?;
        validate_dimensions(actual, form.slot)?;

        let account = session.ok_or(SubmitError::NotAuthenticated)?;

        if quota.exhausted() {
            return Err(SubmitError::QuotaExceeded {
                active_count: quota.active_count,
                max: quota.max,
            });
        }

        let encoded = codec::normalize(image);
        let file_name = SubmissionPayload::derive_file_name(&account.id, &encoded.extension);
        let payload = SubmissionPayload {
            owner_id: account.id.clone(),
            slot: form.slot,
            level_id: form.level_id.clone(),
            image: encoded,
            file_name,
        };

        let ack = self
            .backend
            .submit_ad(&payload, session_cookie)
            .await
            .map_err(SubmitError::Backend)?;

        info!("Ad {} stored at {} for user {}", ack.ad_id, ack.image_url, account.id);
        Ok(ack)
    }
}
