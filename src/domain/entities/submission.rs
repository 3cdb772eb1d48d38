use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use serde::{Deserialize, Serialize};

use crate::entities::candidate::{CandidateImage, EncodedImage};
use crate::entities::level::LevelStatus;
use crate::entities::slot::AdSlot;

/// Multipart body of an ad submission; field names are shared with the
/// dashboard form. The image is optional at the transport level so that a
/// fileless submission is refused by the pipeline, not the parser.
#[derive(Debug, MultipartForm)]
pub struct AdUploadForm {
    #[multipart(rename = "image-upload", limit = "10MiB")]
    pub image: Option<TempFile>,
    #[multipart(rename = "type")]
    pub slot: Text<String>,
    #[multipart(rename = "level-id")]
    pub level_id: Text<String>,
}

/// Everything the gateway sends upstream for one accepted ad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub owner_id: String,
    pub slot: AdSlot,
    pub level_id: String,
    pub image: EncodedImage,
    pub file_name: String,
}

impl SubmissionPayload {
    /// `{owner}.{ext}` — the backend keys an owner's pending record on it.
    pub fn derive_file_name(owner_id: &str, extension: &str) -> String {
        format!("{owner_id}.{extension}")
    }
}

/// Created-ad acknowledgement from the ads backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAck {
    pub ad_id: i64,
    pub image_url: String,
}

/// Form state for one submission attempt.
///
/// All transitions go through [`reduce`]; nothing mutates fields directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionForm {
    pub slot: AdSlot,
    pub image: Option<CandidateImage>,
    pub level_id: String,
    pub level: LevelStatus,
    /// Sequence number of the newest level check issued.
    pub check_seq: u64,
}

impl SubmissionForm {
    pub fn new(slot: AdSlot) -> Self {
        SubmissionForm {
            slot,
            image: None,
            level_id: String::new(),
            level: LevelStatus::Unknown,
            check_seq: 0,
        }
    }
}

impl Default for SubmissionForm {
    fn default() -> Self {
        SubmissionForm::new(AdSlot::Banner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    ImageSelected(CandidateImage),
    ImageCleared,
    SlotChanged(AdSlot),
    LevelIdChanged(String),
    /// A level check went out for the current id.
    CheckIssued,
    /// A level check came back; `seq` is the number it was issued under.
    CheckResolved { seq: u64, result: LevelStatus },
    /// Upload acknowledged; the form returns to its initial state.
    Submitted,
}

/// Pure reducer over the submission form.
///
/// Resolutions carrying a sequence number older than the newest issued check
/// are dropped, so a slow early response can never overwrite a fresher one.
pub fn reduce(form: SubmissionForm, event: FormEvent) -> SubmissionForm {
    match event {
        FormEvent::ImageSelected(image) => SubmissionForm { image: Some(image), ..form },
        FormEvent::ImageCleared => SubmissionForm { image: None, ..form },
        FormEvent::SlotChanged(slot) => SubmissionForm { slot, ..form },
        FormEvent::LevelIdChanged(level_id) => SubmissionForm {
            level_id,
            // an edited id invalidates whatever the last check said
            level: LevelStatus::Unknown,
            ..form
        },
        FormEvent::CheckIssued => SubmissionForm { check_seq: form.check_seq + 1, ..form },
        FormEvent::CheckResolved { seq, result } => {
            if seq == form.check_seq {
                SubmissionForm { level: result, ..form }
            } else {
                form
            }
        }
        FormEvent::Submitted => SubmissionForm::new(form.slot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::slot::Dimensions;

    fn image() -> CandidateImage {
        CandidateImage {
            bytes: vec![1, 2, 3],
            file_name: "ad.png".to_string(),
            dimensions: Some(Dimensions::new(1456, 180)),
        }
    }

    #[test]
    fn editing_the_level_id_resets_the_lookup_result() {
        let mut form = SubmissionForm::default();
        form = reduce(form, FormEvent::LevelIdChanged("500".to_string()));
        form = reduce(form, FormEvent::CheckIssued);
        form = reduce(
            form,
            FormEvent::CheckResolved {
                seq: 1,
                result: LevelStatus::Valid { name: "Stereo Madness".to_string() },
            },
        );
        assert!(form.level.is_valid());

        form = reduce(form, FormEvent::LevelIdChanged("501".to_string()));

        assert_eq!(form.level, LevelStatus::Unknown);
        assert_eq!(form.level_id, "501");
    }

    #[test]
    fn stale_check_responses_are_dropped() {
        let mut form = SubmissionForm::default();
        form = reduce(form, FormEvent::LevelIdChanged("500".to_string()));
        form = reduce(form, FormEvent::CheckIssued); // seq 1, slow
        form = reduce(form, FormEvent::CheckIssued); // seq 2, fast

        form = reduce(
            form,
            FormEvent::CheckResolved { seq: 2, result: LevelStatus::Invalid },
        );
        assert_eq!(form.level, LevelStatus::Invalid);

        // the slow first response arrives last and must not win
        form = reduce(
            form,
            FormEvent::CheckResolved {
                seq: 1,
                result: LevelStatus::Valid { name: "Old".to_string() },
            },
        );
        assert_eq!(form.level, LevelStatus::Invalid);
    }

    #[test]
    fn submitted_resets_everything_but_the_slot() {
        let mut form = SubmissionForm::new(AdSlot::Square);
        form = reduce(form, FormEvent::ImageSelected(image()));
        form = reduce(form, FormEvent::LevelIdChanged("500".to_string()));
        form = reduce(form, FormEvent::CheckIssued);
        form = reduce(
            form,
            FormEvent::CheckResolved {
                seq: 1,
                result: LevelStatus::Valid { name: String::new() },
            },
        );

        let cleared = reduce(form, FormEvent::Submitted);

        assert_eq!(cleared, SubmissionForm::new(AdSlot::Square));
    }

    #[test]
    fn clearing_the_image_keeps_the_rest() {
        let mut form = SubmissionForm::default();
        form = reduce(form, FormEvent::ImageSelected(image()));
        form = reduce(form, FormEvent::LevelIdChanged("500".to_string()));

        form = reduce(form, FormEvent::ImageCleared);

        assert!(form.image.is_none());
        assert_eq!(form.level_id, "500");
    }

    #[test]
    fn derived_file_name_prefixes_the_owner() {
        assert_eq!(SubmissionPayload::derive_file_name("123", "webp"), "123.webp");
    }
}
