use actix_multipart::form::MultipartForm;
use actix_web::{error::ResponseError, web, HttpResponse, Responder};
use chrono::Utc;
use tracing::{error, warn};
use validator::Validate;

use crate::{
    entities::{
        account::AdQuota,
        level::LevelIdField,
        slot::AdSlot,
        submission::{reduce, AdUploadForm, FormEvent, SubmissionForm},
    },
    errors::AppError,
    interfaces::clients::backend::AdBackend,
    media::codec,
    use_cases::extractors::SessionCookie,
    AppState,
};

pub async fn submit_ad(
    state: web::Data<AppState>,
    session: SessionCookie,
    form_input: Result<MultipartForm<AdUploadForm>, actix_web::Error>,
) -> impl Responder {
    let upload = match form_input {
        Ok(form) => form.into_inner(),
        Err(e) => {
            return AppError::BadRequest(format!("Malformed multipart submission: {e}"))
                .to_http_response();
        }
    };

    let slot = match upload.slot.trim().parse::<AdSlot>() {
        Ok(slot) => slot,
        Err(e) => return AppError::BadRequest(e.to_string()).to_http_response(),
    };

    let fields = LevelIdField { level_id: upload.level_id.into_inner() };
    if let Err(err) = fields.validate() {
        return AppError::from(err).to_http_response();
    }

    let candidate = match upload.image {
        Some(file) => {
            let file_name = file.file_name.clone().unwrap_or_default();
            let bytes = match tokio::fs::read(file.file.path()).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    error!("Failed to read uploaded file: {}", e);
                    return AppError::InternalError("Failed to read uploaded image".to_string())
                        .to_http_response();
                }
            };

            // Full image decode is CPU-bound; keep it off the async pool.
            match tokio::task::spawn_blocking(move || codec::decode_candidate(bytes, file_name))
                .await
            {
                Ok(candidate) => Some(candidate),
                Err(e) => {
                    error!("Image decode task failed: {}", e);
                    return AppError::InternalError("Failed to decode uploaded image".to_string())
                        .to_http_response();
                }
            }
        }
        None => None,
    };

    // Drive the form through the reducer the same way the dashboard does.
    // Whatever the client believed about its level id is not trusted; the
    // check runs here, against the directory, on every submission.
    let mut form = SubmissionForm::new(slot);
    if let Some(candidate) = candidate {
        form = reduce(form, FormEvent::ImageSelected(candidate));
    }
    form = reduce(form, FormEvent::LevelIdChanged(fields.level_id.clone()));
    if form.image.is_some() {
        form = reduce(form, FormEvent::CheckIssued);
        let seq = form.check_seq;
        let result = state.submit_handler.check_level(&fields.level_id).await;
        form = reduce(form, FormEvent::CheckResolved { seq, result });
    }

    let cookie = session.0.unwrap_or_default();
    let account = if cookie.is_empty() {
        None
    } else {
        match state.submit_handler.backend.fetch_session(&cookie).await {
            Ok(account) => account,
            Err(e) => {
                // same outcome as the dashboard's failed session poll: the
                // caller is treated as logged out
                warn!("Session lookup failed: {}", e);
                None
            }
        }
    };

    let quota = match &account {
        Some(account) => {
            match state.submit_handler.backend.fetch_owned_ads(&cookie).await {
                Ok(ads) => AdQuota::evaluate(account, &ads, Utc::now()),
                Err(e) => {
                    error!("Could not fetch ads for user {}: {}", account.id, e);
                    return crate::errors::SubmitError::Backend(e).error_response();
                }
            }
        }
        None => AdQuota::default(),
    };

    match state
        .submit_handler
        .submit(&form, account.as_ref(), &quota, &cookie)
        .await
    {
        Ok(ack) => HttpResponse::Ok().json(ack),
        Err(e) => e.error_response(),
    }
}
