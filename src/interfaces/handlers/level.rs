use actix_web::{web, HttpResponse, Responder};
use tracing::debug;
use validator::Validate;

use crate::{entities::level::LevelIdField, errors::AppError, AppState};

/// Resolve a level id for the dashboard's "Check" button.
///
/// Takes the same form-encoded body the dashboard already sends and returns
/// the result as explicit JSON instead of the raw lookup text.
pub async fn check_level(
    state: web::Data<AppState>,
    form: web::Form<LevelIdField>,
) -> impl Responder {
    let request = form.into_inner();

    if let Err(err) = request.validate() {
        return AppError::from(err).to_http_response();
    }

    let status = state.submit_handler.check_level(&request.level_id).await;
    debug!("Level check for '{}': {:?}", request.level_id, status);

    HttpResponse::Ok().json(status)
}
