use actix_web::{http::header, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

/// Extractor for the caller's raw cookie header.
///
/// The gateway never parses the cookie; it forwards it opaquely to the ads
/// backend, which owns the session. Absence is not rejected here — whether a
/// submission needs a session is decided by the pipeline, after the cheaper
/// form checks have run.
#[derive(Debug, Clone)]
pub struct SessionCookie(pub Option<String>);

impl FromRequest for SessionCookie {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let cookie = req
            .headers()
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_owned);

        ready(Ok(SessionCookie(cookie)))
    }
}
