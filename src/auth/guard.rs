use actix_web::dev::Payload;
use actix_web::{http::header, web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

use super::{Identity, TokenService};
use crate::error::AppError;

/// Resolves the `Authorization` header value into the caller's identity.
///
/// Every failure (no header, a scheme other than `Bearer`, a bad signature, an
/// expired token, missing claims) collapses into `AppError::Unauthorized`.
pub fn current_identity(
    tokens: &TokenService,
    authorization: Option<&str>,
) -> Result<Identity, AppError> {
    let token = authorization
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            log::debug!("request without a bearer token");
            AppError::Unauthorized
        })?;

    Ok(tokens.verify(token)?)
}

/// Extractor for handlers that require an authenticated caller.
///
/// Reads the `TokenService` registered as app data and verifies the request's
/// bearer token with it.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(tokens) = req.app_data::<web::Data<TokenService>>() else {
            let err = AppError::InternalServerError("TokenService is not registered".to_string());
            return ready(Err(err.into()));
        };

        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        ready(
            current_identity(tokens, authorization)
                .map(CurrentUser)
                .map_err(ActixError::from),
        )
    }
}
