use crate::{
    auth::{authenticate, LoginForm, PasswordHasher, TokenResponse, TokenService},
    error::AppError,
    models::{CreateUserRequest, NewUser},
    store::Store,
};
use actix_web::{post, web, HttpResponse, Responder};
use chrono::Duration;
use validator::Validate;

/// Register a new user
///
/// Hashes the password, stores an active user and returns its profile.
///
/// ## Responses:
/// - `201 Created`: the new `User` (without its password hash).
/// - `400 Bad Request`: malformed body or a username that is already taken.
/// - `422 Unprocessable Entity`: field validation failed.
#[post("/create/user")]
pub async fn create_user(
    store: web::Data<dyn Store>,
    hasher: web::Data<PasswordHasher>,
    payload: web::Json<CreateUserRequest>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let request = payload.into_inner();

    let hasher = hasher.into_inner();
    let password = request.password.clone();
    let hashed_password = web::block(move || hasher.hash(&password)).await??;

    let user = store
        .create_user(NewUser::from_request(request, hashed_password))
        .await?;
    log::info!("registered user {} (id {})", user.username, user.id);

    Ok(HttpResponse::Created().json(user))
}

/// Exchange a username and password for a bearer token
///
/// Expects an `application/x-www-form-urlencoded` body with `username` and `password`.
///
/// ## Responses:
/// - `200 OK`: `{"token": "..."}`, valid for the configured login lifetime.
/// - `401 Unauthorized`: unknown user or wrong password, indistinguishably.
#[post("/token")]
pub async fn login_for_access_token(
    store: web::Data<dyn Store>,
    hasher: web::Data<PasswordHasher>,
    tokens: web::Data<TokenService>,
    ttl: web::Data<LoginTokenTtl>,
    form: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    let user = authenticate(store.get_ref(), &hasher, &form.username, &form.password)
        .await?
        .ok_or_else(|| {
            log::debug!("failed login for {}", form.username);
            AppError::Unauthorized
        })?;

    let token = tokens.issue(&user.username, user.id, Some(ttl.0))?;

    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// Lifetime of tokens issued by the login endpoint, registered as app data.
#[derive(Debug, Clone, Copy)]
pub struct LoginTokenTtl(pub Duration);

impl Default for LoginTokenTtl {
    fn default() -> Self {
        Self(Duration::minutes(crate::auth::LOGIN_TOKEN_TTL_MINUTES))
    }
}
