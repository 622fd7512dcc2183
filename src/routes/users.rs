use crate::{
    auth::{
        AuthMiddleware, AuthResponse, AuthenticatedUserId, LoginRequest, PasswordHasher,
        RegisterRequest, TokenService,
    },
    error::AppError,
    models::{NewUser, UserSummary},
    store::Store,
};
use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Hashes the password, stores the account and returns its public summary.
/// A taken email or username is a `400 Bad Request`.
#[post("/register")]
pub async fn register(
    store: web::Data<dyn Store>,
    hasher: web::Data<PasswordHasher>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let RegisterRequest {
        username,
        email,
        password,
    } = register_data.into_inner();

    if store.find_user_by_email(&email).await?.is_some()
        || store.find_user_by_username(&username).await?.is_some()
    {
        return Err(AppError::BadRequest("User already exists".into()));
    }

    let password_hash = hasher.hash(&password)?;
    let user = store
        .create_user(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    log::info!("Registered user {} ({})", user.username, user.id);
    Ok(HttpResponse::Ok().json(UserSummary::from(user)))
}

/// Login user
///
/// Checks the credentials and returns a signed token. Unknown email and wrong
/// password produce the same `401` response.
#[post("/login")]
pub async fn login(
    store: web::Data<dyn Store>,
    hasher: web::Data<PasswordHasher>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = store.find_user_by_email(&login_data.email).await?;
    match user {
        Some(user) if hasher.verify(&login_data.password, &user.password_hash) => {
            let token = tokens.issue(user.id)?;
            log::info!("User {} logged in", user.id);
            Ok(HttpResponse::Ok().json(AuthResponse { token }))
        }
        _ => {
            log::warn!("Failed login attempt for {}", login_data.email);
            Err(AppError::Unauthorized("Invalid credentials".into()))
        }
    }
}

/// Logout user
///
/// Tokens are not tracked server-side, so this only confirms the token is valid;
/// the client is expected to discard it.
#[post("/logout", wrap = "AuthMiddleware")]
pub async fn logout(user: AuthenticatedUserId) -> impl Responder {
    log::info!("User {} logged out", user.0);
    HttpResponse::Ok().json(json!({ "message": "Logged out successfully" }))
}
