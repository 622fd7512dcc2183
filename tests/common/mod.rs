#![allow(dead_code)]

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    middleware::Logger,
    test, web, App, Error,
};
use chrono::Duration;
use serde_json::json;
use std::sync::Arc;
use tasktrack::auth::{AuthResponse, PasswordHasher, TokenService, AUTH_HEADER};
use tasktrack::models::UserSummary;
use tasktrack::routes::{self, health};
use tasktrack::store::{MemoryStore, Store};

pub const TEST_SECRET: &[u8] = b"integration_test_secret";

/// Lowest cost bcrypt accepts; keeps the suite fast.
pub const TEST_BCRYPT_COST: u32 = 4;

pub struct TestUser {
    pub id: uuid::Uuid,
    pub token: String,
}

pub fn memory_store() -> web::Data<dyn Store> {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    web::Data::from(store)
}

pub fn token_service() -> web::Data<TokenService> {
    web::Data::new(TokenService::new(TEST_SECRET, Duration::hours(24)))
}

pub fn password_hasher() -> web::Data<PasswordHasher> {
    web::Data::new(PasswordHasher::new(TEST_BCRYPT_COST))
}

/// Full application over a fresh in-memory store.
pub async fn init_app(
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .app_data(memory_store())
            .app_data(token_service())
            .app_data(password_hasher())
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config)),
    )
    .await
}

pub async fn register_user(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    username: &str,
    email: &str,
    password: &str,
) -> UserSummary {
    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(json!({
            "username": username,
            "email": email,
            "password": password
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert!(
        status.is_success(),
        "Failed to register {}. Status: {}. Body: {}",
        username,
        status,
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("Failed to parse registration response")
}

pub async fn login_user(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    email: &str,
    password: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/users/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert!(
        status.is_success(),
        "Failed to log in {}. Status: {}. Body: {}",
        email,
        status,
        String::from_utf8_lossy(&body)
    );
    let auth: AuthResponse = serde_json::from_slice(&body).expect("Failed to parse login response");
    auth.token
}

pub async fn register_and_login_user(
    app: &impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error>,
    username: &str,
    email: &str,
    password: &str,
) -> TestUser {
    let summary = register_user(app, username, email, password).await;
    let token = login_user(app, email, password).await;
    TestUser {
        id: summary.id,
        token,
    }
}

pub fn auth_header(token: &str) -> (&'static str, String) {
    (AUTH_HEADER, token.to_string())
}
