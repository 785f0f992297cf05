//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_extra::extract::cookie::Cookie;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use authgate_api::{AppState, build_app};
use authgate_auth::{MemoryRefreshTokenStore, MemoryUserStore, RefreshTokenStore, SessionService};
use authgate_core::config::{AppConfig, StoreProvider};

pub const EMAIL: &str = "sameer@example.com";
pub const PASSWORD: &str = "S3cret!pw";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Refresh token store for direct inspection
    pub refresh_tokens: Arc<MemoryRefreshTokenStore>,
}

/// A captured response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub cookies: Vec<Cookie<'static>>,
}

impl TestResponse {
    /// Returns the `Set-Cookie` entry with the given name.
    pub fn cookie(&self, name: &str) -> Option<&Cookie<'static>> {
        self.cookies.iter().find(|c| c.name() == name)
    }

    /// Returns the value of the given cookie, panicking if absent.
    pub fn cookie_value(&self, name: &str) -> String {
        self.cookie(name)
            .unwrap_or_else(|| panic!("response did not set cookie {name}"))
            .value()
            .to_string()
    }

    /// Returns the `type` of the first error in the envelope.
    pub fn error_type(&self) -> &str {
        self.body["errors"][0]["type"].as_str().unwrap_or_default()
    }

    /// Returns the `id` field of the body.
    pub fn id(&self) -> Uuid {
        self.body["id"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("response body has no id")
    }
}

/// Configuration with in-memory stores and cheap hashing.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.provider = StoreProvider::Memory;
    config.auth.access_token_secret = "integration-access-secret".to_string();
    config.auth.refresh_token_secret = "integration-refresh-secret".to_string();
    config.auth.argon2_memory_kib = 8;
    config.auth.argon2_iterations = 1;
    config.auth.argon2_parallelism = 1;
    config
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application from an explicit configuration
    pub fn with_config(config: AppConfig) -> Self {
        let refresh_tokens = Arc::new(MemoryRefreshTokenStore::new());
        let session_service = SessionService::from_config(
            &config.auth,
            Arc::new(MemoryUserStore::new()),
            refresh_tokens.clone(),
        )
        .expect("Failed to build session service");

        let state = AppState::new(Arc::new(config), Arc::new(session_service));

        Self {
            router: build_app(state),
            refresh_tokens,
        }
    }

    /// Send a request with an optional JSON body and cookies
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookies: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);

        if !cookies.is_empty() {
            let header_value = cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, header_value);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| Cookie::parse(value.to_owned()).ok())
            .collect();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            body,
            cookies,
        }
    }

    /// Register the default test user and return their ID
    pub async fn register_default_user(&self) -> Uuid {
        let response = self
            .request(
                "POST",
                "/auth/register",
                Some(serde_json::json!({
                    "firstName": "sameer",
                    "lastName": "kumar",
                    "email": EMAIL,
                    "password": PASSWORD,
                })),
                &[],
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.id()
    }

    /// Log the default test user in
    pub async fn login_default_user(&self) -> TestResponse {
        let response = self
            .request(
                "POST",
                "/auth/login",
                Some(serde_json::json!({ "email": EMAIL, "password": PASSWORD })),
                &[],
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response
    }

    /// Count live refresh records of a user
    pub async fn active_refresh_tokens(&self, user_id: Uuid) -> u64 {
        self.refresh_tokens
            .count_active_for_user(user_id)
            .await
            .expect("Failed to count refresh tokens")
    }
}
