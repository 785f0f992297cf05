//! PostgreSQL-backed stores.
//!
//! These run against the database named by `AUTHGATE_TEST_DATABASE_URL` and
//! are skipped when it is unset.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use authgate_auth::{
    NewRegistration, PgRefreshTokenStore, PgUserStore, RefreshTokenStore, SessionService,
    UserStore,
};
use authgate_core::config::{DatabaseConfig, StoreProvider};
use authgate_core::error::ErrorKind;
use authgate_database::DatabasePool;
use authgate_database::migration::run_migrations;
use authgate_database::repositories::{RefreshTokenRepository, UserRepository};
use authgate_entity::user::{NewUser, UserRole};

use crate::helpers::test_config;

struct PgStores {
    users: Arc<PgUserStore>,
    refresh_tokens: Arc<PgRefreshTokenStore>,
}

async fn pg_stores() -> Option<PgStores> {
    let Ok(url) = std::env::var("AUTHGATE_TEST_DATABASE_URL") else {
        eprintln!("AUTHGATE_TEST_DATABASE_URL not set, skipping");
        return None;
    };

    let config = DatabaseConfig {
        provider: StoreProvider::Postgres,
        url,
        max_connections: 10,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    let db = DatabasePool::connect(&config)
        .await
        .expect("Failed to connect to test database");
    run_migrations(db.pool())
        .await
        .expect("Failed to run migrations");

    Some(PgStores {
        users: Arc::new(PgUserStore::new(UserRepository::new(db.pool().clone()))),
        refresh_tokens: Arc::new(PgRefreshTokenStore::new(RefreshTokenRepository::new(
            db.pool().clone(),
        ))),
    })
}

fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4().simple())
}

async fn create_user(stores: &PgStores, email: &str) -> Uuid {
    stores
        .users
        .create(NewUser {
            first_name: "Sameer".to_string(),
            last_name: "Kumar".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: UserRole::Customer,
        })
        .await
        .expect("Failed to create user")
        .id
}

#[tokio::test]
async fn test_pg_case_variant_email_is_duplicate() {
    let Some(stores) = pg_stores().await else {
        return;
    };
    let email = unique_email();
    let user_id = create_user(&stores, &email).await;

    let err = stores
        .users
        .create(NewUser {
            first_name: "Other".to_string(),
            last_name: "Person".to_string(),
            email: email.to_uppercase(),
            password_hash: "$argon2id$stub".to_string(),
            role: UserRole::Customer,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateUser);

    let found = stores
        .users
        .find_by_email(&email.to_uppercase())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user_id);
}

#[tokio::test]
async fn test_pg_consume_has_single_winner() {
    let Some(stores) = pg_stores().await else {
        return;
    };
    let user_id = create_user(&stores, &unique_email()).await;
    let token_id = Uuid::new_v4();
    stores
        .refresh_tokens
        .save(token_id, user_id, Utc::now() + Duration::days(1))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = stores.refresh_tokens.clone();
        handles.push(tokio::spawn(async move { store.consume(token_id).await }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_some() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);

    let record = stores.refresh_tokens.find(token_id).await.unwrap().unwrap();
    assert!(record.revoked);
    assert!(record.revoked_at.is_some());
}

#[tokio::test]
async fn test_pg_consume_skips_expired_and_revoked() {
    let Some(stores) = pg_stores().await else {
        return;
    };
    let user_id = create_user(&stores, &unique_email()).await;

    let expired = Uuid::new_v4();
    stores
        .refresh_tokens
        .save(expired, user_id, Utc::now() - Duration::seconds(1))
        .await
        .unwrap();
    assert!(stores.refresh_tokens.consume(expired).await.unwrap().is_none());
    assert!(stores.refresh_tokens.find_active(expired).await.unwrap().is_none());
    assert!(!stores.refresh_tokens.find(expired).await.unwrap().unwrap().revoked);

    let revoked = Uuid::new_v4();
    stores
        .refresh_tokens
        .save(revoked, user_id, Utc::now() + Duration::days(1))
        .await
        .unwrap();
    stores.refresh_tokens.revoke(revoked).await.unwrap();
    assert!(stores.refresh_tokens.consume(revoked).await.unwrap().is_none());
    assert!(stores.refresh_tokens.consume(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_pg_revoke_is_idempotent() {
    let Some(stores) = pg_stores().await else {
        return;
    };
    let user_id = create_user(&stores, &unique_email()).await;
    let token_id = Uuid::new_v4();
    stores
        .refresh_tokens
        .save(token_id, user_id, Utc::now() + Duration::days(1))
        .await
        .unwrap();

    stores.refresh_tokens.revoke(token_id).await.unwrap();
    let first = stores.refresh_tokens.find(token_id).await.unwrap().unwrap();
    stores.refresh_tokens.revoke(token_id).await.unwrap();
    let second = stores.refresh_tokens.find(token_id).await.unwrap().unwrap();

    assert!(second.revoked);
    assert_eq!(first.revoked_at, second.revoked_at);
    stores.refresh_tokens.revoke(Uuid::new_v4()).await.unwrap();
}

#[tokio::test]
async fn test_pg_active_count_and_revoke_all() {
    let Some(stores) = pg_stores().await else {
        return;
    };
    let user_id = create_user(&stores, &unique_email()).await;
    let live = Utc::now() + Duration::days(1);

    for _ in 0..3 {
        stores
            .refresh_tokens
            .save(Uuid::new_v4(), user_id, live)
            .await
            .unwrap();
    }
    stores
        .refresh_tokens
        .save(Uuid::new_v4(), user_id, Utc::now() - Duration::seconds(1))
        .await
        .unwrap();
    let revoked = Uuid::new_v4();
    stores.refresh_tokens.save(revoked, user_id, live).await.unwrap();
    stores.refresh_tokens.revoke(revoked).await.unwrap();

    assert_eq!(stores.refresh_tokens.count_active_for_user(user_id).await.unwrap(), 3);

    // The expired record is unrevoked and is revoked along with the live ones.
    assert_eq!(stores.refresh_tokens.revoke_all_for_user(user_id).await.unwrap(), 4);
    assert_eq!(stores.refresh_tokens.count_active_for_user(user_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_pg_concurrent_refresh_through_service() {
    let Some(stores) = pg_stores().await else {
        return;
    };
    let email = unique_email();
    let service = SessionService::from_config(
        &test_config().auth,
        stores.users.clone(),
        stores.refresh_tokens.clone(),
    )
    .unwrap();
    let user = service
        .register(NewRegistration {
            first_name: "Sameer".to_string(),
            last_name: "Kumar".to_string(),
            email: email.clone(),
            password: "S3cret!pw".to_string(),
        })
        .await
        .unwrap();
    let login = service.login(&email, "S3cret!pw").await.unwrap();
    let presented = login.tokens.refresh_token.token;

    let (a, b) = tokio::join!(service.refresh(&presented), service.refresh(&presented));
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    let loser = if a.is_err() { a } else { b };
    assert_eq!(loser.unwrap_err().kind, ErrorKind::InvalidSession);
    assert_eq!(
        stores.refresh_tokens.count_active_for_user(user.id).await.unwrap(),
        1
    );
}
