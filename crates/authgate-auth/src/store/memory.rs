//! In-memory refresh token store using a Tokio mutex.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use authgate_core::error::AppError;
use authgate_entity::token::RefreshToken;

use super::RefreshTokenStore;

/// Refresh token store held in process memory.
///
/// Suitable for single-node deployments only. Contents are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryRefreshTokenStore {
    records: Arc<Mutex<HashMap<Uuid, RefreshToken>>>,
}

impl MemoryRefreshTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn save(
        &self,
        token_id: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, AppError> {
        let mut records = self.records.lock().await;
        if records.contains_key(&token_id) {
            return Err(AppError::persistence(format!(
                "Refresh token {token_id} already exists"
            )));
        }
        let record = RefreshToken::new(token_id, user_id, expires_at);
        records.insert(token_id, record.clone());
        Ok(record)
    }

    async fn find_active(&self, token_id: Uuid) -> Result<Option<RefreshToken>, AppError> {
        let now = Utc::now();
        let records = self.records.lock().await;
        Ok(records
            .get(&token_id)
            .filter(|record| record.is_active_at(now))
            .cloned())
    }

    async fn find(&self, token_id: Uuid) -> Result<Option<RefreshToken>, AppError> {
        Ok(self.records.lock().await.get(&token_id).cloned())
    }

    async fn consume(&self, token_id: Uuid) -> Result<Option<RefreshToken>, AppError> {
        let now = Utc::now();
        let mut records = self.records.lock().await;
        match records.get_mut(&token_id) {
            Some(record) if record.is_active_at(now) => {
                record.mark_revoked(now);
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn revoke(&self, token_id: Uuid) -> Result<(), AppError> {
        let now = Utc::now();
        if let Some(record) = self.records.lock().await.get_mut(&token_id) {
            record.mark_revoked(now);
        }
        Ok(())
    }

    async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        let now = Utc::now();
        let mut records = self.records.lock().await;
        let mut revoked = 0;
        for record in records.values_mut().filter(|record| record.user_id == user_id) {
            if record.mark_revoked(now) {
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn count_active_for_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        let now = Utc::now();
        let records = self.records.lock().await;
        let count = records
            .values()
            .filter(|record| record.user_id == user_id && record.is_active_at(now))
            .count();
        Ok(count as u64)
    }
}
