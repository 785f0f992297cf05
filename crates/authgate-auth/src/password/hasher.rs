//! Argon2id password hashing and verification.
//!
//! Every hash and verify call runs on the blocking pool and is bounded by
//! the configured timeout.

use std::sync::Arc;
use std::time::Duration;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tokio::sync::OnceCell;

use authgate_core::config::AuthConfig;
use authgate_core::error::{AppError, ErrorKind};

/// Plaintext behind the dummy hash used for unknown emails.
const DUMMY_PASSWORD: &str = "authgate-dummy-password";

/// Handles password hashing and verification using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    /// Argon2 cost parameters.
    params: Params,
    /// Upper bound on a single hash or verify call.
    timeout: Duration,
    /// Hash compared against when the account does not exist.
    dummy_hash: Arc<OnceCell<String>>,
}

impl PasswordHasher {
    /// Creates a hasher from the configured Argon2 cost parameters.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let params = Params::new(
            config.argon2_memory_kib,
            config.argon2_iterations,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;

        Ok(Self {
            params,
            timeout: Duration::from_secs(config.hashing_timeout_seconds),
            dummy_hash: Arc::new(OnceCell::new()),
        })
    }

    /// Hashes a plaintext password using Argon2id with a random salt.
    pub async fn hash(&self, password: &str) -> Result<String, AppError> {
        let argon2 = self.argon2();
        let password = password.to_owned();

        self.run_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AppError::hashing(format!("Password hashing failed: {e}")))
        })
        .await
    }

    /// Verifies a plaintext password against a stored Argon2id hash.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let argon2 = self.argon2();
        let password = password.to_owned();
        let hash = hash.to_owned();

        self.run_blocking(move || {
            let parsed = PasswordHash::new(&hash)
                .map_err(|e| AppError::hashing(format!("Invalid password hash format: {e}")))?;

            match argon2.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(e) => Err(AppError::hashing(format!(
                    "Password verification failed: {e}"
                ))),
            }
        })
        .await
    }

    /// Runs a full verification against a throwaway hash and discards the
    /// outcome, so a lookup miss costs as much as a wrong password.
    pub async fn verify_dummy(&self, password: &str) -> Result<(), AppError> {
        let dummy = self.dummy_hash().await?;
        self.verify(password, dummy).await?;
        Ok(())
    }

    /// Computes the dummy hash ahead of the first unknown-email login.
    pub async fn prepare_dummy(&self) -> Result<(), AppError> {
        self.dummy_hash().await.map(|_| ())
    }

    async fn dummy_hash(&self) -> Result<&String, AppError> {
        self.dummy_hash
            .get_or_try_init(|| self.hash(DUMMY_PASSWORD))
            .await
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    async fn run_blocking<T, F>(&self, work: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, AppError> + Send + 'static,
    {
        match tokio::time::timeout(self.timeout, tokio::task::spawn_blocking(work)).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(AppError::with_source(
                ErrorKind::Hashing,
                "Password hashing task failed",
                e,
            )),
            Err(_) => Err(AppError::hashing("Password hashing timed out")),
        }
    }
}
