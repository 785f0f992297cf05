//! Session lifecycle service.
//!
//! A login moves a user from unauthenticated to authenticated and persists
//! one refresh record. Each refresh revokes the presented record and persists
//! a successor. Logout revokes. A revoked record is never accepted again.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use authgate_core::config::AuthConfig;
use authgate_core::error::AppError;
use authgate_entity::token::{IssuedToken, SessionTokens};
use authgate_entity::user::{NewUser, User, UserRole};

use crate::jwt::{AccessClaims, JwtDecoder, JwtEncoder};
use crate::password::PasswordHasher;
use crate::store::RefreshTokenStore;
use crate::users::UserStore;

/// Input for account registration. Fields are expected to be validated.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Plaintext password. Hashed before anything is persisted.
    pub password: String,
}

/// Result of a successful login or refresh.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The authenticated user.
    pub user_id: Uuid,
    /// The freshly minted token pair.
    pub tokens: SessionTokens,
}

/// Orchestrates credential checks and the refresh token lifecycle.
#[derive(Clone)]
pub struct SessionService {
    /// JWT encoder for token generation.
    jwt_encoder: Arc<JwtEncoder>,
    /// JWT decoder for token validation.
    jwt_decoder: Arc<JwtDecoder>,
    /// Password hasher.
    password_hasher: Arc<PasswordHasher>,
    /// User persistence.
    users: Arc<dyn UserStore>,
    /// Refresh token persistence.
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    /// Auth configuration.
    auth_config: AuthConfig,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("users", &self.users)
            .field("refresh_tokens", &self.refresh_tokens)
            .field("revoke_all_on_reuse", &self.auth_config.revoke_all_on_reuse)
            .finish()
    }
}

impl SessionService {
    /// Creates a session service from already constructed components.
    pub fn new(
        jwt_encoder: Arc<JwtEncoder>,
        jwt_decoder: Arc<JwtDecoder>,
        password_hasher: Arc<PasswordHasher>,
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        auth_config: AuthConfig,
    ) -> Self {
        Self {
            jwt_encoder,
            jwt_decoder,
            password_hasher,
            users,
            refresh_tokens,
            auth_config,
        }
    }

    /// Builds the token and hashing components from configuration.
    ///
    /// Fails with a `Configuration` error on an empty signing secret or
    /// invalid Argon2 parameters.
    pub fn from_config(
        auth_config: &AuthConfig,
        users: Arc<dyn UserStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
    ) -> Result<Self, AppError> {
        Ok(Self::new(
            Arc::new(JwtEncoder::new(auth_config)?),
            Arc::new(JwtDecoder::new(auth_config)),
            Arc::new(PasswordHasher::new(auth_config)?),
            users,
            refresh_tokens,
            auth_config.clone(),
        ))
    }

    /// Performs the one-off hashing work so the first login pays no extra cost.
    pub async fn warm_up(&self) -> Result<(), AppError> {
        self.password_hasher.prepare_dummy().await
    }

    /// Registers a new account with the default role.
    pub async fn register(&self, registration: NewRegistration) -> Result<User, AppError> {
        let password_hash = self.password_hasher.hash(&registration.password).await?;

        let user = self
            .users
            .create(NewUser {
                first_name: registration.first_name,
                last_name: registration.last_name,
                email: registration.email,
                password_hash,
                role: UserRole::default(),
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Checks credentials and opens a session.
    ///
    /// An unknown email and a wrong password fail identically, after an
    /// equally expensive hash verification.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            self.password_hasher.verify_dummy(password).await?;
            debug!("Login rejected: unknown email");
            return Err(AppError::invalid_credentials());
        };

        if !self
            .password_hasher
            .verify(password, &user.password_hash)
            .await?
        {
            debug!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(AppError::invalid_credentials());
        }

        let access_token = self.jwt_encoder.issue_access(user.id, user.role)?;
        let (refresh_token, refresh_token_id) = self.mint_refresh(user.id).await?;

        info!(user_id = %user.id, "Login successful");
        Ok(LoginOutcome {
            user_id: user.id,
            tokens: SessionTokens {
                access_token,
                refresh_token,
                refresh_token_id,
            },
        })
    }

    /// Exchanges a refresh token for a new pair, revoking the presented one.
    ///
    /// The presented record is revoked before its successor is written, so a
    /// failure after that point leaves the user logged out rather than
    /// holding two live tokens.
    pub async fn refresh(&self, presented: &str) -> Result<LoginOutcome, AppError> {
        let claims = self.jwt_decoder.verify_refresh(presented).map_err(|e| {
            debug!(error = %e, "Refresh rejected: token failed verification");
            AppError::invalid_session()
        })?;

        let Some(record) = self.refresh_tokens.consume(claims.jti).await? else {
            if let Err(e) = self.inspect_rejected(claims.jti).await {
                error!(
                    token_id = %claims.jti,
                    error = %e,
                    "Failed to inspect rejected refresh token"
                );
            }
            return Err(AppError::invalid_session());
        };

        if record.user_id != claims.sub {
            warn!(
                token_id = %record.id,
                user_id = %record.user_id,
                "Refresh token subject does not match its record"
            );
            return Err(AppError::invalid_session());
        }

        let Some(user) = self.users.find_by_id(record.user_id).await? else {
            debug!(user_id = %record.user_id, "Refresh rejected: user no longer exists");
            return Err(AppError::invalid_session());
        };

        let (refresh_token, refresh_token_id) = self.mint_refresh(user.id).await?;
        let access_token = self.jwt_encoder.issue_access(user.id, user.role)?;

        info!(
            user_id = %user.id,
            previous_token_id = %record.id,
            token_id = %refresh_token_id,
            "Refresh token rotated"
        );
        Ok(LoginOutcome {
            user_id: user.id,
            tokens: SessionTokens {
                access_token,
                refresh_token,
                refresh_token_id,
            },
        })
    }

    /// Revokes a refresh record. Unknown or already revoked IDs succeed.
    pub async fn logout(&self, token_id: Uuid) -> Result<(), AppError> {
        self.refresh_tokens.revoke(token_id).await?;
        info!(token_id = %token_id, "Session logged out");
        Ok(())
    }

    /// Revokes the record behind a presented refresh token.
    ///
    /// A token that fails verification has nothing to revoke and succeeds.
    pub async fn logout_presented(&self, presented: &str) -> Result<(), AppError> {
        match self.jwt_decoder.verify_refresh(presented) {
            Ok(claims) => self.logout(claims.jti).await,
            Err(e) => {
                debug!(error = %e, "Logout with unverifiable refresh token");
                Ok(())
            }
        }
    }

    /// Verifies an access token.
    pub fn authenticate(&self, access_token: &str) -> Result<AccessClaims, AppError> {
        self.jwt_decoder
            .verify_access(access_token)
            .map_err(AppError::from)
    }

    /// Loads the user behind an authenticated request.
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    async fn mint_refresh(&self, user_id: Uuid) -> Result<(IssuedToken, Uuid), AppError> {
        let (issued, token_id) = self.jwt_encoder.issue_refresh(user_id)?;
        self.refresh_tokens
            .save(token_id, user_id, issued.expires_at)
            .await?;
        Ok((issued, token_id))
    }

    // A verified token whose record is already revoked has been replayed.
    async fn inspect_rejected(&self, token_id: Uuid) -> Result<(), AppError> {
        match self.refresh_tokens.find(token_id).await? {
            Some(record) if record.revoked => {
                warn!(
                    user_id = %record.user_id,
                    token_id = %token_id,
                    "refresh token reuse detected"
                );
                if self.auth_config.revoke_all_on_reuse {
                    let revoked = self
                        .refresh_tokens
                        .revoke_all_for_user(record.user_id)
                        .await?;
                    warn!(
                        user_id = %record.user_id,
                        revoked,
                        "Revoked all refresh tokens after reuse"
                    );
                }
            }
            Some(_) => debug!(token_id = %token_id, "Refresh rejected: record expired"),
            None => debug!(token_id = %token_id, "Refresh rejected: unknown record"),
        }
        Ok(())
    }
}
