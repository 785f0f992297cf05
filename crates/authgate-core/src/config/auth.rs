//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token signing, token lifetime, and password hashing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC-SHA256 secret used to sign access tokens.
    #[serde(default = "default_access_secret")]
    pub access_token_secret: String,
    /// HMAC-SHA256 secret used to sign refresh tokens.
    #[serde(default = "default_refresh_secret")]
    pub refresh_token_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_days: u64,
    /// Value of the `iss` claim on issued tokens.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_argon2_memory")]
    pub argon2_memory_kib: u32,
    /// Argon2 iteration count.
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    /// Argon2 degree of parallelism.
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
    /// Upper bound on a single hash or verify call, in seconds.
    #[serde(default = "default_hashing_timeout")]
    pub hashing_timeout_seconds: u64,
    /// Revoke every live refresh token of a user when one of their rotated
    /// tokens is presented again.
    #[serde(default)]
    pub revoke_all_on_reuse: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: default_access_secret(),
            refresh_token_secret: default_refresh_secret(),
            access_token_ttl_minutes: default_access_ttl(),
            refresh_token_ttl_days: default_refresh_ttl(),
            issuer: default_issuer(),
            argon2_memory_kib: default_argon2_memory(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            hashing_timeout_seconds: default_hashing_timeout(),
            revoke_all_on_reuse: false,
        }
    }
}

fn default_access_secret() -> String {
    "CHANGE_ME_ACCESS_SECRET".to_string()
}

fn default_refresh_secret() -> String {
    "CHANGE_ME_REFRESH_SECRET".to_string()
}

fn default_access_ttl() -> u64 {
    60
}

fn default_refresh_ttl() -> u64 {
    365
}

fn default_issuer() -> String {
    "auth-service".to_string()
}

// OWASP baseline for Argon2id: m=19 MiB, t=2, p=1.
fn default_argon2_memory() -> u32 {
    19_456
}

fn default_argon2_iterations() -> u32 {
    2
}

fn default_argon2_parallelism() -> u32 {
    1
}

fn default_hashing_timeout() -> u64 {
    10
}
