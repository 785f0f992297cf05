//! Token cookie configuration.

use serde::{Deserialize, Serialize};

/// `SameSite` policy applied to the token cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    /// Never sent on cross-site requests.
    #[default]
    Strict,
    /// Sent on top-level cross-site navigations.
    Lax,
    /// Always sent; requires `secure`.
    None,
}

/// Attributes of the `accessToken` and `refreshToken` cookies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Emit the `Secure` attribute.
    #[serde(default = "default_true")]
    pub secure: bool,
    /// Optional `Domain` attribute.
    #[serde(default)]
    pub domain: Option<String>,
    /// `SameSite` attribute.
    #[serde(default)]
    pub same_site: SameSitePolicy,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: true,
            domain: None,
            same_site: SameSitePolicy::default(),
        }
    }
}

fn default_true() -> bool {
    true
}
