//! Token cookie assembly.
//!
//! Both tokens travel as `HttpOnly` cookies whose `Max-Age` matches the
//! lifetime of the token they carry.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use authgate_core::config::{CookieConfig, SameSitePolicy};
use authgate_entity::token::{IssuedToken, SessionTokens};

/// Name of the cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
/// Name of the cookie carrying the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Builds a cookie carrying `issued`, expiring with it.
pub fn token_cookie(
    name: &'static str,
    issued: &IssuedToken,
    config: &CookieConfig,
) -> Cookie<'static> {
    let max_age = Duration::seconds(i64::try_from(issued.expires_in).unwrap_or(i64::MAX));
    build_cookie(name, issued.token.clone(), max_age, config)
}

/// Builds an empty, already expired cookie that makes the browser drop `name`.
pub fn removal_cookie(name: &'static str, config: &CookieConfig) -> Cookie<'static> {
    build_cookie(name, String::new(), Duration::ZERO, config)
}

/// Adds both token cookies to the jar.
pub fn with_session_cookies(
    jar: CookieJar,
    tokens: &SessionTokens,
    config: &CookieConfig,
) -> CookieJar {
    jar.add(token_cookie(ACCESS_TOKEN_COOKIE, &tokens.access_token, config))
        .add(token_cookie(REFRESH_TOKEN_COOKIE, &tokens.refresh_token, config))
}

/// Overwrites both token cookies with removal cookies.
pub fn clear_session_cookies(jar: CookieJar, config: &CookieConfig) -> CookieJar {
    jar.add(removal_cookie(ACCESS_TOKEN_COOKIE, config))
        .add(removal_cookie(REFRESH_TOKEN_COOKIE, config))
}

fn build_cookie(
    name: &'static str,
    value: String,
    max_age: Duration,
    config: &CookieConfig,
) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, value))
        .http_only(true)
        .secure(config.secure)
        .same_site(same_site(config.same_site))
        .path("/")
        .max_age(max_age)
        .build();

    if let Some(domain) = &config.domain {
        cookie.set_domain(domain.clone());
    }
    cookie
}

fn same_site(policy: SameSitePolicy) -> SameSite {
    match policy {
        SameSitePolicy::Strict => SameSite::Strict,
        SameSitePolicy::Lax => SameSite::Lax,
        SameSitePolicy::None => SameSite::None,
    }
}
