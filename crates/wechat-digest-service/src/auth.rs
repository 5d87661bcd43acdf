use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header::AUTHORIZATION, request::Parts};
use tracing::warn;

use crate::AppState;
use crate::errors::ApiError;

/// A configured credential. `Debug` never prints the value.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    /// Compares without short-circuiting on the first differing byte.
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

fn constant_time_eq(expected: &[u8], candidate: &[u8]) -> bool {
    if expected.len() != candidate.len() {
        return false;
    }
    expected
        .iter()
        .zip(candidate)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Admin writes are only allowed when an admin password is configured and presented.
#[derive(Debug)]
pub struct AdminAuth;

impl<S: AppState> FromRequestParts<S> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let presented = bearer_token(&parts.headers);
        match state.settings().admin_password.as_ref() {
            Some(secret) if presented.is_some_and(|token| secret.matches(token)) => Ok(AdminAuth),
            Some(_) => {
                warn!(path = %parts.uri.path(), "Rejected admin request with bad credentials");
                Err(ApiError::Unauthorized)
            }
            None => {
                warn!(path = %parts.uri.path(), "Rejected admin request, no admin password configured");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

/// The ingestion trigger is open unless a cron secret is configured.
#[derive(Debug)]
pub struct CronAuth;

impl<S: AppState> FromRequestParts<S> for CronAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(secret) = state.settings().cron_secret.as_ref() else {
            return Ok(CronAuth);
        };

        if bearer_token(&parts.headers).is_some_and(|token| secret.matches(token)) {
            Ok(CronAuth)
        } else {
            warn!("Rejected ingestion trigger with bad credentials");
            Err(ApiError::Unauthorized)
        }
    }
}
