use std::sync::OnceLock;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use chirkut_types::api::{Ack, LoginRequest, LoginResponse, RegisterRequest};
use chirkut_types::models::PublicUser;

use crate::{AppState, ApiError, run_blocking};

/// Hash a password with Argon2id and a fresh salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Corrupt password hash in store: {}", e);
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hash checked when the username is unknown, so a miss costs the same
/// Argon2 work as a wrong password.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| {
        hash_password("chirkut-dummy-password").unwrap_or_else(|e| {
            warn!("Could not build dummy hash: {}", e);
            String::new()
        })
    })
}

pub async fn register(state: &AppState, req: RegisterRequest) -> Result<Response, ApiError> {
    let (Some(username), Some(full_name), Some(password)) =
        (req.username, req.full_name, req.password)
    else {
        return Err(ApiError::IncompleteData);
    };

    run_blocking(state, move |db| {
        let password_hash = hash_password(&password)?;
        if !db.create_user(&username, &full_name, &password_hash)? {
            return Err(ApiError::UsernameTaken);
        }
        info!("Registered user '{}'", username);
        Ok(())
    })
    .await?;

    Ok(Json(Ack::ok()).into_response())
}

pub async fn login(state: &AppState, req: LoginRequest) -> Result<Response, ApiError> {
    let user = run_blocking(state, move |db| {
        let Some(row) = db.get_user(&req.username)? else {
            verify_password(&req.password, dummy_hash());
            return Err(ApiError::InvalidCredentials);
        };

        if !verify_password(&req.password, &row.password) {
            return Err(ApiError::InvalidCredentials);
        }

        Ok(PublicUser {
            username: row.username,
            full_name: row.full_name,
            created_at: row.created_at,
        })
    })
    .await?;

    Ok(Json(LoginResponse {
        success: true,
        user,
    })
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("pw1").unwrap();
        assert_ne!(hash, "pw1");
        assert!(verify_password("pw1", &hash));
        assert!(!verify_password("pw2", &hash));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        assert_ne!(hash_password("pw1").unwrap(), hash_password("pw1").unwrap());
    }

    #[test]
    fn dummy_hash_is_real_and_stable() {
        let hash = dummy_hash();
        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordHash::new(hash).is_ok());
        assert_eq!(hash, dummy_hash());
        assert!(!verify_password("pw1", hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("pw1", "pw1"));
        assert!(!verify_password("", ""));
    }
}
