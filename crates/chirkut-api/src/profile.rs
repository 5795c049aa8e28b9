use axum::{
    Json,
    response::{IntoResponse, Response},
};
use tracing::debug;

use chirkut_types::api::{Ack, UpdateProfileRequest};

use crate::auth::hash_password;
use crate::{AppState, ApiError, run_blocking};

/// The full name is always written when present. The password only changes
/// when a non-empty replacement is given; empty means keep the current one.
pub async fn update_profile(
    state: &AppState,
    req: UpdateProfileRequest,
) -> Result<Response, ApiError> {
    run_blocking(state, move |db| {
        let password_hash = match req.password.as_deref() {
            Some(password) if !password.is_empty() => Some(hash_password(password)?),
            _ => None,
        };

        let changed =
            db.update_profile(&req.username, req.full_name.as_deref(), password_hash.as_deref())?;
        debug!("Profile update for '{}' touched {} rows", req.username, changed);
        Ok(())
    })
    .await?;

    Ok(Json(Ack::ok()).into_response())
}
