use axum::{
    Router,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::{Method, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::debug;

use chirkut_types::api::Action;

use crate::{AppState, ApiError, auth, messages, profile};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActionQuery {
    pub action: String,
    /// Only read by `get_messages`.
    pub username: String,
}

/// The single endpoint. Routes on `?action=` and always answers 200 with a
/// JSON envelope.
pub async fn dispatch(
    State(state): State<AppState>,
    query: Result<Query<ActionQuery>, QueryRejection>,
    body: Bytes,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(e) => {
            debug!("Unreadable query string: {}", e);
            return ApiError::InvalidAction.into_response();
        }
    };

    let action: Action = match query.action.parse() {
        Ok(action) => action,
        Err(e) => {
            debug!("{}", e);
            return ApiError::InvalidAction.into_response();
        }
    };

    let result = match action {
        Action::Register => auth::register(&state, read_body(&body)).await,
        Action::Login => auth::login(&state, read_body(&body)).await,
        Action::SendMessage => messages::send_message(&state, read_body(&body)).await,
        Action::GetMessages => messages::get_messages(&state, query.username).await,
        Action::DeleteMessage => messages::delete_message(&state, read_body(&body)).await,
        Action::UpdateProfile => profile::update_profile(&state, read_body(&body)).await,
    };

    result.unwrap_or_else(IntoResponse::into_response)
}

/// An empty or malformed body reads as `{}`.
fn read_body<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    if body.is_empty() {
        return T::default();
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        debug!("Ignoring unreadable body: {}", e);
        T::default()
    })
}

pub fn router(state: AppState) -> Router {
    // Fully open, as browsers post from wherever the profile link was shared
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api", get(dispatch).post(dispatch))
        .route("/api.php", get(dispatch).post(dispatch))
        .layer(cors)
        .with_state(state)
}
