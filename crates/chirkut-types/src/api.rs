use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::models::PublicUser;

// -- Actions --

/// The six operations the single endpoint dispatches on, selected by the
/// `action` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Register,
    Login,
    SendMessage,
    GetMessages,
    DeleteMessage,
    UpdateProfile,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Register,
        Action::Login,
        Action::SendMessage,
        Action::GetMessages,
        Action::DeleteMessage,
        Action::UpdateProfile,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Register => "register",
            Action::Login => "login",
            Action::SendMessage => "send_message",
            Action::GetMessages => "get_messages",
            Action::DeleteMessage => "delete_message",
            Action::UpdateProfile => "update_profile",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

// -- Requests --

/// Fields are optional so the server can tell a missing field from an empty one.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SendMessageRequest {
    pub to: String,
    pub content: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DeleteMessageRequest {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
}

/// An empty or absent `password` keeps the stored one. An absent `fullName`
/// keeps the stored name.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: String,
    pub full_name: Option<String>,
    pub password: Option<String>,
}

/// Browser clients hand message ids back as strings; accept either form.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

// -- Responses --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: PublicUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Every action answers with either its success payload or `{"error": ...}`,
/// always with HTTP 200.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Failure(ErrorBody),
    Success(T),
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Envelope::Failure(body) => Err(body.error),
            Envelope::Success(payload) => Ok(payload),
        }
    }
}
