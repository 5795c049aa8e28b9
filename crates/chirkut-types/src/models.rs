use serde::{Deserialize, Serialize};

/// Profile fields a client is allowed to see. This is also the record the
/// client keeps as its session, so it never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub username: String,
    pub full_name: String,
    pub created_at: String,
}

/// One inbox entry as it travels over the wire.
/// `timestamp` is the store's `YYYY-MM-DD HH:MM:SS` UTC text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxMessage {
    pub id: i64,
    pub content: String,
    pub timestamp: String,
    pub is_read: bool,
}
