/// Database row types. These map directly to SQLite rows and stay distinct
/// from the wire types in chirkut-types.

pub struct UserRow {
    pub username: String,
    pub full_name: String,
    /// Argon2 PHC string, never the plaintext.
    pub password: String,
    pub created_at: String,
}

pub struct MessageRow {
    pub id: i64,
    pub target_username: String,
    pub content: String,
    pub created_at: String,
    pub is_read: bool,
}
