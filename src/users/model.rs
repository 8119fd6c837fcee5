use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User row as returned by every read path. There is deliberately no
/// password field here: reads select a fixed column allowlist and the
/// hash can never reach a caller.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,                    // assigned by the database
    pub username: String,           // unique, enforced by the schema
    pub email: String,
    pub updated_at: OffsetDateTime, // maintained by the database
    pub created_at: OffsetDateTime,
}

/// Payload for `UserRepository::create`. `password` is plaintext on the
/// way in and hashed before the insert is issued.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: Option<String>,
}

/// Partial update matched on `id`. Unset fields are left untouched;
/// a non-empty `password` is hashed before the write.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// Equality filters combined with AND. The default (empty) filter
/// matches every row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserFilter {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.username.is_none() && self.email.is_none()
    }
}
