use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::password;

pub const DEFAULT_ROLE: &str = "user";

/// Column widths of the `users` table, in characters.
pub const USERNAME_MAX: usize = 50;
pub const NAME_MAX: usize = 100;
pub const EMAIL_MAX: usize = 120;

/// User row in the database. Only the Argon2 hash of the password is kept.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: String,
    password_hash: String,
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn verify_password(&self, plain: &str) -> bool {
        password::verify_password(plain, &self.password_hash)
    }

    /// Materialize a stored user from a pending insert.
    pub fn from_new(id: Uuid, new: NewUser, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            username: new.username,
            name: new.name,
            email: new.email,
            role: new.role,
            password_hash: new.password_hash,
            created_at,
        }
    }
}

/// A user that has not been persisted yet. The raw password is hashed on
/// construction and never retained.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: String,
    password_hash: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        raw_password: &str,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            username: username.into(),
            name: name.into(),
            email: email.into(),
            role: DEFAULT_ROLE.to_string(),
            password_hash: password::hash_password(raw_password)?,
        })
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn verify_password(&self, plain: &str) -> bool {
        password::verify_password(plain, &self.password_hash)
    }
}
