use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Registered account, without its credentials.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub user_name: String,
    pub email: String,
    pub full_name: String,
    pub roles: Vec<String>,
    pub created_at: NaiveDateTime,
}

/// A user together with the stored password hash, used only to check logins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub created_at: NaiveDateTime,
}

impl NewUser {
    #[must_use]
    pub fn new(
        user_name: String,
        email: String,
        full_name: String,
        password_hash: String,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            user_name,
            email: email.to_lowercase(),
            full_name,
            password_hash,
            roles: Vec::new(),
            created_at,
        }
    }

    /// Grant a role to the account being created.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }
}
