use serde::{Deserialize, Serialize};

/// Claims carried by the access tokens issued on login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    /// User name.
    pub unique_name: String,
    pub full_name: String,
    /// Token id.
    pub jti: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub iss: String,
    pub aud: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Identity of the caller, taken from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub user_name: String,
    pub email: String,
    pub full_name: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Whether the caller was granted `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|granted| granted == role)
    }
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = std::num::ParseIntError;

    fn try_from(value: Claims) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.sub.parse()?,
            user_name: value.unique_name,
            email: value.email,
            full_name: value.full_name,
            roles: value.roles,
        })
    }
}
