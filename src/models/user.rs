use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub user_name: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub user_name: &'a str,
    pub email: &'a str,
    pub full_name: &'a str,
    pub password_hash: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Associations, Selectable, Insertable)]
#[diesel(
    table_name = crate::schema::user_roles,
    primary_key(user_id, role),
    belongs_to(User, foreign_key = user_id)
)]
pub struct UserRole {
    pub user_id: i32,
    pub role: String,
}

impl User {
    /// Convert the row into a domain user carrying the given roles.
    pub fn into_domain(self, roles: Vec<String>) -> DomainUser {
        DomainUser {
            id: self.id,
            user_name: self.user_name,
            email: self.email,
            full_name: self.full_name,
            roles,
            created_at: self.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(value: &'a DomainNewUser) -> Self {
        Self {
            user_name: value.user_name.as_str(),
            email: value.email.as_str(),
            full_name: value.full_name.as_str(),
            password_hash: value.password_hash.as_str(),
            created_at: value.created_at,
            updated_at: value.created_at,
        }
    }
}
