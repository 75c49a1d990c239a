use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser, UserCredentials};
use crate::models::user::{NewUser as DbNewUser, User as DbUser, UserRole as DbUserRole};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselStore, UserReader, UserWriter};

impl UserReader for DieselStore<'_> {
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<DomainUser>> {
        Ok(self
            .get_credentials_by_email(email)?
            .map(|credentials| credentials.user))
    }

    fn get_user_by_user_name(&self, user_name: &str) -> RepositoryResult<Option<DomainUser>> {
        use crate::schema::users;

        self.with_conn(|conn| {
            let user = users::table
                .filter(users::user_name.eq(user_name))
                .first::<DbUser>(conn)
                .optional()?;

            match user {
                Some(user) => {
                    let roles = load_roles(conn, user.id)?;
                    Ok(Some(user.into_domain(roles)))
                }
                None => Ok(None),
            }
        })
    }

    fn get_credentials_by_email(&self, email: &str) -> RepositoryResult<Option<UserCredentials>> {
        use crate::schema::users;

        let email = email.trim().to_lowercase();

        self.with_conn(|conn| {
            let user = users::table
                .filter(users::email.eq(&email))
                .first::<DbUser>(conn)
                .optional()?;

            match user {
                Some(user) => {
                    let roles = load_roles(conn, user.id)?;
                    let password_hash = user.password_hash.clone();
                    Ok(Some(UserCredentials {
                        user: user.into_domain(roles),
                        password_hash,
                    }))
                }
                None => Ok(None),
            }
        })
    }
}

impl UserWriter for DieselStore<'_> {
    fn create_user(&self, new_user: &DomainNewUser) -> RepositoryResult<DomainUser> {
        use crate::schema::{user_roles, users};

        self.with_conn(|conn| {
            let insertable = DbNewUser::from(new_user);

            let created = diesel::insert_into(users::table)
                .values(&insertable)
                .get_result::<DbUser>(conn)?;

            let roles: Vec<DbUserRole> = new_user
                .roles
                .iter()
                .map(|role| DbUserRole {
                    user_id: created.id,
                    role: role.clone(),
                })
                .collect();

            if !roles.is_empty() {
                diesel::insert_into(user_roles::table)
                    .values(&roles)
                    .execute(conn)?;
            }

            let roles = load_roles(conn, created.id)?;
            Ok(created.into_domain(roles))
        })
    }
}

fn load_roles(conn: &mut SqliteConnection, user_id: i32) -> RepositoryResult<Vec<String>> {
    use crate::schema::user_roles;

    let roles = user_roles::table
        .filter(user_roles::user_id.eq(user_id))
        .select(user_roles::role)
        .order(user_roles::role.asc())
        .load::<String>(conn)?;

    Ok(roles)
}
