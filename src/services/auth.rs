use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::SERVICE_ACCESS_ROLE;
use crate::auth::jwt::JwtService;
use crate::auth::password::{hash_password, verify_password};
use crate::domain::user::{NewUser, User};
use crate::forms::users::{LoginForm, RegisterForm};
use crate::repository::errors::RepositoryError;
use crate::repository::{UnitOfWork, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

/// Account summary returned next to a fresh token.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: i32,
    pub user_name: String,
    pub email: String,
    pub full_name: String,
    pub roles: Vec<String>,
}

impl From<User> for LoginUser {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            user_name: value.user_name,
            email: value.email,
            full_name: value.full_name,
            roles: value.roles,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
    pub expiration: DateTime<Utc>,
    pub user: LoginUser,
}

/// Creates an account. Addresses listed in `admin_emails` get the admin role.
pub fn register<U>(
    uow: &U,
    cancel: &CancellationToken,
    admin_emails: &[String],
    form: RegisterForm,
    now: NaiveDateTime,
) -> ServiceResult<User>
where
    U: UnitOfWork + ?Sized,
{
    let registration = form
        .into_registration()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let password_hash = hash_password(&registration.password).map_err(|err| {
        log::error!("Failed to hash password: {err}");
        ServiceError::Internal
    })?;

    let mut new_user = NewUser::new(
        registration.user_name,
        registration.email,
        registration.full_name,
        password_hash,
        now,
    );
    if admin_emails.contains(&new_user.email) {
        new_user = new_user.with_role(SERVICE_ACCESS_ROLE);
    }

    let user = uow
        .run(cancel, |store| {
            if store.get_user_by_email(&new_user.email)?.is_some() {
                return Err(RepositoryError::Conflict("Email already exists".to_string()));
            }
            if store.get_user_by_user_name(&new_user.user_name)?.is_some() {
                return Err(RepositoryError::Conflict(
                    "UserName already exists".to_string(),
                ));
            }
            store.create_user(&new_user)
        })
        .map_err(ServiceError::from)?;

    log::info!("Registered user {} ({})", user.id, user.user_name);

    Ok(user)
}

/// Checks the credentials and issues an access token.
///
/// Unknown addresses and wrong passwords are both reported as
/// [`ServiceError::Unauthorized`].
pub fn login<U>(
    uow: &U,
    cancel: &CancellationToken,
    jwt: &JwtService,
    form: LoginForm,
    now: DateTime<Utc>,
) -> ServiceResult<LoginResponse>
where
    U: UnitOfWork + ?Sized,
{
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let credentials = uow
        .run(cancel, |store| store.get_credentials_by_email(&form.email))
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::Unauthorized)?;

    let matches = verify_password(&form.password, &credentials.password_hash).map_err(|err| {
        log::error!(
            "Stored password hash of user {} is unreadable: {err}",
            credentials.user.id
        );
        ServiceError::Internal
    })?;
    if !matches {
        return Err(ServiceError::Unauthorized);
    }

    let issued = jwt.create_token(&credentials.user, now).map_err(|err| {
        log::error!("Failed to issue token: {err}");
        ServiceError::Internal
    })?;

    Ok(LoginResponse {
        token: issued.token,
        expiration: issued.expires_at,
        user: credentials.user.into(),
    })
}
