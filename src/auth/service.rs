use std::sync::Arc;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::models::{NewUser, DEFAULT_ROLE};
use crate::store::UserStore;

/// Registration and login over a credential store.
///
/// Both dependencies are injected: the store as a trait object, the token
/// service as a value carrying its own key material.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Registers a new account with the default role.
    ///
    /// The lookup is a fast path only; the store's uniqueness constraint has
    /// the final word, so a concurrent duplicate registration that slips
    /// past the check still resolves to `Conflict` here.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), AppError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(format!("User already exists: {}", email)));
        }

        let password_hash = hash_password(password)?;

        self.users
            .insert(NewUser {
                email: email.to_string(),
                password_hash,
                role: DEFAULT_ROLE.to_string(),
            })
            .await
            .map_err(|err| match err {
                AppError::Conflict(_) => {
                    AppError::Conflict(format!("User already exists: {}", email))
                }
                other => other,
            })?;

        log::debug!("registered account {}", email);
        Ok(())
    }

    /// Authenticates a login attempt, returning a bearer token on success.
    ///
    /// Unknown email and wrong password produce one external message; the
    /// distinction would otherwise hand callers an account-enumeration
    /// oracle. Only the debug log records which case occurred.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                log::debug!("login rejected: no account for {}", email);
                return Err(AppError::Unauthorized("Invalid credentials".into()));
            }
        };

        if !verify_password(password, &user.password_hash)? {
            log::debug!("login rejected: wrong password for {}", email);
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }

        self.tokens.issue(&user.email, &user.role)
    }
}
