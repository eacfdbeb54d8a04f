pub mod extractors;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export the surface the rest of the crate works with.
pub use extractors::CurrentUser;
pub use middleware::Authentication;
pub use password::{hash_password, verify_password};
pub use service::AuthService;
pub use token::{Claims, TokenService};

/// Identity attached to a request by the authentication filter after a
/// bearer token verified. Threaded through request extensions and surfaced
/// by the [`CurrentUser`] extractor; never stored in any global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub email: String,
    pub role: String,
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Must be a valid email format; doubles as the login key.
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}
