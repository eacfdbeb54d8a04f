use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::AuthenticatedUser;

/// Extracts the identity the authentication filter attached to the request,
/// if any.
///
/// Authentication is best-effort, so this extractor never fails: a request
/// without a verified token simply yields `CurrentUser(None)`. Handlers that
/// care about the caller's identity take this as a parameter; nothing else
/// in the call chain carries it.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<AuthenticatedUser>);

impl FromRequest for CurrentUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(CurrentUser(
            req.extensions().get::<AuthenticatedUser>().cloned(),
        )))
    }
}
