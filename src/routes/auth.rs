use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

use crate::{
    auth::{AuthResponse, AuthService, LoginRequest, RegisterRequest},
    error::AppError,
};

/// Register a new user.
///
/// Responds 201 with an empty body; a duplicate email is a 409.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    body: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    auth.register(&body.email, &body.password).await?;

    Ok(HttpResponse::Created().finish())
}

/// Authenticate a user and hand back a bearer token.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let token = auth.login(&body.email, &body.password).await?;

    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}
