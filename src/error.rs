//!
//! # Error Handling
//!
//! This module defines the error type `AppError` used throughout the
//! application, together with the single place where errors become HTTP
//! responses: the [`ErrorEnvelope`] middleware.
//!
//! Business code raises typed `AppError` values and never touches status
//! codes. `ErrorEnvelope` intercepts every failure leaving the `/api` scope
//! and renders the wire shape `{status, message, path}`. Server-side causes
//! (database faults, hashing faults, anything unclassified) are collapsed to
//! a generic message so internal detail never reaches a caller.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! and `bcrypt::BcryptError` keep the `?` operator usable across layers.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ResponseError,
    http::StatusCode,
    Error, HttpResponse,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidationErrors;

/// Wire shape of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub path: String,
}

/// Represents all failure classes the application distinguishes.
///
/// Each variant maps to exactly one HTTP status; the mapping lives in
/// [`AppError::status_code`] and is applied centrally by [`ErrorEnvelope`].
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing required input (HTTP 400).
    Validation(String),
    /// Bad credentials or an unverifiable token at the business layer (HTTP 401).
    Unauthorized(String),
    /// A requested resource does not exist (HTTP 404).
    NotFound(String),
    /// A duplicate unique key (HTTP 409).
    Conflict(String),
    /// A database operation failed (HTTP 500, message withheld from callers).
    Database(String),
    /// Anything unclassified (HTTP 500, message withheld from callers).
    Internal(String),
}

impl AppError {
    /// The message callers are allowed to see. Server-side failures are
    /// presented uniformly; their real cause stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Database(_) | AppError::Internal(_) => "Unexpected error".to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Fallback rendering for contexts where ErrorEnvelope is not mounted
    // (unit tests, bare handlers). The middleware fills in the real path.
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ApiError {
            status: status.as_u16(),
            message: self.public_message(),
            path: String::new(),
        })
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// A unique-constraint violation is the store telling us a duplicate key
/// slipped past the service-level existence check, so it maps to `Conflict`.
/// `RowNotFound` maps to `NotFound`; everything else is a `Database` fault.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Resource already exists".into())
            }
            _ => AppError::Database(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::Validation`,
/// keeping the first field error as "field: message".
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let message = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |e| {
                    let detail = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", field, detail)
                })
            })
            .next()
            .unwrap_or_else(|| "Validation error".to_string());
        AppError::Validation(message)
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::Internal`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("Password hashing failed: {}", error))
    }
}

/// Middleware that turns every error leaving the wrapped scope into the
/// `{status, message, path}` wire shape.
///
/// Besides `AppError`, this also catches framework-level failures such as
/// JSON payload deserialization errors: client errors keep their message,
/// server errors degrade to "Unexpected error".
pub struct ErrorEnvelope;

impl<S, B> Transform<S, ServiceRequest> for ErrorEnvelope
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ErrorEnvelopeService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorEnvelopeService { service }))
    }
}

pub struct ErrorEnvelopeService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ErrorEnvelopeService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // HttpRequest is reference-counted; keep a handle so the error
        // response can be built against the original request.
        let http_req = req.request().clone();
        let fut = self.service.call(req);
        Box::pin(async move {
            match fut.await {
                Ok(res) => Ok(res.map_into_left_body()),
                Err(err) => {
                    let response = envelope_response(&err, http_req.path());
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
            }
        })
    }
}

fn envelope_response(err: &Error, path: &str) -> HttpResponse {
    let (status, message) = match err.as_error::<AppError>() {
        Some(app_err) => (app_err.status_code(), app_err.public_message()),
        None => {
            let status = err.as_response_error().status_code();
            let message = if status.is_server_error() {
                log::error!("unclassified failure on {}: {}", path, err);
                "Unexpected error".to_string()
            } else {
                err.to_string()
            };
            (status, message)
        }
    };

    HttpResponse::build(status).json(ApiError {
        status: status.as_u16(),
        message,
        path: path.to_string(),
    })
}
