use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::TokenService;
use crate::auth::AuthenticatedUser;

/// Best-effort request authentication.
///
/// Runs once per request, before business logic. A recognizable bearer
/// token that verifies attaches an [`AuthenticatedUser`] to the request's
/// extensions; anything else — no header, a different scheme, a token that
/// fails verification — leaves the request unauthenticated and lets it
/// proceed. This layer never rejects a request.
pub struct Authentication {
    tokens: TokenService,
}

impl Authentication {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthenticationService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationService {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct AuthenticationService<S> {
    service: S,
    tokens: TokenService,
}

impl<S, B> Service<ServiceRequest> for AuthenticationService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let bearer = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        if let Some(token) = bearer {
            match self.tokens.verify(token) {
                Ok(claims) => {
                    req.extensions_mut().insert(AuthenticatedUser {
                        email: claims.sub,
                        role: claims.role,
                    });
                }
                Err(err) => {
                    // Degrade to unauthenticated; the request goes through.
                    log::debug!("discarding unverifiable bearer token: {}", err);
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(fut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpRequest, HttpResponse, Responder};

    async fn echo_identity(req: HttpRequest) -> impl Responder {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => HttpResponse::Ok().json(serde_json::json!({
                "email": user.email,
                "role": user.role,
            })),
            None => HttpResponse::Ok().json(serde_json::json!({ "email": null })),
        }
    }

    fn tokens() -> TokenService {
        TokenService::new("middleware-test-secret", 15)
    }

    async fn identity_for(authorization: Option<&str>) -> serde_json::Value {
        let app = test::init_service(
            App::new()
                .wrap(Authentication::new(tokens()))
                .route("/whoami", web::get().to(echo_identity)),
        )
        .await;

        let mut req = test::TestRequest::get().uri("/whoami");
        if let Some(value) = authorization {
            req = req.insert_header((header::AUTHORIZATION, value));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert!(resp.status().is_success(), "filter must never reject");
        test::read_body_json(resp).await
    }

    #[actix_rt::test]
    async fn test_valid_token_attaches_identity() {
        let token = tokens().issue("a@x.com", "USER").unwrap();
        let body = identity_for(Some(&format!("Bearer {}", token))).await;
        assert_eq!(body["email"], "a@x.com");
        assert_eq!(body["role"], "USER");
    }

    #[actix_rt::test]
    async fn test_missing_header_passes_through_unauthenticated() {
        let body = identity_for(None).await;
        assert!(body["email"].is_null());
    }

    #[actix_rt::test]
    async fn test_non_bearer_scheme_passes_through_unauthenticated() {
        let body = identity_for(Some("Basic dXNlcjpwdw==")).await;
        assert!(body["email"].is_null());
    }

    #[actix_rt::test]
    async fn test_bad_token_passes_through_unauthenticated() {
        let body = identity_for(Some("Bearer not.a.token")).await;
        assert!(body["email"].is_null());
    }

    #[actix_rt::test]
    async fn test_foreign_token_passes_through_unauthenticated() {
        let foreign = TokenService::new("some-other-secret", 15)
            .issue("a@x.com", "USER")
            .unwrap();
        let body = identity_for(Some(&format!("Bearer {}", foreign))).await;
        assert!(body["email"].is_null());
    }
}
