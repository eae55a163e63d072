use std::future::{ready, Ready};

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;

use crate::{error::ApiError, policy::Caller, utils::decode_access_token, AppState};

/// Resolves the bearer token, if any, into a [`Caller`] stored on the request.
///
/// Requests without a bearer token pass through as anonymous; a token that
/// fails to verify is rejected outright.
#[derive(Clone)]
pub struct VerifyJWT {
    app_data: web::Data<AppState>,
}

impl VerifyJWT {
    pub fn new(app_data: web::Data<AppState>) -> Self {
        Self { app_data }
    }
}

impl<S, B> Transform<S, ServiceRequest> for VerifyJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = VerifyJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(VerifyJWTMiddleware {
            service,
            app_data: self.app_data.clone(),
        }))
    }
}

pub struct VerifyJWTMiddleware<S> {
    service: S,
    app_data: web::Data<AppState>,
}

impl<S, B> Service<ServiceRequest> for VerifyJWTMiddleware<S>
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
        let token = req
            .headers()
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_owned());

        let caller = match token {
            None => Caller::Anonymous,
            Some(token) => {
                match decode_access_token(&token, &self.app_data.settings.jwt_secret) {
                    Ok(user) => Caller::User(user),
                    Err(e) => {
                        log::warn!("rejected bearer token: {e}");
                        let err = ApiError::AuthenticationFailed("Invalid or expired token.".into());
                        return Box::pin(async move { Err(err.into()) });
                    }
                }
            }
        };

        req.extensions_mut().insert(caller);
        let fut = self.service.call(req);
        Box::pin(async move { fut.await })
    }
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let caller = req
            .extensions()
            .get::<Caller>()
            .cloned()
            .unwrap_or(Caller::Anonymous);
        ready(Ok(caller))
    }
}
