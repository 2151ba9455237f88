//! JWT Authentication middleware for protected routes.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use log::debug;
use std::rc::Rc;

use crate::constants::{
    CODE_AUTH_REQUIRED, CODE_TOKEN_REVOKED, ERR_INVALID_AUTH_HEADER, ERR_TOKEN_REVOKED,
};
use crate::errors::ApiError;
use crate::services::auth_service::decode_token;
use crate::services::TokenBlacklist;

use super::BearerToken;

/// Validates the bearer token, rejects revoked ones and stores the decoded
/// `Claims` plus the raw `BearerToken` in the request extensions.
pub struct AuthMiddleware {
    blacklist: TokenBlacklist,
}

impl AuthMiddleware {
    pub fn new(blacklist: TokenBlacklist) -> Self {
        Self { blacklist }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
            blacklist: self.blacklist.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    blacklist: TokenBlacklist,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let blacklist = self.blacklist.clone();

        Box::pin(async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .ok_or_else(|| {
                    debug!("Rejected {}: missing bearer token", req.path());
                    ApiError::unauthorized(CODE_AUTH_REQUIRED, ERR_INVALID_AUTH_HEADER)
                })?;

            if blacklist.is_revoked(&token) {
                return Err(ApiError::unauthorized(CODE_TOKEN_REVOKED, ERR_TOKEN_REVOKED).into());
            }

            let claims = decode_token(&token)?;

            req.extensions_mut().insert(BearerToken(token));
            req.extensions_mut().insert(claims);

            service.call(req).await
        })
    }
}
