//! Request extension trait for reading what `AuthMiddleware` stored.

use actix_web::HttpMessage;

use crate::models::Claims;

/// Raw bearer token of an authenticated request, kept for logout.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

pub trait RequestExt {
    /// `Some` once the request passed `AuthMiddleware`.
    fn get_claims(&self) -> Option<Claims>;

    fn get_bearer_token(&self) -> Option<BearerToken>;
}

impl RequestExt for actix_web::HttpRequest {
    fn get_claims(&self) -> Option<Claims> {
        self.extensions().get::<Claims>().cloned()
    }

    fn get_bearer_token(&self) -> Option<BearerToken> {
        self.extensions().get::<BearerToken>().cloned()
    }
}
