use http::header::AUTHORIZATION;
use http::StatusCode;
use serde_json::json;
use tracing::debug;

use super::Middleware;
use crate::error::Result;
use crate::message::{json_response, Request, Response};
use crate::relay::Next;

/// Rejects requests whose `authorization` header does not match a fixed token.
///
/// Mismatches short-circuit the chain with a 401 JSON response; nothing after
/// this entry runs for that request.
pub struct AuthMiddleware {
    token: String,
}

impl AuthMiddleware {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Middleware for AuthMiddleware {
    fn process(&self, request: Request, next: Next<'_>) -> Result<Response> {
        let authorized = request
            .headers()
            .get(AUTHORIZATION)
            .is_some_and(|h| h.as_bytes() == self.token.as_bytes());

        if authorized {
            return next.handle(request);
        }

        debug!(path = %request.uri().path(), "Rejecting unauthorized request");
        let response = json_response(StatusCode::UNAUTHORIZED, &json!({ "error": "Unauthorized" }))
            .map_err(anyhow::Error::from)?;
        Ok(response)
    }
}
