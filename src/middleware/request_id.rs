use http::HeaderValue;

use super::Middleware;
use crate::error::Result;
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::message::{Request, Response};
use crate::relay::Next;

/// Ensures every request carries an `x-request-id`.
///
/// An incoming valid ULID is kept; otherwise a new one is generated. The id is
/// stored in the request extensions and headers for downstream entries, and
/// echoed on the response.
pub struct RequestIdMiddleware;

impl Middleware for RequestIdMiddleware {
    fn process(&self, mut request: Request, next: Next<'_>) -> Result<Response> {
        let request_id = RequestId::from_header_or_new(
            request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
        );
        // A ULID renders as 26 Crockford base32 characters: always a valid header value
        let header = HeaderValue::from_str(&request_id.to_string()).map_err(anyhow::Error::from)?;

        request.extensions_mut().insert(request_id);
        request
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header.clone());

        let mut response = next.handle(request)?;
        response.headers_mut().insert(REQUEST_ID_HEADER, header);
        Ok(response)
    }
}
