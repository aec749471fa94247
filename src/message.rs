//! Request and response carriers threaded through the middleware chain.
//!
//! The dispatcher does not own an HTTP model of its own. Messages are plain
//! [`http::Request`] / [`http::Response`] values whose body is a [`Body`]: an
//! appendable byte buffer that entries may read or write to on the way out.

use std::borrow::Cow;
use std::fmt;

use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use serde::Serialize;

/// Request flowing down the chain
pub type Request = http::Request<Body>;

/// Response flowing back up the chain
pub type Response = http::Response<Body>;

/// Appendable message body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    buf: Vec<u8>,
}

impl Body {
    /// Create an empty body
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Serialize `value` as JSON into a new body
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `value` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_vec(value).map(|buf| Self { buf })
    }

    /// Append `chunk` to the end of the body, returning the number of bytes written
    pub fn write(&mut self, chunk: impl AsRef<[u8]>) -> usize {
        let chunk = chunk.as_ref();
        self.buf.extend_from_slice(chunk);
        chunk.len()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Body contents as text, replacing invalid UTF-8 sequences
    #[must_use]
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buf)
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Self {
            buf: value.as_bytes().to_vec(),
        }
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self {
            buf: value.into_bytes(),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(buf: Vec<u8>) -> Self {
        Self { buf }
    }
}

/// Create a response with the given status and an empty body
#[must_use]
pub fn empty_response(status: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

/// Create a `text/plain` response
#[must_use]
pub fn text_response(status: StatusCode, text: impl Into<String>) -> Response {
    let mut response = Response::new(Body::from(text.into()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// Create an `application/json` response
///
/// # Errors
///
/// Returns the serializer error if `value` cannot be represented as JSON.
pub fn json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    value: &T,
) -> Result<Response, serde_json::Error> {
    let mut response = Response::new(Body::json(value)?);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_write_appends() {
        let mut body = Body::from("<3");
        assert_eq!(body.write("<2"), 2);
        body.write(b"<1");
        assert_eq!(body.to_string(), "<3<2<1");
        assert_eq!(body.len(), 6);
    }

    #[test]
    fn test_body_lossy_text() {
        let body = Body::from(vec![b'o', b'k', 0xff]);
        assert_eq!(body.to_string_lossy(), "ok\u{fffd}");
    }

    #[test]
    fn test_json_response_sets_content_type() {
        let resp = json_response(StatusCode::UNAUTHORIZED, &json!({ "error": "Unauthorized" }))
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        let parsed: serde_json::Value = serde_json::from_slice(resp.body().as_bytes()).unwrap();
        assert_eq!(parsed["error"], "Unauthorized");
    }

    #[test]
    fn test_empty_response() {
        let resp = empty_response(StatusCode::NOT_FOUND);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(resp.body().is_empty());
    }
}
