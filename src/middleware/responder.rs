use http::StatusCode;

use super::RequestHandler;
use crate::error::Result;
use crate::message::{Body, Request, Response};

/// Terminal handler answering every request with a fixed status and body
#[derive(Debug, Clone)]
pub struct StatusResponder {
    status: StatusCode,
    body: Body,
}

impl StatusResponder {
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            body: Body::empty(),
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }
}

impl RequestHandler for StatusResponder {
    fn handle(&self, _request: Request) -> Result<Response> {
        let mut response = Response::new(self.body.clone());
        *response.status_mut() = self.status;
        Ok(response)
    }
}
