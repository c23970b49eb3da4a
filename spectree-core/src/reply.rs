use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use serde::Serialize;
use serde_json::Value;

/// Framework-neutral handler output: a status, a JSON body and extra headers.
///
/// A `Null` body is sent as an empty body.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    status: StatusCode,
    body: Value,
    headers: HeaderMap,
}

impl Reply {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            headers: HeaderMap::new(),
        }
    }

    /// `200 OK` with a JSON body.
    pub fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// Serialize `body` as the reply body.
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self::new(status, body),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize reply body");
                Self::error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to serialize response")
            }
        }
    }

    /// A reply without body.
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, Value::Null)
    }

    /// A JSON error reply with a standard `{ "error": message }` body.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, serde_json::json!({ "error": message.into() }))
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Render into an `http` response with a JSON body.
    pub fn into_http(self) -> http::Response<Bytes> {
        let body = match &self.body {
            Value::Null => Bytes::new(),
            body => match serde_json::to_vec(body) {
                Ok(bytes) => Bytes::from(bytes),
                Err(err) => {
                    tracing::error!(error = %err, "failed to encode reply body");
                    return Reply::empty(StatusCode::INTERNAL_SERVER_ERROR).into_http();
                }
            },
        };

        let mut response = http::Response::new(body);
        *response.status_mut() = self.status;
        if !self.body.is_null() {
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        response.headers_mut().extend(self.headers);
        response
    }
}

/// Conversion of handler return values into a [`Reply`].
pub trait IntoReply {
    fn into_reply(self) -> Reply;
}

impl IntoReply for Reply {
    fn into_reply(self) -> Reply {
        self
    }
}

impl IntoReply for (StatusCode, Value) {
    fn into_reply(self) -> Reply {
        Reply::new(self.0, self.1)
    }
}

impl IntoReply for StatusCode {
    fn into_reply(self) -> Reply {
        Reply::empty(self)
    }
}

impl<T: IntoReply, E: IntoReply> IntoReply for Result<T, E> {
    fn into_reply(self) -> Reply {
        match self {
            Ok(ok) => ok.into_reply(),
            Err(err) => err.into_reply(),
        }
    }
}
