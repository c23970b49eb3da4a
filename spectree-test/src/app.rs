use axum::body::Body;
use axum::Router;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use spectree_axum::AxumAdapter;
use spectree_core::SpecTree;
use std::sync::Arc;
use tower::util::ServiceExt;

/// In-process HTTP test client wrapping an axum `Router`.
///
/// Requests are dispatched with `tower::ServiceExt::oneshot`; no port is
/// bound.
pub struct TestApp {
    router: Router,
    spec_url: Option<String>,
}

impl TestApp {
    pub fn new(router: Router) -> Self {
        Self {
            router,
            spec_url: None,
        }
    }

    /// Serve `router` together with the document routes of `tree`.
    pub fn documented(tree: &Arc<SpecTree<AxumAdapter>>, router: Router) -> Self {
        Self {
            router: tree.register(router),
            spec_url: Some(tree.config().spec_url()),
        }
    }

    pub fn get(&self, path: &str) -> TestRequest<'_> {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> TestRequest<'_> {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> TestRequest<'_> {
        self.request(Method::PUT, path)
    }

    pub fn patch(&self, path: &str) -> TestRequest<'_> {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> TestRequest<'_> {
        self.request(Method::DELETE, path)
    }

    pub fn request(&self, method: Method, path: &str) -> TestRequest<'_> {
        TestRequest {
            app: self,
            method,
            path: path.to_string(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Fetch the OpenAPI document served by the app.
    ///
    /// Panics when the app was not built with [`TestApp::documented`] or the
    /// document route does not answer `200`.
    pub async fn openapi(&self) -> Value {
        let url = self
            .spec_url
            .as_deref()
            .expect("TestApp::openapi requires TestApp::documented");
        self.get(url).send().await.assert_ok().json()
    }
}

/// Builder for one request.
pub struct TestRequest<'a> {
    app: &'a TestApp,
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl TestRequest<'_> {
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let name: HeaderName = name.parse().expect("invalid header name");
        let value = HeaderValue::from_str(value).expect("invalid header value");
        self.headers.append(name, value);
        self
    }

    /// Add one `name=value` pair to the `Cookie` header.
    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        let pair = format!("{name}={value}");
        let cookie = match self.headers.get(COOKIE).and_then(|v| v.to_str().ok()) {
            Some(existing) => format!("{existing}; {pair}"),
            None => pair,
        };
        self.headers
            .insert(COOKIE, HeaderValue::from_str(&cookie).expect("invalid cookie"));
        self
    }

    /// Send `body` as JSON and set `Content-Type: application/json`.
    pub fn json(mut self, body: &impl Serialize) -> Self {
        self.body = Some(serde_json::to_vec(body).expect("failed to serialize JSON body"));
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub async fn send(self) -> TestResponse {
        let mut request = Request::builder()
            .method(self.method)
            .uri(&self.path)
            .body(self.body.map(Body::from).unwrap_or_else(Body::empty))
            .expect("failed to build request");
        *request.headers_mut() = self.headers;

        let response = self
            .app
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// A buffered response with assertion helpers.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "Expected {expected}, got {}\nBody: {}",
            self.status,
            self.text()
        );
        self
    }

    pub fn assert_ok(self) -> Self {
        self.assert_status(StatusCode::OK)
    }

    pub fn assert_created(self) -> Self {
        self.assert_status(StatusCode::CREATED)
    }

    pub fn assert_not_found(self) -> Self {
        self.assert_status(StatusCode::NOT_FOUND)
    }

    /// Assert a `422` request validation failure reported for `field`
    /// (`query`, `json`, `headers` or `cookies`).
    pub fn assert_validation_error(self, field: &str) -> Self {
        let resp = self.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = resp.json();
        assert_eq!(body["error"], "Validation failed", "Body: {body}");
        let details = body["details"].as_array().cloned().unwrap_or_default();
        assert!(
            details.iter().any(|d| d["field"] == field),
            "no validation error for \"{field}\"\n  Body: {body}"
        );
        resp
    }

    /// Assert a `500` caused by a handler breaking its response model.
    pub fn assert_response_validation_error(self) -> Self {
        let resp = self.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = resp.json();
        assert_eq!(body["error"], "Response validation failed", "Body: {body}");
        resp
    }

    /// Assert that a JSON pointer (`/users/0/name`) resolves to `expected`.
    pub fn assert_json_pointer(self, pointer: &str, expected: impl Into<Value>) -> Self {
        let root: Value = self.json();
        let expected = expected.into();
        let actual = root.pointer(pointer).cloned().unwrap_or(Value::Null);
        assert_eq!(
            actual, expected,
            "JSON pointer \"{pointer}\" assertion failed\n  Expected: {expected}\n  Actual:   {actual}\n  Body: {root}",
        );
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("Failed to parse JSON: {e}\nBody: {}", self.text()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}
