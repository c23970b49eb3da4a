mod common;

use bytes::Bytes;
use common::{tree, TableAdapter};
use http::{Method, StatusCode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use spectree_core::params::PathParams;
use spectree_core::{
    Adapter, Config, Endpoint, RawRequest, Reply, ResponseSpec, RouteDoc, SpecTree, SyncHandler,
    ValidatedRequest,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Serialize, Deserialize, JsonSchema)]
struct Page {
    limit: i64,
}

#[derive(Serialize, Deserialize, JsonSchema)]
struct NewUser {
    name: String,
    age: u8,
}

#[derive(Serialize, Deserialize, JsonSchema)]
struct User {
    id: i64,
    name: String,
}

#[derive(Serialize, Deserialize, JsonSchema)]
struct Tracing {
    x_request_id: String,
}

#[derive(Serialize, Deserialize, JsonSchema)]
struct Session {
    session: String,
    debug: Option<bool>,
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn request(method: Method, uri: &str) -> http::request::Builder {
    http::Request::builder().method(method).uri(uri)
}

fn raw(req: http::Request<Bytes>) -> RawRequest {
    let (parts, body) = req.into_parts();
    RawRequest::from_parts(parts, PathParams::new(), body)
}

fn call(
    tree: &SpecTree<TableAdapter>,
    endpoint: &Endpoint<SyncHandler>,
    req: http::Request<Bytes>,
) -> Reply {
    call_with(tree, endpoint, PathParams::new(), req)
}

fn call_with(
    tree: &SpecTree<TableAdapter>,
    endpoint: &Endpoint<SyncHandler>,
    path_params: PathParams,
    req: http::Request<Bytes>,
) -> Reply {
    tree.adapter()
        .validate(Arc::new(endpoint.clone()), path_params, raw(req))
}

fn empty(method: Method, uri: &str) -> http::Request<Bytes> {
    request(method, uri).body(Bytes::new()).unwrap()
}

fn json_body(method: Method, uri: &str, body: Value) -> http::Request<Bytes> {
    request(method, uri)
        .header("content-type", "application/json")
        .body(Bytes::from(body.to_string()))
        .unwrap()
}

fn counting_handler(
    calls: Arc<AtomicUsize>,
) -> impl Fn(ValidatedRequest) -> Reply + Send + Sync + 'static {
    move |req: ValidatedRequest| {
        calls.fetch_add(1, Ordering::SeqCst);
        let page: Page = req.query().unwrap();
        Reply::ok(json!({ "limit": page.limit }))
    }
}

// ── Query validation ────────────────────────────────────────────────────────

#[test]
fn missing_query_field_is_rejected_before_the_handler() {
    let t = tree(Config::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let ep = t
        .validate(RouteDoc::new().query::<Page>(), counting_handler(calls.clone()))
        .unwrap();

    let reply = call(&t, &ep, empty(Method::GET, "/users"));

    assert_eq!(reply.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body()["error"], "Validation failed");
    assert_eq!(reply.body()["details"][0]["field"], "query");
    assert_eq!(reply.body()["details"][0]["code"], "validation");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn non_integer_query_value_is_rejected() {
    let t = tree(Config::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let ep = t
        .validate(RouteDoc::new().query::<Page>(), counting_handler(calls.clone()))
        .unwrap();

    let reply = call(&t, &ep, empty(Method::GET, "/users?limit=five"));

    assert_eq!(reply.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn valid_query_reaches_the_handler_coerced() {
    let t = tree(Config::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let ep = t
        .validate(RouteDoc::new().query::<Page>(), counting_handler(calls.clone()))
        .unwrap();

    let reply = call(&t, &ep, empty(Method::GET, "/users?limit=5"));

    assert_eq!(reply.status(), StatusCode::OK);
    assert_eq!(reply.body(), &json!({ "limit": 5 }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn doc_only_routes_pass_invalid_data_through() {
    let t = tree(Config::default());
    let ep = t
        .doc(RouteDoc::new().query::<Page>(), |req: ValidatedRequest| {
            Reply::ok(req.value(spectree_core::Role::Query).clone())
        })
        .unwrap();

    let reply = call(&t, &ep, empty(Method::GET, "/users?limit=five"));

    assert_eq!(reply.status(), StatusCode::OK);
    assert_eq!(reply.body(), &json!({ "limit": "five" }));
}

// ── Body validation ─────────────────────────────────────────────────────────

#[test]
fn json_body_is_validated() {
    let t = tree(Config::default());
    let ep = t
        .validate(RouteDoc::new().json::<NewUser>(), |req: ValidatedRequest| {
            let user: NewUser = req.json().unwrap();
            Reply::new(StatusCode::CREATED, json!({ "id": 1, "name": user.name }))
        })
        .unwrap();

    let ok = call(
        &t,
        &ep,
        json_body(Method::POST, "/users", json!({ "name": "alice", "age": 30 })),
    );
    assert_eq!(ok.status(), StatusCode::CREATED);
    assert_eq!(ok.body()["name"], "alice");

    let bad = call(
        &t,
        &ep,
        json_body(Method::POST, "/users", json!({ "name": "alice", "age": -1 })),
    );
    assert_eq!(bad.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(bad.body()["details"][0]["field"], "json");
}

#[test]
fn malformed_json_body_is_reported_as_parse_error() {
    let t = tree(Config::default());
    let ep = t
        .validate(RouteDoc::new().json::<NewUser>(), |_req: ValidatedRequest| {
            Reply::empty(StatusCode::NO_CONTENT)
        })
        .unwrap();

    let req = request(Method::POST, "/users")
        .body(Bytes::from_static(b"{\"name\":"))
        .unwrap();
    let reply = call(&t, &ep, req);

    assert_eq!(reply.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let details = reply.body()["details"].as_array().unwrap();
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["code"], "parse");
}

// ── Headers & cookies ───────────────────────────────────────────────────────

#[test]
fn header_names_match_case_insensitively() {
    let t = tree(Config::default());
    let ep = t
        .validate(RouteDoc::new().headers::<Tracing>(), |req: ValidatedRequest| {
            let tracing: Tracing = req.headers().unwrap();
            Reply::ok(json!({ "id": tracing.x_request_id }))
        })
        .unwrap();

    let req = request(Method::GET, "/ping")
        .header("X-Request-Id", "abc-123")
        .body(Bytes::new())
        .unwrap();
    let reply = call(&t, &ep, req);
    assert_eq!(reply.status(), StatusCode::OK);
    assert_eq!(reply.body()["id"], "abc-123");

    let missing = call(&t, &ep, empty(Method::GET, "/ping"));
    assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(missing.body()["details"][0]["field"], "headers");
}

#[test]
fn cookies_are_parsed_and_coerced() {
    let t = tree(Config::default());
    let ep = t
        .validate(RouteDoc::new().cookies::<Session>(), |req: ValidatedRequest| {
            let session: Session = req.cookies().unwrap();
            Reply::ok(json!({ "session": session.session, "debug": session.debug }))
        })
        .unwrap();

    let req = request(Method::GET, "/me")
        .header("cookie", "session=s1; debug=true")
        .body(Bytes::new())
        .unwrap();
    let reply = call(&t, &ep, req);

    assert_eq!(reply.status(), StatusCode::OK);
    assert_eq!(reply.body(), &json!({ "session": "s1", "debug": true }));
}

#[test]
fn path_params_are_handed_to_the_handler() {
    let t = tree(Config::default());
    let ep = t
        .doc(RouteDoc::new(), |req: ValidatedRequest| {
            Reply::ok(json!({ "id": req.path_param("id") }))
        })
        .unwrap();

    let mut params = PathParams::new();
    params.insert("id".to_string(), "42".to_string());
    let reply = call_with(&t, &ep, params, empty(Method::GET, "/users/42"));

    assert_eq!(reply.body(), &json!({ "id": "42" }));
}

// ── Response validation ─────────────────────────────────────────────────────

#[test]
fn response_breaking_its_model_becomes_500() {
    let t = tree(Config::default());
    let ep = t
        .validate(
            RouteDoc::new().response(ResponseSpec::new().model::<User>(StatusCode::OK)),
            |_req: ValidatedRequest| Reply::ok(json!({ "id": "not-a-number" })),
        )
        .unwrap();

    let reply = call(&t, &ep, empty(Method::GET, "/users/1"));

    assert_eq!(reply.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.body(), &json!({ "error": "Response validation failed" }));
}

#[test]
fn statuses_without_a_model_are_not_checked() {
    let t = tree(Config::default());
    let ep = t
        .validate(
            RouteDoc::new().response(
                ResponseSpec::new()
                    .model::<User>(StatusCode::OK)
                    .empty(StatusCode::NOT_FOUND),
            ),
            |_req: ValidatedRequest| Reply::error(StatusCode::NOT_FOUND, "no such user"),
        )
        .unwrap();

    let reply = call(&t, &ep, empty(Method::GET, "/users/9"));

    assert_eq!(reply.status(), StatusCode::NOT_FOUND);
    assert_eq!(reply.body(), &json!({ "error": "no such user" }));
}

#[test]
fn doc_only_routes_skip_response_validation() {
    let t = tree(Config::default());
    let ep = t
        .doc(
            RouteDoc::new().response(ResponseSpec::new().model::<User>(StatusCode::OK)),
            |_req: ValidatedRequest| Reply::ok(json!({ "unexpected": true })),
        )
        .unwrap();

    let reply = call(&t, &ep, empty(Method::GET, "/users/1"));
    assert_eq!(reply.status(), StatusCode::OK);
}

// ── Declaration errors ──────────────────────────────────────────────────────

#[test]
fn non_object_query_model_fails_at_decoration() {
    let t = tree(Config::default());
    let err = t
        .validate(RouteDoc::new().query::<Vec<String>>(), |_req: ValidatedRequest| {
            Reply::empty(StatusCode::NO_CONTENT)
        })
        .err()
        .unwrap();

    assert!(matches!(
        err,
        spectree_core::DeclarationError::NotAnObject { role: spectree_core::Role::Query, .. }
    ));
    assert!(t.models().is_empty());
}
