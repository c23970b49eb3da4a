use bytes::Bytes;
use http::{Method, Request, Response, StatusCode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use spectree_blocking::{BlockingAdapter, BlockingRouter};
use spectree_core::{
    Config, Endpoint, FieldError, Reply, RequestValidationError, ResponseSpec, RouteDoc, SpecTree,
    SyncHandler, ValidatedRequest,
};
use std::sync::Arc;

#[derive(Serialize, Deserialize, JsonSchema)]
struct Page {
    limit: i64,
}

#[derive(Serialize, Deserialize, JsonSchema)]
struct Item {
    id: i64,
    name: String,
}

fn list_items(req: ValidatedRequest) -> Reply {
    let page: Page = req.query().unwrap();
    Reply::json(StatusCode::OK, &json!({ "limit": page.limit }))
}

fn get_item(req: ValidatedRequest) -> Result<Reply, RequestValidationError> {
    let id: i64 = req
        .path_param("id")
        .and_then(|id| id.parse().ok())
        .ok_or_else(|| RequestValidationError {
            errors: vec![FieldError::new("id", "must be an integer", "type")],
        })?;
    Ok(Reply::ok(json!({ "id": id, "name": "widget" })))
}

fn bad_item(_req: ValidatedRequest) -> Reply {
    Reply::ok(json!({ "id": 1 }))
}

fn setup(config: Config) -> (Arc<SpecTree<BlockingAdapter>>, BlockingRouter) {
    let tree = Arc::new(SpecTree::new(BlockingAdapter::new(), config));
    let list = tree
        .validate(RouteDoc::new().query::<Page>().tags(["items"]), list_items)
        .unwrap();
    let get = tree
        .validate(
            RouteDoc::new().response(ResponseSpec::new().model::<Item>(StatusCode::OK)),
            get_item,
        )
        .unwrap();
    let bad = tree
        .validate(
            RouteDoc::new().response(ResponseSpec::new().model::<Item>(StatusCode::OK)),
            bad_item,
        )
        .unwrap();

    let router = BlockingRouter::new(&tree)
        .endpoint(Method::GET, "/items", list)
        .endpoint(Method::GET, "/items/{id}", get)
        .endpoint(Method::GET, "/bad", bad);
    let router = tree.register(router);
    (tree, router)
}

fn send(router: &BlockingRouter, method: Method, uri: &str) -> Response<Bytes> {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Bytes::new())
        .unwrap();
    router.handle(req)
}

fn body(resp: &Response<Bytes>) -> Value {
    serde_json::from_slice(resp.body()).unwrap()
}

#[test]
fn valid_request_is_dispatched() {
    let (_, router) = setup(Config::default());
    let resp = send(&router, Method::GET, "/items?limit=5");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body(&resp), json!({ "limit": 5 }));
    assert_eq!(resp.headers()["content-type"], "application/json");
}

#[test]
fn invalid_query_is_422() {
    let (_, router) = setup(Config::default());
    let resp = send(&router, Method::GET, "/items?limit=many");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body(&resp)["error"], "Validation failed");
}

#[test]
fn handler_errors_convert_to_replies() {
    let (_, router) = setup(Config::default());

    let ok = send(&router, Method::GET, "/items/3");
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(body(&ok)["id"], 3);

    let err = send(&router, Method::GET, "/items/three");
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body(&err)["details"][0]["field"], "id");
}

#[test]
fn response_model_violation_is_500() {
    let (_, router) = setup(Config::default());
    let resp = send(&router, Method::GET, "/bad");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body(&resp), json!({ "error": "Response validation failed" }));
}

#[test]
fn unknown_path_is_404_and_wrong_method_is_405() {
    let (_, router) = setup(Config::default());

    assert_eq!(
        send(&router, Method::GET, "/nothing").status(),
        StatusCode::NOT_FOUND
    );

    let resp = send(&router, Method::DELETE, "/items");
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers()["allow"], "GET");
}

#[test]
fn document_and_ui_are_served() {
    let (_, router) = setup(Config::new("Items", "0.2"));

    let resp = send(&router, Method::GET, "/apidoc/openapi.json");
    assert_eq!(resp.status(), StatusCode::OK);
    let spec = body(&resp);
    assert_eq!(spec["info"]["title"], "Items");
    assert_eq!(spec["paths"]["/items"]["get"]["operationID"], "list_items__get");
    assert_eq!(spec["paths"]["/items/{id}"]["get"]["operationID"], "get_item__get");
    assert_eq!(spec["tags"], json!([{ "name": "items" }]));
    assert!(spec["paths"].get("/apidoc/openapi.json").is_none());
    assert!(spec["paths"].get("/apidoc/redoc").is_none());

    let page = send(&router, Method::GET, "/apidoc/redoc");
    assert_eq!(page.status(), StatusCode::OK);
    assert!(page.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
}

#[test]
fn plain_endpoints_skip_validation() {
    let tree = Arc::new(SpecTree::new(BlockingAdapter::new(), Config::default()));
    let echo = Endpoint::<SyncHandler>::plain(|req: ValidatedRequest| {
        Reply::ok(req.value(spectree_core::Role::Query).clone())
    });
    let router = BlockingRouter::new(&tree).endpoint(Method::GET, "/echo", echo);

    let resp = send(&router, Method::GET, "/echo?a=1&a=2");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body(&resp), json!({ "a": "2" }));
}

#[test]
fn literal_routes_win_over_placeholders() {
    let tree = Arc::new(SpecTree::new(BlockingAdapter::new(), Config::default()));
    let by_id = Endpoint::<SyncHandler>::plain(|req: ValidatedRequest| {
        Reply::ok(json!({ "route": "id", "id": req.path_param("id") }))
    });
    let new = Endpoint::<SyncHandler>::plain(|_req: ValidatedRequest| Reply::ok(json!({ "route": "new" })));
    let rest = Endpoint::<SyncHandler>::plain(|req: ValidatedRequest| {
        Reply::ok(json!({ "route": "rest", "rest": req.path_param("rest") }))
    });
    let router = BlockingRouter::new(&tree)
        .endpoint(Method::GET, "/items/{*rest}", rest)
        .endpoint(Method::GET, "/items/{id}", by_id)
        .endpoint(Method::GET, "/items/new", new);

    assert_eq!(body(&send(&router, Method::GET, "/items/new"))["route"], "new");
    assert_eq!(body(&send(&router, Method::GET, "/items/7"))["route"], "id");
    assert_eq!(
        body(&send(&router, Method::GET, "/items/7/parts")),
        json!({ "route": "rest", "rest": "7/parts" })
    );
}

#[test]
fn path_params_are_percent_decoded() {
    let tree = Arc::new(SpecTree::new(BlockingAdapter::new(), Config::default()));
    let echo = Endpoint::<SyncHandler>::plain(|req: ValidatedRequest| {
        Reply::ok(json!({ "name": req.path_param("name") }))
    });
    let router = BlockingRouter::new(&tree).endpoint(Method::GET, "/users/{name}", echo);

    let resp = send(&router, Method::GET, "/users/J%C3%BCrgen%20X");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body(&resp)["name"], "Jürgen X");
}
