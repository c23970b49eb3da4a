use axum::body::Body;
use axum::extract::Request;
use axum::response::{Html, Response};
use axum::routing::get;
use axum::Router;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use http::{Method, StatusCode};
use http_body_util::LengthLimitError;
use spectree_core::params::{self, Parameter, PathParams};
use spectree_core::{
    ui, Adapter, AsyncHandler, Endpoint, HandlerRef, RawRequest, Reply, RouteRecord,
    SharedRouteTable, SpecGenerationError, SpecTree,
};
use std::sync::Arc;

/// Largest request body buffered for validation, in bytes.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Render a [`Reply`] as an axum response.
pub fn into_response(reply: Reply) -> Response {
    let (parts, body) = reply.into_http().into_parts();
    Response::from_parts(parts, Body::from(body))
}

/// Adapter between spectree and axum.
///
/// Routes are recorded in a [`SharedRouteTable`] by [`ApiRouter`] as they
/// are mounted; handlers are awaited on the tokio runtime.
///
/// [`ApiRouter`]: crate::ApiRouter
#[derive(Debug, Clone)]
pub struct AxumAdapter {
    table: SharedRouteTable,
    body_limit: usize,
}

impl Default for AxumAdapter {
    fn default() -> Self {
        Self {
            table: SharedRouteTable::new(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl AxumAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    pub fn table(&self) -> &SharedRouteTable {
        &self.table
    }
}

impl Adapter for AxumAdapter {
    type Route = RouteRecord;
    type Handler = AsyncHandler;
    type Request = Request;
    type Output = BoxFuture<'static, Response>;
    type App = Router;

    fn find_routes(&self) -> Vec<RouteRecord> {
        self.table.snapshot()
    }

    fn parse_path(
        &self,
        route: &RouteRecord,
    ) -> Result<(String, Vec<Parameter>), SpecGenerationError> {
        params::parse_template(route.path())
    }

    fn parse_func(&self, route: &RouteRecord) -> Vec<(Method, HandlerRef)> {
        route.methods().to_vec()
    }

    fn validate(
        &self,
        endpoint: Arc<Endpoint<AsyncHandler>>,
        path_params: PathParams,
        request: Request,
    ) -> BoxFuture<'static, Response> {
        let limit = self.body_limit;
        async move {
            let (parts, body) = request.into_parts();
            let body = match axum::body::to_bytes(body, limit).await {
                Ok(body) => body,
                Err(err) => {
                    let inner = err.into_inner();
                    if inner.is::<LengthLimitError>() {
                        tracing::debug!(limit, "request body over limit");
                        return into_response(Reply::error(
                            StatusCode::PAYLOAD_TOO_LARGE,
                            "Request body too large",
                        ));
                    }
                    tracing::debug!(error = %inner, "failed to read request body");
                    return into_response(Reply::error(
                        StatusCode::BAD_REQUEST,
                        "Failed to read request body",
                    ));
                }
            };

            let raw = RawRequest::from_parts(parts, path_params, body);
            let reply = match endpoint.before(raw) {
                Ok(request) => {
                    let reply = (endpoint.handler())(request).await;
                    endpoint.after(reply)
                }
                Err(reply) => reply,
            };
            into_response(reply)
        }
        .boxed()
    }

    fn register_route(tree: &Arc<SpecTree<Self>>, app: Router) -> Router {
        let config = tree.config();
        let spec_tree = Arc::clone(tree);
        let mut app = app.route(
            &config.spec_url(),
            get(move || {
                let tree = Arc::clone(&spec_tree);
                async move { spec_response(&tree) }
            }),
        );

        if let (Some(url), Some(page)) = (config.ui_url(), ui::page(config)) {
            app = app.route(
                &url,
                get(move || {
                    let page = page.clone();
                    async move { Html(page) }
                }),
            );
        }

        tracing::debug!(spec = %config.spec_url(), ui = ?config.ui_url(), "documentation routes registered");
        app
    }
}

fn spec_response(tree: &SpecTree<AxumAdapter>) -> Response {
    match tree.spec() {
        Ok(spec) => into_response(Reply::ok(spec.as_ref().clone())),
        Err(_) => into_response(Reply::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to generate API document",
        )),
    }
}
