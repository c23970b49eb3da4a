use crate::router::BlockingRouter;
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Method, Request, Response, StatusCode};
use spectree_core::params::{self, Parameter, PathParams};
use spectree_core::{
    ui, Adapter, Endpoint, HandlerRef, RawRequest, Reply, RouteRecord, SharedRouteTable,
    SpecGenerationError, SpecTree, SyncHandler,
};
use std::sync::Arc;

/// Adapter for synchronous handlers, dispatched on the calling thread by a
/// [`BlockingRouter`].
#[derive(Debug, Clone, Default)]
pub struct BlockingAdapter {
    table: SharedRouteTable,
}

impl BlockingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &SharedRouteTable {
        &self.table
    }
}

impl Adapter for BlockingAdapter {
    type Route = RouteRecord;
    type Handler = SyncHandler;
    type Request = Request<Bytes>;
    type Output = Response<Bytes>;
    type App = BlockingRouter;

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
        endpoint: Arc<Endpoint<SyncHandler>>,
        path_params: PathParams,
        request: Request<Bytes>,
    ) -> Response<Bytes> {
        let (parts, body) = request.into_parts();
        let raw = RawRequest::from_parts(parts, path_params, body);
        let reply = match endpoint.before(raw) {
            Ok(request) => endpoint.after((endpoint.handler())(request)),
            Err(reply) => reply,
        };
        reply.into_http()
    }

    fn register_route(tree: &Arc<SpecTree<Self>>, app: BlockingRouter) -> BlockingRouter {
        let config = tree.config();
        let spec_tree = Arc::clone(tree);
        let mut app = app.raw(Method::GET, &config.spec_url(), move |_request| {
            match spec_tree.spec() {
                Ok(spec) => Reply::ok(spec.as_ref().clone()).into_http(),
                Err(_) => Reply::error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate API document",
                )
                .into_http(),
            }
        });

        if let (Some(url), Some(page)) = (config.ui_url(), ui::page(config)) {
            let page = Bytes::from(page);
            app = app.raw(Method::GET, &url, move |_request| {
                let mut response = Response::new(page.clone());
                response.headers_mut().insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("text/html; charset=utf-8"),
                );
                response
            });
        }

        app
    }
}
