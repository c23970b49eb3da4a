use crate::adapter::BlockingAdapter;
use bytes::Bytes;
use http::header::{HeaderValue, ALLOW};
use http::{Method, Request, Response, StatusCode};
use spectree_core::params::{self, PathParams};
use spectree_core::{Adapter, Endpoint, HandlerId, HandlerRef, Reply, SpecTree, SyncHandler};
use std::sync::Arc;

type RawHandler = dyn Fn(Request<Bytes>) -> Response<Bytes> + Send + Sync;

#[derive(Clone)]
enum Target {
    Endpoint(Arc<Endpoint<SyncHandler>>),
    Raw(Arc<RawHandler>),
}

#[derive(Clone)]
struct Route {
    path: String,
    method: Method,
    target: Target,
}

/// Literal segments first, then single-segment placeholders; a catch-all
/// ranks below any template without one.
fn specificity(template: &str) -> (bool, usize, usize) {
    let segments: Vec<&str> = template.trim_start_matches('/').split('/').collect();
    let catch_all = segments.iter().any(|s| s.starts_with("{*"));
    let literal = segments.iter().filter(|s| !s.starts_with('{')).count();
    (!catch_all, literal, segments.len())
}

/// In-process dispatcher from `http::Request<Bytes>` to
/// `http::Response<Bytes>`.
///
/// Routes match on `{name}` templates. When several templates match, the one
/// with the most literal segments wins (`/items/new` before `/items/{id}`,
/// catch-alls last), then the earliest registered. A path that matches with
/// no route for the method gets `405` with an `Allow` header, anything else
/// `404`.
#[derive(Clone)]
pub struct BlockingRouter {
    tree: Arc<SpecTree<BlockingAdapter>>,
    routes: Vec<Route>,
}

impl BlockingRouter {
    pub fn new(tree: &Arc<SpecTree<BlockingAdapter>>) -> Self {
        Self {
            tree: Arc::clone(tree),
            routes: Vec::new(),
        }
    }

    /// Mount an endpoint; requests go through the adapter's validation.
    pub fn endpoint(self, method: Method, path: &str, endpoint: Endpoint<SyncHandler>) -> Self {
        let target = endpoint.target().clone();
        self.mount(method, path, target, Target::Endpoint(Arc::new(endpoint)))
    }

    /// Mount a handler working on raw `http` types. It is never documented.
    pub fn raw<F>(self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(Request<Bytes>) -> Response<Bytes> + Send + Sync + 'static,
    {
        let target = HandlerRef::new(HandlerId::of::<F>(), None).hidden();
        self.mount(method, path, target, Target::Raw(Arc::new(handler)))
    }

    fn mount(mut self, method: Method, path: &str, handler: HandlerRef, target: Target) -> Self {
        self.tree
            .adapter()
            .table()
            .write()
            .insert(path, method.clone(), handler);

        self.routes
            .retain(|route| !(route.path == path && route.method == method));
        self.routes.push(Route {
            path: path.to_string(),
            method,
            target,
        });
        self
    }

    /// Dispatch one request.
    pub fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        let path = request.uri().path().to_string();
        let mut allowed: Vec<&Method> = Vec::new();
        let mut found: Option<(&Route, PathParams)> = None;

        for route in &self.routes {
            let Some(params) = params::match_path(&route.path, &path) else {
                continue;
            };
            if route.method != request.method() {
                if !allowed.contains(&&route.method) {
                    allowed.push(&route.method);
                }
                continue;
            }
            let better = found
                .as_ref()
                .map_or(true, |(best, _)| specificity(&route.path) > specificity(&best.path));
            if better {
                found = Some((route, params));
            }
        }

        let Some((route, path_params)) = found else {
            if allowed.is_empty() {
                tracing::debug!(%path, "no route");
                return Reply::error(StatusCode::NOT_FOUND, "Not Found").into_http();
            }
            tracing::debug!(%path, method = %request.method(), "method not allowed");
            let allow = allowed
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let mut response =
                Reply::error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_http();
            if let Ok(value) = HeaderValue::from_str(&allow) {
                response.headers_mut().insert(ALLOW, value);
            }
            return response;
        };

        match &route.target {
            Target::Endpoint(endpoint) => {
                self.tree
                    .adapter()
                    .validate(Arc::clone(endpoint), path_params, request)
            }
            Target::Raw(handler) => handler(request),
        }
    }
}
