use crate::adapter::AxumAdapter;
use axum::extract::{RawPathParams, Request};
use axum::handler::Handler;
use axum::routing::{on, MethodFilter, MethodRouter};
use axum::Router;
use http::Method;
use spectree_core::params::PathParams;
use spectree_core::{Adapter, AsyncHandler, Endpoint, HandlerId, HandlerRef, SpecTree};
use std::sync::Arc;

struct Mounted<S> {
    path: String,
    method: Method,
    route: MethodRouter<S>,
}

/// Router builder that records every mounted route for the document.
///
/// Paths use axum's syntax (`/users/{id}`, `/files/{*rest}`) and must be the
/// full paths the routes are served at. Mounting the same path and method
/// twice keeps the last handler.
///
/// ```ignore
/// let tree = Arc::new(SpecTree::new(AxumAdapter::new(), Config::default()));
/// let users = tree.validate(RouteDoc::new().query::<Page>(), list_users)?;
///
/// let app = ApiRouter::new(&tree)
///     .endpoint(Method::GET, "/users", users)
///     .into_router();
/// let app = tree.register(app);
/// ```
pub struct ApiRouter<S = ()> {
    tree: Arc<SpecTree<AxumAdapter>>,
    routes: Vec<Mounted<S>>,
}

impl<S> ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(tree: &Arc<SpecTree<AxumAdapter>>) -> Self {
        Self {
            tree: Arc::clone(tree),
            routes: Vec::new(),
        }
    }

    /// Mount a decorated (or plain) endpoint. Requests go through the
    /// adapter's validation.
    pub fn endpoint(self, method: Method, path: &str, endpoint: Endpoint<AsyncHandler>) -> Self {
        let target = endpoint.target().clone();
        let adapter = self.tree.adapter().clone();
        let endpoint = Arc::new(endpoint);

        let handler = move |raw: RawPathParams, request: Request| {
            let path_params: PathParams = raw
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            adapter.validate(Arc::clone(&endpoint), path_params, request)
        };

        self.mount(method, path, target, handler)
    }

    /// Mount a native axum handler. It is documented without models,
    /// summary or tags.
    pub fn handler<H, T>(self, method: Method, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let target = HandlerRef::new(HandlerId::of::<H>(), None);
        self.mount(method, path, target, handler)
    }

    /// Mount a native axum handler kept out of the document.
    pub fn hidden<H, T>(self, method: Method, path: &str, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let target = HandlerRef::new(HandlerId::of::<H>(), None).hidden();
        self.mount(method, path, target, handler)
    }

    fn mount<H, T>(mut self, method: Method, path: &str, target: HandlerRef, handler: H) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        let filter = match MethodFilter::try_from(method.clone()) {
            Ok(filter) => filter,
            Err(_) => {
                tracing::warn!(path, %method, "method not routable by axum; route skipped");
                return self;
            }
        };

        self.tree
            .adapter()
            .table()
            .write()
            .insert(path, method.clone(), target);

        self.routes.retain(|r| !(r.path == path && r.method == method));
        self.routes.push(Mounted {
            path: path.to_string(),
            method,
            route: on(filter, handler),
        });
        self
    }

    /// Build the axum router. Call [`SpecTree::register`] on the result (or
    /// on the router it is merged into) to serve the document.
    pub fn into_router(self) -> Router<S> {
        let mut paths: Vec<(String, MethodRouter<S>)> = Vec::new();
        for mounted in self.routes {
            match paths.iter_mut().find(|(path, _)| *path == mounted.path) {
                Some((_, route)) => {
                    let merged = std::mem::take(route).merge(mounted.route);
                    *route = merged;
                }
                None => paths.push((mounted.path, mounted.route)),
            }
        }

        paths
            .into_iter()
            .fold(Router::new(), |router, (path, route)| router.route(&path, route))
    }
}
