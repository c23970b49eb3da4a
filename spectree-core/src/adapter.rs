use crate::endpoint::Endpoint;
use crate::error::SpecGenerationError;
use crate::meta::HandlerRef;
use crate::params::{Parameter, PathParams};
use crate::tree::SpecTree;
use http::Method;
use std::sync::Arc;

/// The contract between a documentation instance and one web framework.
///
/// The associated `Handler` type fixes the calling convention of every
/// handler decorated through the instance: [`SyncHandler`] for frameworks
/// that call handlers on a thread pool, [`AsyncHandler`] for frameworks that
/// await them.
///
/// [`SyncHandler`]: crate::handler::SyncHandler
/// [`AsyncHandler`]: crate::handler::AsyncHandler
pub trait Adapter: Send + Sync + Sized + 'static {
    /// Opaque handle of one route in the framework's routing table.
    type Route;
    /// Erased handler type.
    type Handler: ?Sized + Send + Sync + 'static;
    /// The framework's native request.
    type Request;
    /// What a validated call returns: a native response, or a future of one.
    type Output;
    /// The host application the documentation routes are added to.
    type App;

    /// Every route currently known to the framework.
    fn find_routes(&self) -> Vec<Self::Route>;

    /// Normalized `{name}` path template and the parameters it implies.
    fn parse_path(&self, route: &Self::Route)
        -> Result<(String, Vec<Parameter>), SpecGenerationError>;

    /// The `(method, handler)` pairs mounted on a route.
    fn parse_func(&self, route: &Self::Route) -> Vec<(Method, HandlerRef)>;

    /// Framework-specific exclusion from the document.
    fn bypass(&self, handler: &HandlerRef, method: &Method) -> bool {
        handler.is_hidden() || is_undocumented_method(method)
    }

    /// Parse, validate, invoke and validate the response of one request.
    fn validate(
        &self,
        endpoint: Arc<Endpoint<Self::Handler>>,
        path_params: PathParams,
        request: Self::Request,
    ) -> Self::Output;

    /// Add the routes serving the document (and its UI page) to `app`.
    fn register_route(tree: &Arc<SpecTree<Self>>, app: Self::App) -> Self::App;
}

/// Methods that frameworks answer implicitly and that are never documented.
pub fn is_undocumented_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::HEAD | Method::OPTIONS | Method::TRACE | Method::CONNECT
    )
}
