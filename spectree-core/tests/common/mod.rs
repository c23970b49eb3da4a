#![allow(dead_code)]

use http::Method;
use spectree_core::params::{self, Parameter, PathParams};
use spectree_core::{
    Adapter, Config, Endpoint, HandlerRef, RawRequest, Reply, RouteRecord, SharedRouteTable,
    SpecGenerationError, SpecTree, SyncHandler,
};
use std::sync::Arc;

/// Minimal adapter over a shared route table, calling handlers inline.
#[derive(Clone, Default)]
pub struct TableAdapter {
    pub table: SharedRouteTable,
}

impl Adapter for TableAdapter {
    type Route = RouteRecord;
    type Handler = SyncHandler;
    type Request = RawRequest;
    type Output = Reply;
    type App = Vec<String>;

    fn find_routes(&self) -> Vec<RouteRecord> {
        self.table.snapshot()
    }

    fn parse_path(&self, route: &RouteRecord) -> Result<(String, Vec<Parameter>), SpecGenerationError> {
        params::parse_template(route.path())
    }

    fn parse_func(&self, route: &RouteRecord) -> Vec<(Method, HandlerRef)> {
        route.methods().to_vec()
    }

    fn validate(
        &self,
        endpoint: Arc<Endpoint<SyncHandler>>,
        path_params: PathParams,
        mut request: RawRequest,
    ) -> Reply {
        request.path_params = path_params;
        match endpoint.before(request) {
            Ok(request) => endpoint.after((endpoint.handler())(request)),
            Err(reply) => reply,
        }
    }

    fn register_route(tree: &Arc<SpecTree<Self>>, mut app: Vec<String>) -> Vec<String> {
        app.push(tree.config().spec_url());
        app
    }
}

pub fn tree(config: Config) -> SpecTree<TableAdapter> {
    SpecTree::new(TableAdapter::default(), config)
}

/// Tree sharing the route table of another one.
pub fn sibling(of: &SpecTree<TableAdapter>, config: Config) -> SpecTree<TableAdapter> {
    SpecTree::new(of.adapter().clone(), config)
}

pub fn mount(tree: &SpecTree<TableAdapter>, method: Method, path: &str, endpoint: &Endpoint<SyncHandler>) {
    tree.adapter()
        .table
        .write()
        .insert(path, method, endpoint.target().clone());
}
