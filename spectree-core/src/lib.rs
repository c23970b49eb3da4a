pub mod adapter;
mod assembler;
pub mod bypass;
pub mod comments;
pub mod config;
pub mod decorator;
pub mod endpoint;
pub mod error;
pub mod handler;
pub mod layers;
pub mod meta;
pub mod model;
pub mod params;
pub mod reply;
pub mod response;
pub mod routes;
pub mod schema;
pub mod tree;
pub mod ui;
pub mod validation;

pub use adapter::{is_undocumented_method, Adapter};
pub use config::{Config, ConfigError, DocsUi, Mode};
pub use decorator::RouteDoc;
pub use endpoint::Endpoint;
pub use error::{
    DeclarationError, FieldError, RequestValidationError, ResponseValidationError,
    SpecGenerationError,
};
pub use handler::{AsyncHandler, IntoHandler, SyncHandler};
pub use layers::init_tracing;
pub use meta::{HandlerId, HandlerRef, InstanceId, Role, RouteMeta};
pub use model::ModelSchema;
pub use params::{ParamLocation, Parameter, PathParams};
pub use reply::{IntoReply, Reply};
pub use response::ResponseSpec;
pub use routes::{RouteRecord, RouteTable, SharedRouteTable};
pub use schema::SchemaRegistry;
pub use tree::SpecTree;
pub use validation::{RawRequest, ValidatedRequest};

pub use schemars;
