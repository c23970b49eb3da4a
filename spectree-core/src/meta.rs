use crate::comments;
use crate::model::ModelSchema;
use crate::params::ParamLocation;
use crate::response::ResponseSpec;
use std::any::TypeId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The part of a request a model describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Query,
    Json,
    Headers,
    Cookies,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Query, Role::Json, Role::Headers, Role::Cookies];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Query => "query",
            Role::Json => "json",
            Role::Headers => "headers",
            Role::Cookies => "cookies",
        }
    }

    /// Parameter location for roles documented as parameters (the JSON body
    /// is documented as a request body instead).
    pub fn location(&self) -> Option<ParamLocation> {
        match self {
            Role::Query => Some(ParamLocation::Query),
            Role::Headers => Some(ParamLocation::Header),
            Role::Cookies => Some(ParamLocation::Cookie),
            Role::Json => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one documentation instance, used as the ownership marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        InstanceId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Identity of a handler function.
///
/// Every function item and closure has its own type, so the `TypeId` of the
/// handler type identifies it without touching the callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId {
    type_id: TypeId,
    type_name: &'static str,
}

impl HandlerId {
    pub fn of<F: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<F>(),
            type_name: std::any::type_name::<F>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Short name used in operation ids, e.g. `list_users`.
    pub fn operation_name(&self) -> String {
        comments::parse_name(self.type_name)
    }
}

/// Validation and documentation metadata of one decorated handler.
///
/// Built once at decoration time and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RouteMeta {
    pub owner: InstanceId,
    pub query: Option<ModelSchema>,
    pub json: Option<ModelSchema>,
    pub headers: Option<ModelSchema>,
    pub cookies: Option<ModelSchema>,
    pub response: Option<ResponseSpec>,
    pub tags: Vec<String>,
    pub comment: Option<String>,
    pub validating: bool,
}

impl RouteMeta {
    pub fn model(&self, role: Role) -> Option<&ModelSchema> {
        match role {
            Role::Query => self.query.as_ref(),
            Role::Json => self.json.as_ref(),
            Role::Headers => self.headers.as_ref(),
            Role::Cookies => self.cookies.as_ref(),
        }
    }

    /// Name recorded for a role, if a model was declared for it.
    pub fn model_name(&self, role: Role) -> Option<&str> {
        self.model(role).map(ModelSchema::name)
    }

    pub fn has_request_models(&self) -> bool {
        Role::ALL.iter().any(|role| self.model(*role).is_some())
    }

    /// Every model this route references, request side first.
    pub fn models(&self) -> impl Iterator<Item = &ModelSchema> {
        Role::ALL
            .into_iter()
            .filter_map(move |role| self.model(role))
            .chain(self.response.iter().flat_map(ResponseSpec::models))
    }
}

/// A handler as seen by a route table: its identity, its metadata if it
/// was decorated, and whether the adapter keeps it out of the document.
#[derive(Debug, Clone)]
pub struct HandlerRef {
    id: HandlerId,
    meta: Option<Arc<RouteMeta>>,
    hidden: bool,
}

impl HandlerRef {
    pub fn new(id: HandlerId, meta: Option<Arc<RouteMeta>>) -> Self {
        Self {
            id,
            meta,
            hidden: false,
        }
    }

    /// Mark the handler as excluded from the generated document.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn id(&self) -> HandlerId {
        self.id
    }

    pub fn meta(&self) -> Option<&RouteMeta> {
        self.meta.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}
