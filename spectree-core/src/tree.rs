use crate::adapter::Adapter;
use crate::assembler;
use crate::bypass;
use crate::config::Config;
use crate::decorator::RouteDoc;
use crate::endpoint::Endpoint;
use crate::error::{DeclarationError, SpecGenerationError};
use crate::handler::IntoHandler;
use crate::meta::{HandlerId, HandlerRef, InstanceId, RouteMeta};
use crate::schema::SchemaRegistry;
use serde_json::Value;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// One documentation instance: configuration, framework adapter, the models
/// declared through it, and the lazily built OpenAPI document.
///
/// Decorate every handler during startup, from one thread, before the
/// document is first requested. The document is computed once and never
/// invalidated, so routes added after the first [`spec`](Self::spec) call
/// are not documented. Request-time validation holds no shared mutable
/// state and may run concurrently.
pub struct SpecTree<A: Adapter> {
    id: InstanceId,
    config: Config,
    adapter: A,
    models: Mutex<SchemaRegistry>,
    spec: OnceLock<Arc<Value>>,
}

impl<A: Adapter> SpecTree<A> {
    pub fn new(adapter: A, config: Config) -> Self {
        Self {
            id: InstanceId::next(),
            config,
            adapter,
            models: Mutex::new(SchemaRegistry::new()),
            spec: OnceLock::new(),
        }
    }

    /// Ownership marker stamped on handlers decorated by this instance.
    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Attach documentation metadata to a handler without validating its
    /// requests.
    pub fn doc<F>(&self, doc: RouteDoc, handler: F) -> Result<Endpoint<A::Handler>, DeclarationError>
    where
        F: IntoHandler<A::Handler>,
    {
        self.decorate(doc, false, handler)
    }

    /// Attach documentation metadata and validate requests and responses
    /// against the declared models.
    pub fn validate<F>(
        &self,
        doc: RouteDoc,
        handler: F,
    ) -> Result<Endpoint<A::Handler>, DeclarationError>
    where
        F: IntoHandler<A::Handler>,
    {
        self.decorate(doc, true, handler)
    }

    fn decorate<F>(
        &self,
        doc: RouteDoc,
        validating: bool,
        handler: F,
    ) -> Result<Endpoint<A::Handler>, DeclarationError>
    where
        F: IntoHandler<A::Handler>,
    {
        let id = HandlerId::of::<F>();
        let meta = doc.into_meta(self.id, validating)?;

        {
            let mut models = self.models.lock().unwrap_or_else(PoisonError::into_inner);
            for model in meta.models() {
                models.register(model.name(), model.schema().clone());
            }
        }

        tracing::debug!(
            handler = id.type_name(),
            validating,
            tags = ?meta.tags,
            "decorated handler"
        );

        Ok(Endpoint::new(
            handler.into_handler(),
            HandlerRef::new(id, Some(Arc::new(meta))),
        ))
    }

    /// Whether this instance leaves a route with the given metadata out of
    /// its document, according to the configured mode.
    pub fn bypass(&self, meta: Option<&RouteMeta>) -> bool {
        bypass::should_skip(self.config.mode, self.id, meta)
    }

    /// Copy of the models registered so far.
    pub fn models(&self) -> SchemaRegistry {
        self.models
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The OpenAPI document, generated on first access and cached.
    ///
    /// Every later call returns the same `Arc`. Concurrent first calls may
    /// each build a document but only one is published.
    pub fn spec(&self) -> Result<Arc<Value>, SpecGenerationError> {
        if let Some(spec) = self.spec.get() {
            return Ok(Arc::clone(spec));
        }

        let spec = match assembler::generate(self) {
            Ok(spec) => Arc::new(spec),
            Err(err) => {
                tracing::error!(error = %err, "failed to generate OpenAPI document");
                return Err(err);
            }
        };
        Ok(Arc::clone(self.spec.get_or_init(|| spec)))
    }

    /// Add the document routes to `app` through the adapter.
    pub fn register(self: &Arc<Self>, app: A::App) -> A::App {
        A::register_route(self, app)
    }
}
