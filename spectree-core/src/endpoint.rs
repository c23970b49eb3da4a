use crate::handler::IntoHandler;
use crate::meta::{HandlerId, HandlerRef, RouteMeta};
use crate::reply::{IntoReply, Reply};
use crate::validation::{self, RawRequest, ValidatedRequest};
use std::sync::Arc;

/// A handler ready to be mounted on a route: the erased callable plus the
/// identity and metadata the route table records for it.
///
/// Decorated endpoints come from [`SpecTree::doc`](crate::SpecTree::doc) and
/// [`SpecTree::validate`](crate::SpecTree::validate); [`Endpoint::plain`]
/// wraps an undecorated handler.
pub struct Endpoint<H: ?Sized> {
    handler: Arc<H>,
    target: HandlerRef,
}

impl<H: ?Sized> Endpoint<H> {
    pub(crate) fn new(handler: Arc<H>, target: HandlerRef) -> Self {
        Self { handler, target }
    }

    /// Wrap a handler that carries no documentation metadata.
    pub fn plain<F>(handler: F) -> Self
    where
        F: IntoHandler<H>,
    {
        Self::new(
            handler.into_handler(),
            HandlerRef::new(HandlerId::of::<F>(), None),
        )
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn target(&self) -> &HandlerRef {
        &self.target
    }

    pub fn meta(&self) -> Option<&RouteMeta> {
        self.target.meta()
    }

    pub fn is_validating(&self) -> bool {
        self.meta().is_some_and(|meta| meta.validating)
    }

    /// Keep this endpoint out of the generated document.
    pub fn hidden(mut self) -> Self {
        self.target = self.target.hidden();
        self
    }

    /// Parse the request and, for validating endpoints, check it.
    ///
    /// `Err` carries the `422` reply to send instead of calling the handler.
    pub fn before(&self, raw: RawRequest) -> Result<ValidatedRequest, Reply> {
        validation::validate_request(self.meta(), raw, self.is_validating()).map_err(|err| {
            tracing::debug!(
                handler = self.target.id().type_name(),
                errors = ?err.errors,
                "request validation failed"
            );
            err.into_reply()
        })
    }

    /// Check the handler's reply against the declared response model.
    ///
    /// A mismatch is logged and replaced by a `500` reply.
    pub fn after(&self, reply: Reply) -> Reply {
        let Some(meta) = self.meta().filter(|meta| meta.validating) else {
            return reply;
        };
        match validation::validate_response(meta, &reply) {
            Ok(()) => reply,
            Err(err) => {
                tracing::error!(
                    handler = self.target.id().type_name(),
                    status = %err.status,
                    model = %err.model,
                    errors = ?err.errors,
                    "response validation failed"
                );
                err.into_reply()
            }
        }
    }
}

impl<H: ?Sized> Clone for Endpoint<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            target: self.target.clone(),
        }
    }
}
