//! Handler calling conventions.
//!
//! An adapter picks one of these as its `Handler` type, which fixes for the
//! whole documentation instance whether handlers block or are awaited.

use crate::reply::{IntoReply, Reply};
use crate::validation::ValidatedRequest;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::future::Future;
use std::sync::Arc;

/// A handler that runs to completion on the calling thread.
pub type SyncHandler = dyn Fn(ValidatedRequest) -> Reply + Send + Sync;

/// A handler that is awaited on the host's async runtime.
pub type AsyncHandler = dyn Fn(ValidatedRequest) -> BoxFuture<'static, Reply> + Send + Sync;

/// Conversion of a user function into the erased handler type `H`.
pub trait IntoHandler<H: ?Sized>: Send + Sync + 'static {
    fn into_handler(self) -> Arc<H>;
}

impl<F, R> IntoHandler<SyncHandler> for F
where
    F: Fn(ValidatedRequest) -> R + Send + Sync + 'static,
    R: IntoReply,
{
    fn into_handler(self) -> Arc<SyncHandler> {
        let handler = self;
        Arc::new(move |request: ValidatedRequest| handler(request).into_reply())
    }
}

impl<F, Fut> IntoHandler<AsyncHandler> for F
where
    F: Fn(ValidatedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: IntoReply,
{
    fn into_handler(self) -> Arc<AsyncHandler> {
        let handler = self;
        Arc::new(move |request: ValidatedRequest| -> BoxFuture<'static, Reply> {
            let future = handler(request);
            async move { future.await.into_reply() }.boxed()
        })
    }
}
