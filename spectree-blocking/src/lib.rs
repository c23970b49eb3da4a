//! Blocking integration for spectree.
//!
//! Handlers are plain functions `Fn(ValidatedRequest) -> impl IntoReply`,
//! called on the thread that dispatches the request through a
//! [`BlockingRouter`].

pub mod adapter;
pub mod router;

pub use adapter::BlockingAdapter;
pub use router::BlockingRouter;

/// Documentation instance bound to the blocking adapter.
pub type BlockingSpecTree = spectree_core::SpecTree<BlockingAdapter>;
