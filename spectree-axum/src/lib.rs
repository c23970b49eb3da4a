//! Axum integration for spectree.
//!
//! [`AxumAdapter`] plugs a [`SpecTree`](spectree_core::SpecTree) into axum:
//! handlers are async, mounted through [`ApiRouter`], and the OpenAPI
//! document is served at `GET /{path}/{filename}` once
//! [`SpecTree::register`](spectree_core::SpecTree::register) is called on the
//! built router.

pub mod adapter;
pub mod router;

pub use adapter::{into_response, AxumAdapter, DEFAULT_BODY_LIMIT};
pub use router::ApiRouter;

/// Documentation instance bound to axum.
pub type AxumSpecTree = spectree_core::SpecTree<AxumAdapter>;
