//! spectree: OpenAPI documents and request/response validation generated
//! from the JSON Schema of your models.
//!
//! This facade crate re-exports the core at the top level and each framework
//! adapter behind a feature flag.
//!
//! ```ignore
//! use spectree::prelude::*;
//! ```
//!
//! # Feature flags
//!
//! | Feature    | Default | Crate               |
//! |------------|---------|---------------------|
//! | `axum`     | **yes** | `spectree-axum`     |
//! | `blocking` | no      | `spectree-blocking` |

pub use spectree_core::*;

#[cfg(feature = "axum")]
pub use spectree_axum;

#[cfg(feature = "blocking")]
pub use spectree_blocking;

/// Unified prelude: `use spectree::prelude::*`.
pub mod prelude {
    pub use spectree_core::schemars::JsonSchema;
    pub use spectree_core::{
        Config, DocsUi, Endpoint, IntoReply, Mode, ModelSchema, Reply, ResponseSpec, RouteDoc,
        SpecTree, ValidatedRequest,
    };

    #[cfg(feature = "axum")]
    pub use spectree_axum::{ApiRouter, AxumAdapter};

    #[cfg(feature = "blocking")]
    pub use spectree_blocking::{BlockingAdapter, BlockingRouter};
}
