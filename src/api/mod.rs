//! HTTP ingress: two routes over a shared [`crate::DocumentPipeline`].
//!
//! | Method | Path            | Body                      | Response          |
//! |--------|-----------------|---------------------------|-------------------|
//! | GET    | `/`             |                           | `{"message": …}`  |
//! | POST   | `/extract-text/`| multipart, field `file`   | `{"text": …}`     |
//!
//! Errors are `{"detail": …}` with the status from [`error::ApiError`].

pub mod error;
pub mod handlers;
pub mod router;

pub use error::ApiError;
pub use router::{cors_layer, router};
