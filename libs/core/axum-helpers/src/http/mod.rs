//! HTTP middleware module.
//!
//! - CORS configuration
//! - Security headers
//! - Trailing slash normalization
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{create_permissive_cors_layer, security_headers};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn(security_headers))
//!     .layer(create_permissive_cors_layer());
//! ```

pub mod cors;
pub mod normalize;
pub mod security;

pub use cors::{cors_layer_for, create_cors_layer, create_permissive_cors_layer};
pub use normalize::trim_trailing_slash;
pub use security::security_headers;
