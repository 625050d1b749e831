//! Middleware modules for request processing.
//!
//! - [`auth`]: bearer-token authentication extractor
//! - [`role`]: role parsing and authorization checks
//!
//! # Authentication Flow
//!
//! 1. Client sends a request with an `Authorization: Bearer <token>` header
//! 2. The [`auth::AuthUser`] extractor validates the JWT and exposes its claims
//! 3. Controllers apply role checks with the [`role`] helpers
//! 4. The handler executes if all checks pass

pub mod auth;
pub mod role;
