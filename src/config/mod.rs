//! Configuration modules for the Schoolhub API.
//!
//! Each submodule handles a specific aspect of configuration, typically
//! loaded from environment variables:
//!
//! - [`cors`]: allowed origins for the SPA frontend
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: JWT authentication configuration

pub mod cors;
pub mod database;
pub mod jwt;
