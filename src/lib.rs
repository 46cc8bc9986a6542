//! Shelf application library
//!
//! The books module and the bootstrap that wires it to PostgreSQL and the
//! HTTP server.

pub mod app;
pub mod modules;

pub use app::{build_registry, migrate, serve};
pub use modules::*;
