//! # Worksite Shared Library
//!
//! This crate contains the persistence layer and shared utilities used by the
//! Worksite API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and CRUD operations
//! - `db`: Connection pool and migration runner
//! - `auth`: Password hashing

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Worksite shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
