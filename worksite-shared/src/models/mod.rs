//! Database models for Worksite
//!
//! One module per entity, each holding the row struct, the `Create*` /
//! `Update*` input structs, and the CRUD operations against the pool.
//! Handlers never embed SQL; everything goes through these modules.
//!
//! # Models
//!
//! - `user`: User accounts (project owners and task assignees)
//! - `project`: Projects with owner, budget, and schedule
//! - `task`: Tasks assigned to a user within a project
//! - `document`: Text documents attached to a project
//! - `payment`: Payments recorded against a project

pub mod document;
pub mod payment;
pub mod project;
pub mod task;
pub mod user;
