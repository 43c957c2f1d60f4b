//! # Workforce Core
//!
//! Core business logic for attendance tracking and credential lifecycles.
//! This crate contains domain entities, business services, repository interfaces,
//! collaborator traits and error types that form the foundation of the workspace.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
