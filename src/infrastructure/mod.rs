//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`probe`] - HTTP liveness probing for the link monitor

pub mod persistence;
pub mod probe;
