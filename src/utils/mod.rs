//! Helpers for the link creation path.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_normalizer`] - Target URL validation and normalization

pub mod code_generator;
pub mod url_normalizer;
