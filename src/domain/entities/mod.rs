//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL mapping with its last known health
//! - [`Click`] - A persisted click on a shortened link
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with separate structs for writes:
//! - `NewLink`, `NewClick` - For creating new records
//! - `LinkHealth` - For the monitor's health updates

pub mod click;
pub mod link;

pub use click::{Click, NewClick};
pub use link::{Link, LinkHealth, NewLink};
