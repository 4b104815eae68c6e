//! Repository trait definitions for the domain layer.
//!
//! These traits are the storage contract consumed by the click pipeline, the
//! link monitor and the HTTP services. Implementations live in
//! `crate::infrastructure::persistence`; mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link creation, lookup, enumeration and health updates
//! - [`ClickRepository`] - Click recording and counting

pub mod click_repository;
pub mod link_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
