//! Core namespace machinery
//!
//! Everything here operates on local paths and in-memory trees; fetching
//! bytes from the network belongs in [`crate::infra`].
//!
//! # Submodules
//!
//! - [`node`] - Lazy nodes and the resolution protocol
//! - [`scanner`] - Structure scanning of local directories
//! - [`cache`] - Process-lifetime repository cache
//! - [`manager`] - Import/refresh/invalidate orchestration
//! - [`render`] - Directory tree rendering

pub mod cache;
pub mod manager;
pub mod node;
pub mod render;
pub mod scanner;
