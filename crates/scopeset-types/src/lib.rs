//! Shared types, the storage adapter trait, and core error types for scopeset.
//!
//! This crate contains the foundational types that are shared between the
//! settings engine and every storage adapter implementation. Keeping them in a
//! separate crate lets adapter crates compile without pulling in the engine.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod error;
pub mod prelude;
pub mod settings_adapter;
pub mod types;

// vim: ts=4
