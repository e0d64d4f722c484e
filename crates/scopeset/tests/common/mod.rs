//! Common test utilities and helpers
//!
//! Shared adapter builders and fixtures for the settings integration tests.

#![allow(dead_code)]

pub mod adapters;
pub mod fixtures;

pub use adapters::*;
pub use fixtures::*;

// vim: ts=4
