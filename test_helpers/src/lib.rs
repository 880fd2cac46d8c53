//! Test helpers shared across crates.
//!
//! This crate provides environment variable guards and the hierarchy
//! documents used by the resolver and CLI test suites.

pub mod documents;
pub mod env;
