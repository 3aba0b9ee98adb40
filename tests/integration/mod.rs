//! Integration tests module
//!
//! Library workflows run against a mock package index and repository;
//! CLI tests run the `jarvault` binary in an isolated home directory.

pub mod cli;
pub mod common;
pub mod conflicts;
pub mod install;
pub mod updates;
