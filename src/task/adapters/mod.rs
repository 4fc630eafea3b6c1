//! Adapter implementations for task ports.
//!
//! - [`memory`]: in-process repository for tests and local runs
//! - [`sqlite`]: Diesel-backed `SQLite` repository and store bootstrap
//! - [`http`]: axum transport translating requests into service calls

pub mod http;
pub mod memory;
pub mod sqlite;
