//! Taskforge: task CRUD service over a relational store.
//!
//! This crate provides the request-handling pipeline for a task service:
//! domain validation, a repository contract with per-request deadlines, and
//! a transport adapter that maps failures onto stable status codes.
//!
//! # Architecture
//!
//! Taskforge follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, HTTP)
//!
//! # Modules
//!
//! - [`task`]: Task domain, repository port, service, and adapters
//! - [`context`]: Per-request deadline propagation
//! - [`config`]: Server configuration from flags and environment
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod context;
pub mod task;
pub mod telemetry;
