//! Task management.
//!
//! Creating, reading, listing, updating, and deleting tasks. Title validation
//! and error classification live in the service; persistence sits behind the
//! repository port. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
