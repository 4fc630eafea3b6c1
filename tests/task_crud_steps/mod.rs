//! Step definitions for task CRUD scenarios.

pub mod when;
pub mod world;
