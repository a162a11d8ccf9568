//! Arcade adapter
//!
//! Implements the tool catalog, tool invocation and authorization ports
//! against the Arcade REST API.

pub mod authorization;
pub mod catalog;
pub mod client;
pub mod error;
pub mod protocol;
