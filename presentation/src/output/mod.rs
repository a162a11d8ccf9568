//! Console output: turn I/O and authorization notices.

pub mod authorization;
pub mod console;
