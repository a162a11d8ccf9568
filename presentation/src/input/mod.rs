//! Shared line input for the console and the confirmation prompt.

mod lines;

pub use lines::LineSource;
