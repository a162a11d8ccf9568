//! Use cases (application services)

pub mod authorize_tools;
pub mod confirm_tool;
pub mod reconcile;
pub mod run_turn;
pub mod start_session;
pub mod turn_driver;
