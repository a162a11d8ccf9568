//! Human-in-the-loop confirmation domain.
//!
//! - [`policy::ConfirmationPolicy`]: which tool names are gated
//! - [`decision::HumanDecision`] / [`decision::ConfirmationMode`]: the human's answer and where it comes from
//! - [`decision::ConfirmationState`]: per-call state machine
//! - [`outcome::GateOutcome`]: executed result or [`outcome::DenialSignal`]

pub mod decision;
pub mod outcome;
pub mod policy;

pub use decision::{ConfirmationMode, ConfirmationState, HumanDecision};
pub use outcome::{DenialSignal, GateOutcome};
pub use policy::{ConfirmationPolicy, DEFAULT_GATED_TOOLS};
