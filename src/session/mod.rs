pub mod builder;
pub mod runner;

pub use builder::Session;
pub use runner::{RateOutcome, SessionRunner, SessionState, SessionSummary};
