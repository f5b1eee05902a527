mod decider;
mod errors;
mod resolver;

pub use decider::{AccountDecider, Decision, ScriptedDecider, TerminalDecider};
pub use errors::{DecisionError, ResolutionError};
pub use resolver::{DEFAULT_BANK, ResolutionReport, Resolver};
