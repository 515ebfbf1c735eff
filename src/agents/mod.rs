//! Agent personas and the run loop
//!
//! Three fixed personas (news/"web", finance, and the unreachable search
//! persona) plus one two-member team, built once at startup. The runner
//! executes one query per user action through a native tool-calling loop
//! and classifies the result as answered, empty, or failed.

pub mod config;
pub mod registry;
pub mod runner;
pub mod selection;

pub use config::{AgentConfig, TeamConfig};
pub use registry::AgentRegistry;
pub use runner::{AgentRunner, RunOutcome, ToolCallRecord};
pub use selection::{AgentChoice, Selected};

#[cfg(test)]
mod runner_tests;
