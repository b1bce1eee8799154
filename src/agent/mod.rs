//! Agent module - the tool-calling conversation loop.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Send the transcript and the tool schemas to the model
//! 2. If the model requests tool calls, execute them in order and append the results
//! 3. Repeat until the model answers without tool calls or the round budget runs out

mod agent_loop;
mod prompt;
mod transcript;

pub use agent_loop::{Agent, AgentError};
pub use prompt::build_system_prompt;
pub use transcript::Transcript;
