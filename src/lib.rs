//! # User Agent
//!
//! A conversational agent that manages user records through a DIAL-hosted
//! chat model.
//!
//! This library provides:
//! - A tool-calling loop that keeps a conversation transcript in sync with the model
//! - Tools for looking up, searching, creating, updating and deleting users
//! - A search-grounded web lookup tool
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Append the user's message to the transcript
//! 2. Send the transcript and the tool schemas to the model
//! 3. Execute any requested tool calls and append their results
//! 4. Repeat until the model answers without requesting tools
//!
//! ## Example
//!
//! ```rust,ignore
//! use user_agent::{agent::{Agent, Transcript, build_system_prompt}, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = Agent::from_config(&config)?;
//! let mut transcript = Transcript::with_system_prompt(build_system_prompt(agent.tools()));
//! transcript.push_user("Get the user information for user ID 1");
//! let reply = agent.get_completion(&mut transcript).await?;
//! ```

pub mod agent;
pub mod config;
pub mod llm;
pub mod tools;

pub use config::Config;
