//! Lifecycle hooks for the Player application installer component.
//!
//! The transaction engine calls one subcommand per lifecycle phase. The
//! declarative phases print JSON (questions, install plan); the others apply
//! idempotent side effects to the host and record a per-step summary.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: typed TOML configuration, install layout and plans
//! - **[`resources`]**: idempotent primitives (managed blocks, links, helpers, …)
//! - **[`tasks`]**: named steps grouped into ordered lifecycle phases
//! - **[`commands`]**: top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod tasks;
