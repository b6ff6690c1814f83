//! # docchat-cli
//!
//! Command-line front end for docchat: argument and environment handling,
//! session assembly, and the interactive console.
//!
//! ```text
//! docchat chat --doc notes.txt
//! docchat --mode detailed ask --doc notes.txt "What is the capital of France?"
//! ```

pub mod app;
pub mod commands;
pub mod config;
pub mod console;

pub use app::build_session;
pub use config::{AppConfig, Cli, Command, Provider};
