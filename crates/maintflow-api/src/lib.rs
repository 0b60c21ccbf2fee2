//! maintflow application layer: REST API, CLI commands and the state that
//! wires them to the SQLite-backed services.

pub mod cli;
pub mod http;
pub mod state;
