//! CLI command definitions for the `maintflow` binary.
//!
//! Uses clap derive macros. Commands follow a noun-verb pattern
//! (e.g. `maintflow webhook create <company>`, `maintflow workflow list <company>`).

pub mod company;
pub mod webhook;
pub mod workflow;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use maintflow_observe::tracing_setup::LogFormat;

/// Event-condition-action workflows for maintenance teams.
#[derive(Parser)]
#[command(name = "maintflow", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format: `pretty` or `json`.
    #[arg(long, global = true, env = "MAINTFLOW_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "MAINTFLOW_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log filter for the chosen verbosity. The server logs at
    /// `info` unless asked to be quiet.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 if matches!(self.command, Commands::Serve { .. }) => "info",
            0 => "warn",
            1 => "info,maintflow=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API and webhook server.
    Serve {
        /// Port to listen on (defaults to `server.port` from config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host` from config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Manage companies and their administrators.
    Company {
        #[command(subcommand)]
        action: company::CompanyCommand,
    },

    /// Manage a company's webhook configuration and API key.
    Webhook {
        #[command(subcommand)]
        action: webhook::WebhookCommand,
    },

    /// Manage workflows.
    Workflow {
        #[command(subcommand)]
        action: workflow::WorkflowCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Pretty-print a value as JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
