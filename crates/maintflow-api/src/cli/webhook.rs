//! Webhook configuration CLI commands.

use anyhow::Result;
use clap::Subcommand;
use console::style;
use uuid::Uuid;

use maintflow_types::webhook::WebhookConfig;

use crate::cli::print_json;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum WebhookCommand {
    /// Issue a webhook config and API key for a company.
    Create { company_id: Uuid },

    /// Show a company's webhook config, API key included.
    Show { company_id: Uuid },

    /// Replace the API key. The old key stops working immediately.
    Regenerate { company_id: Uuid },

    /// Accept webhook calls for a company.
    Enable { company_id: Uuid },

    /// Reject webhook calls for a company with 403.
    Disable { company_id: Uuid },

    /// Remove a company's webhook config.
    Delete { company_id: Uuid },
}

pub async fn handle_webhook_command(cmd: WebhookCommand, state: &AppState, json: bool) -> Result<()> {
    let service = &state.webhook_config_service;
    let (config, verb) = match cmd {
        WebhookCommand::Create { company_id } => (service.create(&company_id).await?, "Created"),
        WebhookCommand::Show { company_id } => (service.get(&company_id).await?, ""),
        WebhookCommand::Regenerate { company_id } => {
            (service.regenerate(&company_id).await?, "Regenerated")
        }
        WebhookCommand::Enable { company_id } => {
            (service.set_enabled(&company_id, true).await?, "Enabled")
        }
        WebhookCommand::Disable { company_id } => {
            (service.set_enabled(&company_id, false).await?, "Disabled")
        }
        WebhookCommand::Delete { company_id } => {
            service.delete(&company_id).await?;
            if json {
                return print_json(&serde_json::json!({ "deleted": true, "company_id": company_id }));
            }
            println!();
            println!("  {} Webhook config deleted", style("*").green().bold());
            println!();
            return Ok(());
        }
    };

    if json {
        return print_json(&config);
    }
    render(&config, verb, state);
    Ok(())
}

fn render(config: &WebhookConfig, verb: &str, state: &AppState) {
    println!();
    if !verb.is_empty() {
        println!("  {} {verb} webhook config", style("*").green().bold());
    }
    println!("  Company: {}", config.company_id);
    println!("  API key: {}", style(&config.api_key).yellow().bold());
    let enabled = if config.enabled {
        style("enabled").green()
    } else {
        style("disabled").red()
    };
    println!("  Status:  {enabled}");
    println!(
        "  Endpoint: {}",
        style(format!(
            "POST http://{}:{}/webhooks/grafana  (header X-API-Key)",
            state.config.server.host, state.config.server.port
        ))
        .dim()
    );
    println!();
}
