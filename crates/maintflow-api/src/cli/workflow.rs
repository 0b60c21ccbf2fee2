//! Workflow CLI commands.
//!
//! Workflows are created from a JSON file holding a create request
//! (`title`, `mainCondition`, `conditions`, `action`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use uuid::Uuid;

use maintflow_core::workflow::plan_gate::PlanGateReport;
use maintflow_types::workflow::{CreateWorkflowRequest, Workflow};

use crate::cli::print_json;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum WorkflowCommand {
    /// Create a workflow from a JSON file.
    Create {
        company_id: Uuid,

        /// Path to the workflow JSON file.
        file: PathBuf,
    },

    /// List a company's workflows, oldest first.
    List { company_id: Uuid },

    /// Show one workflow with its conditions and action.
    Show { company_id: Uuid, id: Uuid },

    /// Delete a workflow.
    Delete { company_id: Uuid, id: Uuid },

    /// Enable one workflow.
    Enable { company_id: Uuid, id: Uuid },

    /// Disable one workflow.
    Disable { company_id: Uuid, id: Uuid },

    /// Restricted plan: keep only the earliest workflow enabled.
    DisableExtra { company_id: Uuid },

    /// Unrestricted plan: enable every workflow.
    EnableAll { company_id: Uuid },
}

pub async fn handle_workflow_command(
    cmd: WorkflowCommand,
    state: &AppState,
    json: bool,
) -> Result<()> {
    let service = &state.workflow_service;
    match cmd {
        WorkflowCommand::Create { company_id, file } => {
            let request = load_request(&file).await?;
            let workflow = service.create(&company_id, request).await?;
            if json {
                return print_json(&workflow);
            }
            println!();
            println!(
                "  {} Created workflow '{}'",
                style("*").green().bold(),
                style(&workflow.title).cyan()
            );
            println!("  ID: {}", workflow.id);
            println!("  Trigger: {}", workflow.main_condition);
            println!("  Conditions: {}", workflow.conditions.len());
            println!();
        }
        WorkflowCommand::List { company_id } => {
            let workflows = service.list(&company_id).await?;
            if json {
                return print_json(&workflows);
            }
            render_list(&workflows);
        }
        WorkflowCommand::Show { company_id, id } => {
            let workflow = service.get(&company_id, &id).await?;
            if json {
                return print_json(&workflow);
            }
            println!();
            println!("  {}", style(&workflow.title).cyan().bold());
            println!("  ID:      {}", workflow.id);
            println!("  Trigger: {}", workflow.main_condition);
            println!("  Enabled: {}", workflow.enabled);
            println!(
                "  Conditions:\n{}",
                serde_json::to_string_pretty(&workflow.conditions)?
            );
            println!("  Action:\n{}", serde_json::to_string_pretty(&workflow.action)?);
            println!();
        }
        WorkflowCommand::Delete { company_id, id } => {
            service.delete(&company_id, &id).await?;
            if json {
                return print_json(&serde_json::json!({ "deleted": true, "id": id }));
            }
            println!();
            println!("  {} Workflow {id} deleted", style("*").green().bold());
            println!();
        }
        WorkflowCommand::Enable { company_id, id } => {
            toggle(state, &company_id, &id, true, json).await?;
        }
        WorkflowCommand::Disable { company_id, id } => {
            toggle(state, &company_id, &id, false, json).await?;
        }
        WorkflowCommand::DisableExtra { company_id } => {
            let report = service.disable_workflows(&company_id).await?;
            render_report(&report, "Restricted plan applied", json)?;
        }
        WorkflowCommand::EnableAll { company_id } => {
            let report = service.enable_workflows(&company_id).await?;
            render_report(&report, "All workflows enabled", json)?;
        }
    }
    Ok(())
}

async fn toggle(state: &AppState, company_id: &Uuid, id: &Uuid, enabled: bool, json: bool) -> Result<()> {
    let workflow = state.workflow_service.set_enabled(company_id, id, enabled).await?;
    if json {
        return print_json(&workflow);
    }
    println!();
    println!(
        "  {} '{}' is now {}",
        style("*").green().bold(),
        workflow.title,
        if enabled { "enabled" } else { "disabled" }
    );
    println!();
    Ok(())
}

async fn load_request(file: &Path) -> Result<CreateWorkflowRequest> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid workflow JSON in {}", file.display()))
}

fn render_list(workflows: &[Workflow]) {
    if workflows.is_empty() {
        println!();
        println!("  No workflows.");
        println!(
            "  Create one with: {}",
            style("maintflow workflow create <company-id> <file.json>").dim()
        );
        println!();
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Title").fg(Color::Cyan),
            Cell::new("Trigger"),
            Cell::new("Conditions"),
            Cell::new("Enabled"),
            Cell::new("Created"),
            Cell::new("ID"),
        ]);

    for w in workflows {
        let enabled = if w.enabled {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(&w.title),
            Cell::new(w.main_condition),
            Cell::new(w.conditions.len()),
            enabled,
            Cell::new(w.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(w.id),
        ]);
    }

    println!();
    println!("{table}");
    println!();
}

fn render_report(report: &PlanGateReport, headline: &str, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }
    println!();
    println!("  {} {headline}", style("*").green().bold());
    if let Some(kept) = report.kept {
        println!("  Kept enabled: {kept}");
    }
    println!("  Workflows updated: {}", report.updated);
    println!();
    Ok(())
}
