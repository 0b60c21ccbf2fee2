//! Company CLI commands: create, add-admin, show.

use anyhow::{Result, anyhow};
use clap::Subcommand;
use console::style;
use uuid::Uuid;

use crate::cli::print_json;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum CompanyCommand {
    /// Create a company.
    Create {
        /// Company name.
        name: String,

        /// Email of a first administrator (receives webhook failure mail).
        #[arg(long)]
        admin_email: Option<String>,
    },

    /// Add an administrator to a company.
    AddAdmin {
        company_id: Uuid,
        email: String,
    },

    /// Show a company.
    Show { company_id: Uuid },
}

pub async fn handle_company_command(cmd: CompanyCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        CompanyCommand::Create { name, admin_email } => {
            let (company, admin) = state
                .company_service
                .create(&name, admin_email.as_deref())
                .await?;
            if json {
                return print_json(&serde_json::json!({ "company": company, "admin": admin }));
            }
            println!();
            println!(
                "  {} Created company '{}'",
                style("*").green().bold(),
                style(&company.name).cyan()
            );
            println!("  ID: {}", company.id);
            if let Some(admin) = admin {
                println!("  Admin: {}", admin.email);
            }
            println!();
            println!(
                "  Next: {}",
                style(format!("maintflow webhook create {}", company.id)).dim()
            );
            println!();
        }
        CompanyCommand::AddAdmin { company_id, email } => {
            let user = state.company_service.add_admin(&company_id, &email).await?;
            if json {
                return print_json(&user);
            }
            println!();
            println!(
                "  {} Added administrator {}",
                style("*").green().bold(),
                style(&user.email).cyan()
            );
            println!();
        }
        CompanyCommand::Show { company_id } => {
            let company = state
                .company_service
                .get(&company_id)
                .await?
                .ok_or_else(|| anyhow!("Company '{company_id}' not found"))?;
            if json {
                return print_json(&company);
            }
            println!();
            println!("  {}", style(&company.name).cyan().bold());
            println!("  ID:      {}", company.id);
            println!("  Created: {}", company.created_at.format("%Y-%m-%d %H:%M"));
            println!();
        }
    }
    Ok(())
}
