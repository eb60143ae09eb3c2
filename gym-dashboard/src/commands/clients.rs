use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use uuid::Uuid;

use super::output::{heading, or_dash, print_table};
use crate::api::ApiContext;
use crate::models::{ActivityLevel, ClientWithRelations};
use crate::pages::{ClientFilters, ClientSort, ClientsPage, ConfirmStep, StatusFilter};

#[derive(Subcommand)]
pub enum ClientsSubcommands {
    /// List clients with assignment stats
    List {
        /// Match name, email or goals
        #[arg(short, long, default_value = "")]
        search: String,

        /// all, active or unassigned
        #[arg(long, default_value = "all")]
        status: StatusFilter,

        /// Activity level, e.g. moderate or very_active
        #[arg(long)]
        activity: Option<ActivityLevel>,

        /// name, recent or progress
        #[arg(long, default_value = "name")]
        sort: ClientSort,
    },

    /// Assign a trainer to a client
    Assign {
        /// Client ID
        client_id: Uuid,

        /// Trainer ID
        trainer_id: Uuid,
    },

    /// Remove a client's trainer
    Unassign {
        /// Client ID
        client_id: Uuid,
    },

    /// Delete a client
    Delete {
        /// Client ID
        client_id: Uuid,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

impl ClientsSubcommands {
    pub async fn execute(self, context: &ApiContext) -> Result<()> {
        let mut page = ClientsPage::new(super::notifying::<ClientWithRelations>(context, "Client"));

        match self {
            ClientsSubcommands::List {
                search,
                status,
                activity,
                sort,
            } => {
                page.load().await?;
                let filters = ClientFilters {
                    search,
                    status,
                    activity,
                    sort,
                };
                print_clients(&page, &filters);
                Ok(())
            }
            ClientsSubcommands::Assign {
                client_id,
                trainer_id,
            } => {
                page.assign_trainer(client_id, trainer_id).await?;
                Ok(())
            }
            ClientsSubcommands::Unassign { client_id } => {
                page.unassign_trainer(client_id).await?;
                Ok(())
            }
            ClientsSubcommands::Delete { client_id, force } => {
                // Arms the row; the second request below performs the delete
                page.request_delete(client_id).await?;

                let confirmed = force
                    || Confirm::new()
                        .with_prompt(format!("Delete client {}?", client_id))
                        .default(false)
                        .interact()?;
                if !confirmed {
                    println!("Cancelled");
                    return Ok(());
                }

                let step = page.request_delete(client_id).await?;
                debug_assert_eq!(step, ConfirmStep::Confirmed);
                Ok(())
            }
        }
    }
}

fn print_clients<S>(page: &ClientsPage<S>, filters: &ClientFilters)
where
    S: crate::api::CrudTransport<ClientWithRelations>,
{
    let stats = page.stats();

    heading("Clients");
    println!(
        "Total: {}   Active: {}   Unassigned: {}",
        stats.total.to_string().bold(),
        stats.active.to_string().green(),
        stats.unassigned.to_string().yellow()
    );
    println!();

    let rows: Vec<Vec<String>> = page
        .view(filters)
        .into_iter()
        .map(|client| {
            vec![
                client.id.to_string(),
                client.full_name(),
                client.user.email.clone(),
                client
                    .trainer
                    .as_ref()
                    .map(|trainer| trainer.full_name())
                    .unwrap_or_else(|| "Unassigned".to_string()),
                or_dash(client.activity_level),
                or_dash(client.latest_progress.as_ref().and_then(|progress| progress.weight)),
                client.progress_count.to_string(),
            ]
        })
        .collect();

    print_table(
        &["ID", "Name", "Email", "Trainer", "Activity", "Weight", "Records"],
        &rows,
    );
}
