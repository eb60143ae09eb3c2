use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use uuid::Uuid;

use super::output::{heading, or_dash, print_table, rating};
use crate::api::{ApiContext, CrudTransport};
use crate::models::{non_blank, CreateTrainer, TrainerWithRelations, TRAINER_SPECIALTIES};
use crate::pages::{TrainerFilters, TrainerSort, TrainersPage};

#[derive(Subcommand)]
pub enum TrainersSubcommands {
    /// List trainers with rating and client stats
    List {
        /// Match name, email or specialty
        #[arg(short, long, default_value = "")]
        search: String,

        /// Exact specialty, case-insensitive
        #[arg(long)]
        specialty: Option<String>,

        /// Minimum average rating
        #[arg(long)]
        min_rating: Option<f64>,

        /// name, rating, clients, experience or recent
        #[arg(long, default_value = "name")]
        sort: TrainerSort,
    },

    /// Create a trainer profile for an existing user
    Create {
        /// User ID of the trainer account
        #[arg(long)]
        user_id: Uuid,

        /// Specialty, e.g. "Strength Training"
        #[arg(long)]
        specialty: Option<String>,

        /// Years of experience
        #[arg(long)]
        experience: Option<i32>,

        /// Short biography
        #[arg(long)]
        bio: Option<String>,
    },
}

impl TrainersSubcommands {
    pub async fn execute(self, context: &ApiContext) -> Result<()> {
        let mut page = TrainersPage::new(super::notifying::<TrainerWithRelations>(context, "Trainer"));

        match self {
            TrainersSubcommands::List {
                search,
                specialty,
                min_rating,
                sort,
            } => {
                page.load().await?;
                let filters = TrainerFilters {
                    search,
                    specialty,
                    min_rating,
                    sort,
                };
                print_trainers(&page, &filters);
                Ok(())
            }
            TrainersSubcommands::Create {
                user_id,
                specialty,
                experience,
                bio,
            } => {
                let specialty = non_blank(specialty);
                if let Some(specialty) = &specialty {
                    if !TRAINER_SPECIALTIES
                        .iter()
                        .any(|known| known.eq_ignore_ascii_case(specialty))
                    {
                        tracing::info!("Using custom specialty '{}'", specialty);
                    }
                }

                let trainer = page
                    .create(CreateTrainer {
                        user_id,
                        specialty,
                        experience,
                        bio: non_blank(bio),
                    })
                    .await?;
                println!("  ID: {}", trainer.id);
                Ok(())
            }
        }
    }
}

fn print_trainers<S>(page: &TrainersPage<S>, filters: &TrainerFilters)
where
    S: CrudTransport<TrainerWithRelations>,
{
    let stats = page.stats();

    heading("Trainers");
    println!(
        "Total: {}   With clients: {}   Avg rating: {}   Clients: {}",
        stats.total.to_string().bold(),
        stats.with_clients.to_string().green(),
        rating(stats.average_rating).yellow(),
        stats.total_clients
    );
    println!();

    let rows: Vec<Vec<String>> = page
        .view(filters)
        .into_iter()
        .map(|trainer| {
            vec![
                trainer.id.to_string(),
                trainer.full_name(),
                or_dash(trainer.specialty.as_deref()),
                or_dash(trainer.experience),
                rating(trainer.average_rating),
                trainer.client_count.to_string(),
                trainer.feedback_count.to_string(),
            ]
        })
        .collect();

    print_table(
        &["ID", "Name", "Specialty", "Years", "Rating", "Clients", "Reviews"],
        &rows,
    );
}
