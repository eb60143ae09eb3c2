use std::collections::BTreeSet;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use uuid::Uuid;

use super::output::{heading, print_table, rating};
use crate::api::{ApiContext, CrudTransport};
use crate::models::FeedbackWithRelations;
use crate::pages::{FeedbackFilters, FeedbackPage, FeedbackSort};

#[derive(Subcommand)]
pub enum FeedbackSubcommands {
    /// List feedback with the rating distribution
    List {
        /// Match client, trainer or comment
        #[arg(short, long, default_value = "")]
        search: String,

        /// Only these ratings; repeat for several
        #[arg(long = "rating", value_parser = clap::value_parser!(i32).range(1..=5))]
        ratings: Vec<i32>,

        /// Trainer ID
        #[arg(long)]
        trainer: Option<Uuid>,

        /// recent, rating-high or rating-low
        #[arg(long, default_value = "recent")]
        sort: FeedbackSort,
    },
}

impl FeedbackSubcommands {
    pub async fn execute(self, context: &ApiContext) -> Result<()> {
        let mut page = FeedbackPage::new(super::notifying::<FeedbackWithRelations>(context, "Feedback"));

        match self {
            FeedbackSubcommands::List {
                search,
                ratings,
                trainer,
                sort,
            } => {
                page.load().await?;
                let filters = FeedbackFilters {
                    search,
                    ratings: ratings.into_iter().collect::<BTreeSet<_>>(),
                    trainer_id: trainer,
                    sort,
                };
                print_feedback(&page, &filters);
                Ok(())
            }
        }
    }
}

fn print_feedback<S>(page: &FeedbackPage<S>, filters: &FeedbackFilters)
where
    S: CrudTransport<FeedbackWithRelations>,
{
    let stats = page.stats();

    heading("Feedback");
    println!(
        "Total: {}   Average: {}",
        stats.total.to_string().bold(),
        rating(stats.average_rating).yellow()
    );
    for (index, count) in stats.distribution.iter().enumerate().rev() {
        println!("  {} {:>4}", "★".repeat(index + 1), count);
    }
    println!();

    let rows: Vec<Vec<String>> = page
        .view(filters)
        .into_iter()
        .map(|feedback| {
            vec![
                feedback.created_at.format("%Y-%m-%d").to_string(),
                feedback.client.full_name(),
                feedback.trainer.full_name(),
                feedback.rating.to_string(),
                feedback.comment.clone().unwrap_or_default(),
            ]
        })
        .collect();

    print_table(&["Date", "Client", "Trainer", "Rating", "Comment"], &rows);
}
