mod clients;
mod config_cmd;
mod feedback;
mod output;
mod trainers;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::api::{ApiContext, CrudService, NotifyingService};
use crate::config::Config;
use crate::entity::Entity;

pub use clients::ClientsSubcommands;
pub use feedback::FeedbackSubcommands;
pub use output::ConsoleNotifier;
pub use trainers::TrainersSubcommands;

#[derive(Parser)]
#[command(name = "gym-admin")]
#[command(about = "Administer Gym Manager clients, trainers and feedback", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "GYM_ADMIN_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage clients and trainer assignments
    #[command(subcommand)]
    Clients(ClientsSubcommands),

    /// Manage trainers
    #[command(subcommand)]
    Trainers(TrainersSubcommands),

    /// Review client feedback
    #[command(subcommand)]
    Feedback(FeedbackSubcommands),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Store the API token used for requests
    SetToken {
        /// Bearer token issued by the backend
        token: String,
    },
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::info!("Verbose mode enabled");
        }

        let config_path = self.config.as_deref();

        match self.command {
            Commands::Clients(subcmd) => subcmd.execute(&connect(config_path)?).await,
            Commands::Trainers(subcmd) => subcmd.execute(&connect(config_path)?).await,
            Commands::Feedback(subcmd) => subcmd.execute(&connect(config_path)?).await,
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(config_path),
                ConfigSubcommands::Init { force } => config_cmd::init_config(config_path, force),
                ConfigSubcommands::SetToken { token } => config_cmd::set_token(config_path, token),
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn connect(config_path: Option<&Path>) -> Result<ApiContext> {
    let config = Config::load_from(config_path)?;
    let context = ApiContext::from_config(&config)?;

    if !context.has_token() {
        tracing::warn!(
            "No API token configured; run 'gym-admin config set-token' or set {}",
            crate::config::TOKEN_ENV
        );
    }

    Ok(context)
}

/// HTTP service for `T` that prints the outcome of each mutation
pub(crate) fn notifying<T: Entity>(
    context: &ApiContext,
    label: &str,
) -> NotifyingService<CrudService<T>, ConsoleNotifier> {
    NotifyingService::new(CrudService::new(context.clone()), ConsoleNotifier, label)
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_repeated_rating_filter() {
        let cli = Cli::try_parse_from([
            "gym-admin", "feedback", "list", "--rating", "4", "--rating", "5",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Feedback(_)));
    }

    #[test]
    fn test_rejects_unknown_status() {
        let result = Cli::try_parse_from(["gym-admin", "clients", "list", "--status", "retired"]);
        assert!(result.is_err());
    }
}
