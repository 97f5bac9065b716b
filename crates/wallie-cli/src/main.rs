mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::serve::ServeArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "wallie",
    about = "T-shirt sizing for a Jira backlog",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = "WALLIE_CONFIG", default_value = "config.json")]
    config: PathBuf,

    /// Jira base URL, replaces JiraBase from the config file
    #[arg(long, global = true, env = "JIRA_BASE")]
    jira_base: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web UI (default)
    Serve(ServeArgs),

    /// Print a project's open stories and exit
    Backlog {
        /// Project ID to query
        #[arg(long, default_value = "dmp")]
        project: String,

        /// Jira username
        #[arg(long, env = "WALLIE_USERNAME")]
        username: String,

        /// Jira password
        #[arg(long, env = "WALLIE_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let jira_base = cli.jira_base.as_deref();

    let result = match cli.command {
        None => cmd::serve::run(&cli.config, jira_base, ServeArgs::default()),
        Some(Commands::Serve(args)) => cmd::serve::run(&cli.config, jira_base, args),
        Some(Commands::Backlog {
            project,
            username,
            password,
        }) => cmd::backlog::run(
            &cli.config,
            jira_base,
            &project,
            &username,
            &password,
            cli.json,
        ),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
