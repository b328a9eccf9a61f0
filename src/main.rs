use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use ossify::config::Config;
use ossify::types::{DifficultyLevel, Since, Strategy};

mod commands;

#[derive(Parser)]
#[command(name = "ossify")]
#[command(about = "Find open-source repositories worth contributing to", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search repositories with contribution opportunities
    #[command(short_flag = 's', visible_alias = "find")]
    Search {
        /// Free-text query (empty searches popular repositories)
        #[arg(default_value = "")]
        query: String,
        /// Programming language filter ("all" for any)
        #[arg(long, short = 'l')]
        language: Option<String>,
        /// Restrict to repositories labelled for this level
        #[arg(long, value_enum)]
        level: Option<DifficultyLevel>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 12)]
        per_page: u32,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// Trending repositories balanced across difficulty tiers
    #[command(short_flag = 't')]
    Trending {
        #[arg(long, short = 'l')]
        language: Option<String>,
        #[arg(long, value_enum, default_value_t = Since::Weekly)]
        since: Since,
        #[arg(long, value_enum, default_value_t = Strategy::Balanced)]
        strategy: Strategy,
        /// Fix the shuffle seed of the balanced strategy
        #[arg(long, env = "OSSIFY_SHUFFLE_SEED")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 12)]
        per_page: u32,
        #[arg(long)]
        json: bool,
    },
    /// Show one repository with its contribution details
    Show {
        /// Repository as owner/name
        repo: String,
        #[arg(long)]
        json: bool,
    },
    /// Save a repository to your list
    Save {
        /// Repository as owner/name
        repo: String,
        #[arg(long, env = "USER")]
        user: String,
    },
    /// List saved repositories
    #[command(visible_alias = "list")]
    Saved {
        #[arg(long, env = "USER")]
        user: String,
    },
    /// Remove a saved repository by record id
    Unsave {
        id: uuid::Uuid,
    },
    /// List supported language filters
    Languages,
    /// Run the HTTP API
    Serve {
        /// Address to bind, overrides OSSIFY_BIND_ADDR
        #[arg(long)]
        bind: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn display_banner() {
    println!(
        r#"
  ___  ____ ____ _ ____ _   _
 / _ \/ ___/ ___(_)  __| | | |
| | | \___ \___ \ | |_ | |_| |
| |_| |___) |__) || _| |\__, |
 \___/|____/____/_|_|  |____/
"#
    );

    let mut cmd = Cli::command();
    let _ = cmd.print_help();
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so piped output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        None => display_banner(),
        Some(Commands::Search {
            query,
            language,
            level,
            page,
            per_page,
            json,
        }) => commands::search_repos(&config, query, language, level, page, per_page, json).await?,
        Some(Commands::Trending {
            language,
            since,
            strategy,
            seed,
            page,
            per_page,
            json,
        }) => {
            commands::trending_repos(&config, language, since, strategy, seed, page, per_page, json)
                .await?
        }
        Some(Commands::Show { repo, json }) => commands::show_repo(&config, &repo, json).await?,
        Some(Commands::Save { repo, user }) => commands::save_repo(&config, &repo, &user).await?,
        Some(Commands::Saved { user }) => commands::list_saved(&config, &user)?,
        Some(Commands::Unsave { id }) => commands::remove_saved(&config, id)?,
        Some(Commands::Languages) => commands::list_languages(),
        Some(Commands::Serve { bind }) => commands::serve(&config, bind).await?,
        Some(Commands::Completions { shell }) => commands::generate_completions(shell),
    }

    Ok(())
}
