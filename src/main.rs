//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_rs::Folio;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author = "Durgendra")]
#[command(version)]
#[command(about = "Content registry for a personal portfolio site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List posts, projects or tags
    #[command(alias = "ls")]
    List {
        /// What to list (posts, projects, tags)
        #[arg(default_value = "posts")]
        r#type: String,

        /// Include unpublished records
        #[arg(short, long)]
        all: bool,

        /// Sort order, e.g. -date, title, slug
        #[arg(short, long, allow_hyphen_values = true)]
        order: Option<String>,

        /// Only records with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Show a single post or project
    Show {
        /// Kind of record (post, project)
        kind: String,

        /// Record slug
        slug: String,
    },

    /// Validate all content
    Check,

    /// Create a new blog post
    New {
        /// Title of the new post
        title: String,
    },

    /// Write page data for every route
    #[command(alias = "g")]
    Build,

    /// Clean the public folder
    Clean,

    /// Start a local preview server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let folio = Folio::new(&base_dir)?;

    match cli.command {
        Commands::List {
            r#type,
            all,
            order,
            tag,
        } => {
            let options = folio_rs::commands::list::ListOptions {
                all,
                order: order.as_deref(),
                tag: tag.as_deref(),
            };
            folio_rs::commands::list::run(&folio, &r#type, &options)?;
        }

        Commands::Show { kind, slug } => {
            folio_rs::commands::show::run(&folio, &kind, &slug)?;
        }

        Commands::Check => {
            folio_rs::commands::check::run(&folio)?;
        }

        Commands::New { title } => {
            tracing::info!("Creating new post with title: {}", title);
            folio_rs::commands::new::run(&folio, &title)?;
        }

        Commands::Build => {
            tracing::info!("Building page data...");
            folio.build()?;
            println!("Built successfully!");
        }

        Commands::Clean => {
            tracing::info!("Cleaning public folder...");
            folio.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Serve { port, ip } => {
            let site = folio.load()?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio_rs::server::start(site, &ip, port).await?;
        }
    }

    Ok(())
}
