//! CLI entry point for handbook-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "handbook-rs")]
#[command(version)]
#[command(about = "A React/JavaScript/Node.js handbook: markdown viewer and searchable catalogs", long_about = None)]
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
    /// Initialize a new handbook
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new document
    New {
        /// Title of the new document
        title: String,

        /// Path under the docs directory, without extension
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Fetch and render one document location
    #[command(alias = "r")]
    Render {
        /// URL, or path under the viewer mount (e.g. /docs/react/hooks.md)
        location: String,

        /// Print the presentation tree as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },

    /// Search a catalog (questions, snippets, hooks)
    Search {
        catalog: String,

        /// Free-text query
        query: Option<String>,

        /// Only show entries in this category (repeatable)
        #[arg(short = 'c', long = "category")]
        categories: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List handbook information
    List {
        /// Type of content to list (docs, catalogs, categories)
        #[arg(default_value = "docs")]
        r#type: String,
    },

    /// Export static HTML
    #[command(alias = "g")]
    Generate,

    /// Clean the public folder
    Clean,

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "handbook_rs=debug,info"
    } else {
        "handbook_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing handbook in {:?}", target_dir);
            handbook_rs::commands::init::init_site(&target_dir)?;
            println!("Initialized handbook in {:?}", target_dir);
        }

        Commands::New { title, path } => {
            let handbook = handbook_rs::Handbook::new(&base_dir)?;
            tracing::info!("Creating new document: {}", title);
            handbook_rs::commands::new::create_doc(&handbook, &title, path.as_deref())?;
        }

        Commands::Render { location, json } => {
            let handbook = handbook_rs::Handbook::new(&base_dir)?;
            handbook_rs::commands::render::run(&handbook, &location, json).await?;
        }

        Commands::Search {
            catalog,
            query,
            categories,
            json,
        } => {
            let handbook = handbook_rs::Handbook::new(&base_dir)?;
            handbook_rs::commands::search::run(
                &handbook,
                &catalog,
                query.as_deref(),
                &categories,
                json,
            )?;
        }

        Commands::List { r#type } => {
            let handbook = handbook_rs::Handbook::new(&base_dir)?;
            handbook_rs::commands::list::run(&handbook, &r#type)?;
        }

        Commands::Generate => {
            let handbook = handbook_rs::Handbook::new(&base_dir)?;
            tracing::info!("Generating static files...");
            handbook.generate().await?;
            println!("Generated successfully!");
        }

        Commands::Clean => {
            let handbook = handbook_rs::Handbook::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            handbook.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Server { port, ip, open } => {
            let handbook = handbook_rs::Handbook::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            handbook_rs::server::start(&handbook, &ip, port, open).await?;
        }

        Commands::Version => {
            println!("handbook-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
