//! CLI entry point for skyblog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skyblog::Blog;

#[derive(Parser)]
#[command(name = "skyblog")]
#[command(version)]
#[command(about = "A static blog generator with context-aware post navigation", long_about = None)]
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
    /// Generate route data into the public directory
    #[command(alias = "g")]
    Build {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Start the API server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// List site information
    List {
        /// Type of content to list (post, tag, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Show the previous and next post of a slug
    Nav {
        /// Post slug, e.g. "engineering/agentic/intro"
        slug: String,

        /// Tag the reader arrived from
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "skyblog=debug,info"
    } else {
        "skyblog=info"
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

    match cli.command {
        Commands::Build { watch } => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Building route data...");

            blog.build()?;
            println!("Built successfully!");

            if watch {
                skyblog::commands::build::watch(&blog).await?;
            }
        }

        Commands::Serve { port, ip, r#static } => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            skyblog::server::start(&blog, &ip, port, !r#static).await?;
        }

        Commands::List { r#type } => {
            let blog = Blog::new(&base_dir)?;
            skyblog::commands::list::run(&blog, &r#type)?;
        }

        Commands::Nav { slug, tag } => {
            let blog = Blog::new(&base_dir)?;
            skyblog::commands::nav::run(&blog, &slug, tag.as_deref())?;
        }

        Commands::Clean => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("skyblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
