//! CLI entry point for inkpress

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inkpress::{commands, server, Blog};

#[derive(Parser)]
#[command(name = "inkpress")]
#[command(version)]
#[command(about = "A small markdown blog with category filtering", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
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
    /// Initialize a new blog
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Category of the new post
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// File name for the new post (defaults to the slugified title)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// List posts, newest first
    List {
        /// Only show posts in this category
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// List categories
    Categories,

    /// Print the rendered HTML of a post
    Show {
        /// Slug of the post (its file name without `.md`)
        slug: String,
    },

    /// Start the blog server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "inkpress=debug,tower_http=debug,info"
    } else {
        "inkpress=info,warn"
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
        None => std::env::current_dir().context("reading current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized blog in {:?}", target_dir);
        }

        Commands::New {
            title,
            category,
            path,
        } => {
            let blog = Blog::new(&base_dir)?;
            let file = commands::new::create_post(
                &blog,
                &title,
                category.as_deref(),
                path.as_deref(),
            )?;
            println!("Created: {:?}", file);
        }

        Commands::List { category, json } => {
            let blog = Blog::new(&base_dir)?;
            commands::list::run(&blog, category.as_deref(), json)?;
        }

        Commands::Categories => {
            let blog = Blog::new(&base_dir)?;
            commands::list::categories(&blog)?;
        }

        Commands::Show { slug } => {
            let blog = Blog::new(&base_dir)?;
            commands::show::run(&blog, &slug)?;
        }

        Commands::Server { port, ip } => {
            let blog = Blog::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);

            tracing::info!("Serving posts from {:?}", blog.posts_dir);
            server::start(&blog, &ip, port).await?;
        }

        Commands::Version => {
            println!("inkpress version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
