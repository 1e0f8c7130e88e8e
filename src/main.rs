//! CLI entry point for plume

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "plume")]
#[command(version)]
#[command(about = "Inspect the content repository of a markdown magazine site", long_about = None)]
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
    /// List every article found in the content tree
    List,

    /// List categories with their display colors
    Categories,

    /// Show one article in full
    Show {
        /// Category directory name
        category: String,
        /// Article folder name
        slug: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "plume=debug,info"
    } else {
        "plume=info"
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

    let repo = plume::ContentRepo::new(&base_dir)?;

    match cli.command {
        Commands::List => {
            let result = repo.scan()?;
            for article in &result.articles {
                println!(
                    "{}/{}  \"{}\"  by {} ({})",
                    article.category, article.slug, article.title, article.author, article.date
                );
            }
            println!("{} articles in {} categories", result.articles.len(), result.categories.len());
        }

        Commands::Categories => {
            let result = repo.scan()?;
            for category in &result.categories {
                println!("{}  {}", category.color, category.name);
            }
        }

        Commands::Show { category, slug } => {
            let result = repo.scan()?;
            let article = result
                .articles
                .iter()
                .find(|a| a.category == category && a.slug == slug);

            match article {
                Some(article) => {
                    println!("title:        {}", article.title);
                    println!("author:       {}", article.author);
                    println!("date:         {}", article.date);
                    if let Some(header) = &article.header_image {
                        println!("header image: {}", header);
                    }
                    for path in &article.media {
                        println!("media:        {}", path);
                    }
                    println!();
                    println!("{}", article.preview);
                }
                None => anyhow::bail!("article {}/{} not found", category, slug),
            }
        }
    }

    Ok(())
}
