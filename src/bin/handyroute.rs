// handyroute - classify a service request and find workers for it

use anyhow::Context;
use clap::{Parser, Subcommand};
use handyroute::routing::{CategoryId, ClassificationResult, WorkersPayload, catalog};
use handyroute::config::{ConfigFile, default_config_path};
use handyroute::{Router, Settings};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a request and look up matching workers
    Route {
        /// The service request, in any language
        prompt: String,

        /// Image or video describing the problem
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Path to configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Worker backend base URL (overrides config and BACKEND_URL)
        #[arg(long)]
        backend_url: Option<String>,

        /// Gemini model (overrides config and GEMINI_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List categories and their subcategories
    Categories,

    /// Write a default configuration file
    Init {
        /// Where to write it (defaults to the user config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Categories => print_categories(),
        Command::Init { config, force } => {
            let path = config
                .or_else(default_config_path)
                .context("No config directory available; pass --config")?;
            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }
            ConfigFile::default().to_file(&path)?;
            println!("✅ Wrote {}", path.display());
        }
        Command::Route {
            prompt,
            file,
            config,
            backend_url,
            model,
            json,
        } => {
            let mut settings = Settings::load(config.as_deref())?;
            if let Some(url) = backend_url {
                settings.router.backend_url = url;
            }
            if let Some(model) = model {
                settings.router.model = model;
            }

            if let Some(path) = file.as_ref().filter(|p| !p.exists()) {
                anyhow::bail!("File not found: {}", path.display());
            }

            let router = Router::from_settings(&settings)?;
            let result = router.route(&prompt, file.as_deref()).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
        }
    }

    Ok(())
}

fn print_categories() {
    for category in CategoryId::ALL {
        println!("{} {} ({})", category.icon(), category.name(), category.as_str());
        for subcategory in catalog::subcategories(category) {
            println!("    - {}", subcategory);
        }
    }
}

fn print_result(result: &ClassificationResult) {
    println!("{} Category: {}", result.category.icon(), result.category_name);
    match &result.subcategory {
        Some(subcategory) => println!("📌 Subcategory: {}", subcategory),
        None => println!("📌 Subcategory: (none matched)"),
    }
    if let Some(enhanced) = &result.enhanced_prompt {
        println!("🔍 Enhanced request: {}", enhanced);
    }
    println!("🔗 Redirect: {}", result.redirect_url);

    match &result.workers {
        WorkersPayload::Found(body) => {
            println!("👷 Workers:");
            println!("{}", serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string()));
        }
        WorkersPayload::Unavailable { error } => println!("❌ Workers unavailable: {}", error),
    }
}
