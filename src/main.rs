use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use storefront_genai::ai::mime::extension_for_mime;
use storefront_genai::app::App;
use storefront_genai::models::Config;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "storefront-genai")]
#[command(about = "Order summaries and AI product images for the storefront")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the response summary for an order as JSON.
    OrderSummary {
        #[arg(value_name = "ORDER_ID")]
        order_id: String,
    },
    /// Generate a product image from a text prompt.
    GenerateImage {
        #[arg(value_name = "PROMPT")]
        prompt: String,
        /// Output file. Defaults to `product-image.<ext>` based on the image type.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::OrderSummary { order_id } => {
            let summary = app.order_summary(&order_id).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::GenerateImage { prompt, output } => {
            let image = app.generate_image(&prompt).await?;
            let path = output.unwrap_or_else(|| default_output_path(image.mime_type()));
            std::fs::write(&path, image.as_bytes())
                .with_context(|| format!("Failed to write image to {}", path.display()))?;
            info!("Saved image to {}", path.display());
        }
    }
    Ok(())
}

fn default_output_path(mime: &str) -> PathBuf {
    PathBuf::from(format!("product-image.{}", extension_for_mime(mime)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_genai=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let app = match Config::from_env().and_then(|config| App::new(&config)) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    match run(&app, args.command).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Command failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
