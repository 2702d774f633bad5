use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use cli::ExtractArgs;
use color_eyre::eyre::Result;
use cutout::{BatchConfig, BatchRunner, TracingSink};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Cut stickers and sprites out of scanned sheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every subject from the images in a directory
    Extract(ExtractArgs),
    /// Print the JSON schema of the configuration file
    Schema,
    /// Write a configuration file with default values (.toml or .json)
    InitConfig {
        /// Where to write the configuration
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Extract(args) => extract(args)?,
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&BatchConfig::schema())?);
        }
        Commands::InitConfig { path } => init_config(path)?,
    }

    Ok(())
}

fn extract(args: &ExtractArgs) -> Result<()> {
    let config = args.resolve()?;
    let runner = BatchRunner::new(config)?;
    info!("{}", runner.segmenter().info());
    info!("Minimum area: {}", runner.config().min_area);
    info!("Threshold method: {}", runner.config().segment.method);
    info!("Numbering: {}", runner.config().numbering);

    let summary = runner.run(&mut TracingSink)?;
    if summary.subjects_saved == 0 {
        info!("No subjects were extracted");
    } else {
        info!("📁 Subjects saved to {:?}", runner.config().output_dir);
    }
    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    BatchConfig::default().to_file(path)?;
    info!("📄 Default configuration written to {:?}", path);
    Ok(())
}
