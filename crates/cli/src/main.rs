use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use distmap_core::cli_ops::{handle_fetch, handle_show, render, CLIError};
use distmap_core::config::DEFAULT_BASE_URL;
use distmap_core::{DistributionConfig, MappingRequest};

#[derive(Parser)]
#[command(version, about = "Distribution mapping fetcher")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download a mapping file and store it locally
    Fetch {
        /// Distribution content hash
        #[arg(long)]
        hash: String,

        /// Resource file name to include (repeatable)
        #[arg(long = "file", value_name = "FILE", required = true)]
        files: Vec<String>,

        /// Target language code
        #[arg(long)]
        language: String,

        /// Directory for stored mappings
        #[arg(long, value_name = "DIR", default_value = "mappings")]
        out: PathBuf,

        #[arg(long, env = "DISTMAP_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Request timeout in seconds
        #[arg(long, env = "DISTMAP_TIMEOUT_SECS", default_value_t = 30)]
        timeout: u64,

        /// Print the mapping as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stored mapping
    Show {
        #[arg(long, value_name = "DIR", default_value = "mappings")]
        out: PathBuf,

        #[arg(long)]
        language: String,

        #[arg(long)]
        json: bool,
    },
}

async fn run(cli: Cli) -> Result<String, CLIError> {
    match cli.command {
        Command::Fetch {
            hash,
            files,
            language,
            out,
            base_url,
            timeout,
            json,
        } => {
            let config = DistributionConfig::default()
                .with_base_url(base_url)
                .with_timeout(Duration::from_secs(timeout));
            let request = MappingRequest::new(hash, files, language);
            let data = handle_fetch(&config, request, &out).await?;
            log::info!("stored mapping for {} under {}", data.language, out.display());
            render(&data, json)
        }
        Command::Show { out, language, json } => {
            let data = handle_show(&out, &language).await?;
            render(&data, json)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
