use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use simroute_common::{logger, AppConfig};
use simroute_vector::{embeddings_file_name, ModelVersion, VectorStore, MOCK_DIM, MOCK_ROWS};
use std::path::PathBuf;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    match find_project_root().map(|root| root.join(".env")) {
        Some(env_path) if env_path.exists() => {
            dotenv::from_path(&env_path).ok();
        }
        _ => {
            dotenv::dotenv().ok();
        }
    }
}

#[derive(Parser)]
#[command(name = "simroute")]
#[command(about = "SimRoute - A/B routed embedding similarity service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Directory holding mock_embeddings_{version}.json files
        #[arg(long)]
        embeddings_dir: Option<PathBuf>,

        /// Serve deterministic mock embeddings for versions without a file
        #[arg(long)]
        allow_mock: bool,

        /// Traffic split, e.g. "v1=0.7,v2=0.3"
        #[arg(long)]
        split: Option<String>,
    },

    /// Write a deterministic mock embedding file for a version
    GenerateMock {
        /// Model version tag (v1 or v2)
        #[arg(long, default_value = "v1")]
        version: String,

        /// Output directory
        #[arg(long, default_value = "./data")]
        out: PathBuf,

        /// Random seed
        #[arg(long, default_value_t = simroute_vector::DEFAULT_MOCK_SEED)]
        seed: u64,

        /// Number of vectors
        #[arg(long, default_value_t = MOCK_ROWS)]
        rows: usize,

        /// Embedding dimension
        #[arg(long, default_value_t = MOCK_DIM)]
        dim: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Project-root .env first, so CLI overrides below win over it
    load_dotenv_from_project_root();

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            embeddings_dir,
            allow_mock,
            split,
        }) => {
            let mut config = AppConfig::from_env()?;
            if let Some(host) = host {
                config.server_host = host;
            }
            if let Some(port) = port {
                config.server_port = port;
            }
            if let Some(dir) = embeddings_dir {
                config.embeddings_dir = dir;
            }
            if allow_mock {
                config.allow_mock_embeddings = true;
            }
            if let Some(split) = split {
                config.traffic_split = split;
            }
            config.validate()?;

            serve(config).await?;
        }
        Some(Commands::GenerateMock {
            version,
            out,
            seed,
            rows,
            dim,
        }) => {
            logger::setup_console_logging("info")?;

            let version: ModelVersion = version.parse()?;
            let path = out.join(embeddings_file_name(version));
            let store = VectorStore::mock(version, seed, rows, dim)?;
            store
                .save_json(&path)
                .with_context(|| format!("writing {}", path.display()))?;

            println!(
                "Wrote {}x{} {} embeddings to {} (fingerprint {})",
                rows,
                dim,
                version,
                path.display(),
                store.fingerprint()
            );
        }
        None => {
            let config = AppConfig::from_env()?;
            serve(config).await?;
        }
    }

    Ok(())
}

async fn serve(config: AppConfig) -> Result<()> {
    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("SimRoute starting...");
    tracing::info!("Configuration loaded:");
    tracing::info!("  Bind: {}", config.server_bind_address());
    tracing::info!("  Embeddings: {}", config.embeddings_dir.display());
    tracing::info!("  Mock fallback: {}", config.allow_mock_embeddings);
    tracing::info!("  Traffic split: {}", config.traffic_split);

    println!("Server listening on http://{}", config.server_bind_address());

    simroute_server::start_server(config).await?;
    Ok(())
}
