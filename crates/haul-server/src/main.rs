//! haul server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite gazetteer, and serves the JSON API over HTTP.
//!
//! # Loading zip codes
//!
//! ```text
//! cargo run -p haul-server -- --import-zip-codes zip_codes.csv
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use haul_api::Services;
use haul_fedex::ReplyArchive;
use haul_server::{
  ServerConfig, estimator::Cm1Estimator, expand_tilde, import::import_zip_codes,
};
use haul_store_sqlite::SqliteGazetteer;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "haul shipment footprint server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Load a `name,description,latitude,longitude` CSV into the gazetteer
  /// and exit.
  #[arg(long, value_name = "FILE")]
  import_zip_codes: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080)?
    .set_default("carrier", "FedEx")?
    .set_default("gazetteer_path", "~/.local/share/haul/zip_codes.db")?
    .set_default("replies_dir", "replies")?
    .set_default("estimator.url", "http://impact.brighterplanet.com/shipments.json")?
    .set_default("estimator.timeout_secs", 30)?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("HAUL").separator("__"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let gazetteer_path = expand_tilde(&server_cfg.gazetteer_path);
  if let Some(parent) = gazetteer_path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let gazetteer = SqliteGazetteer::open(&gazetteer_path)
    .await
    .with_context(|| format!("failed to open gazetteer at {gazetteer_path:?}"))?;

  // Helper mode: import zip codes and exit.
  if let Some(csv) = cli.import_zip_codes {
    let written = import_zip_codes(&gazetteer, &csv).await?;
    println!("imported {written} zip codes into {gazetteer_path:?}");
    return Ok(());
  }

  let estimator = Cm1Estimator::new(&server_cfg.estimator)
    .context("failed to build estimator client")?;
  let replies = ReplyArchive::new(expand_tilde(&server_cfg.replies_dir));

  let zip_codes = gazetteer.count().await?;
  if zip_codes == 0 {
    tracing::warn!("gazetteer is empty; every leg will have zero length");
  }
  tracing::info!(
    zip_codes,
    replies = %replies.dir().display(),
    estimator = %server_cfg.estimator.url,
    "collaborators ready"
  );

  let services = Arc::new(Services {
    resolver:  gazetteer,
    estimator,
    tracking:  replies,
    carrier:   server_cfg.carrier.clone(),
  });

  let app = haul_server::router(services);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
