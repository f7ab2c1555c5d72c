//! Athanor HTTP Server
//!
//! Serves recipe-synthesis queries over a persisted craft catalog, with an
//! optional scrape step to rebuild the catalog from the upstream wiki.

use std::path::PathBuf;

use anyhow::{Context, Result};
use athanor::Engine;
use athanor_core::Catalog;
use clap::Parser;
use tracing::info;

mod scrape;
mod server;

#[derive(Parser)]
#[command(name = "athanor-server")]
#[command(about = "Recipe search server for combinational craft catalogs")]
struct Args {
    /// Rebuild the catalog by scraping the upstream wiki before serving
    #[arg(long)]
    scrape: bool,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0:8080")]
    addr: String,

    /// Directory holding the catalog file, query echo, and SVG tree
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("athanor_server=info".parse()?)
                .add_directive("athanor=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let catalog_path = args.data_dir.join(server::CATALOG_FILE);

    let (engine, raw_catalog) = if args.scrape {
        let catalog = tokio::task::spawn_blocking(scrape::scrape_catalog)
            .await
            .context("scrape task failed")?
            .context("scrape failed")?;
        let engine = Engine::new(catalog);
        let raw = engine.catalog().to_json_pretty()?;
        std::fs::create_dir_all(&args.data_dir)?;
        std::fs::write(&catalog_path, &raw)
            .with_context(|| format!("cannot write {}", catalog_path.display()))?;
        info!("wrote {}", catalog_path.display());
        (engine, raw)
    } else {
        let raw = std::fs::read_to_string(&catalog_path).with_context(|| {
            format!("cannot read {}; run with --scrape first", catalog_path.display())
        })?;
        (Engine::new(Catalog::from_json(&raw)?), raw)
    };
    info!(elements = engine.catalog().element_count(), "catalog indexed");

    let state = server::AppState::new(engine, raw_catalog, args.data_dir);
    server::run(state, &args.addr).await
}
