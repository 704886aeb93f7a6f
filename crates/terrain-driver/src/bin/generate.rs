//! Generates a terrain from the environment configuration.
//!
//! Run with:
//! ```
//! TERRAIN_SEED=12345 TERRAIN_LOD=6 cargo run -p terrain-driver --bin generate
//! ```
//!
//! Set `TERRAIN_OUTPUT` to also write the grid and statistics as JSON.

use serde::Serialize;
use terrain::ElevationGrid;
use terrain_driver::config::TerrainConfig;
use terrain_driver::session::TerrainSession;
use terrain_driver::stats::TerrainStats;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Output<'a> {
    config: &'a TerrainConfig,
    stats: TerrainStats,
    grid: &'a ElevationGrid,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = TerrainConfig::from_env()?;
    tracing::info!(
        "Generating terrain at level of detail {} (seed: {:?})",
        config.level_of_detail,
        config.seed
    );

    let mut session = TerrainSession::new(config)?;
    let applied = session.generate()?;
    let stats = session.stats();

    // Summary output
    tracing::info!("Generation completed!");
    tracing::info!("  Levels applied: {}", applied);
    tracing::info!("  Dimensions: {}x{}", stats.width, stats.height);
    tracing::info!("  Vertices: {}", stats.vertices);
    tracing::info!("  Triangles: {}", stats.triangles);
    tracing::info!("  Variance: {}", stats.variance);
    tracing::info!("  Detail level: {}", stats.detail_level);

    if let Ok(path) = std::env::var("TERRAIN_OUTPUT") {
        let snapshot = session.snapshot();
        let output = Output {
            config: session.config(),
            stats,
            grid: &snapshot,
        };
        std::fs::write(&path, serde_json::to_string_pretty(&output)?)?;
        tracing::info!("Wrote terrain to {}", path);
    }

    Ok(())
}
