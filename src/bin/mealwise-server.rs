// ABOUTME: Server binary - loads artifacts once and serves recommendations over HTTP
// ABOUTME: Fails fast on a missing dataset or a mismatched scaler/model pair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mealwise

//! # Mealwise Server Binary
//!
//! Starts the HTTP server. The labeled dataset and the model artifacts are
//! loaded once at startup into read-only shared state; requests never touch
//! the filesystem.

use anyhow::{Context, Result};
use clap::Parser;
use mealwise::{
    config::ServerConfig,
    dataset::MealCatalog,
    logging,
    routes::{self, AppState},
    training::{verify_artifact_pair, ClusterModel, StandardScaler},
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "mealwise-server")]
#[command(about = "Mealwise - calorie calculator and meal recommendation server")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    logging::init_from_env()?;

    info!("Starting Mealwise server");
    info!("{}", config.summary());

    // The scaler/model pair must come from the same training run; refuse to
    // serve against mismatched artifacts.
    let scaler = StandardScaler::load(&config.scaler_path())
        .context("failed to load scaler artifact; run mealwise-train first")?;
    let model = ClusterModel::load(&config.model_path())
        .context("failed to load cluster model artifact; run mealwise-train first")?;
    verify_artifact_pair(&scaler, &model)?;
    info!(run_id = %model.run_id, "model artifacts verified");

    let catalog = MealCatalog::load(&config.labeled_dataset_path())
        .context("failed to load labeled dataset; run mealwise-train first")?;
    if catalog.is_empty() {
        anyhow::bail!("labeled dataset is empty; nothing to recommend");
    }

    let state = Arc::new(AppState { catalog, config });
    let app = routes::router(Arc::clone(&state));

    let addr = format!("0.0.0.0:{}", state.config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
