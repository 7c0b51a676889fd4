// ABOUTME: Environment-driven server configuration with .env support
// ABOUTME: Ports, artifact paths, and logging knobs in one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mealwise

//! Server configuration
//!
//! Everything comes from environment variables (with a `.env` file loaded
//! when present), following an environment-only configuration approach.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::warn;

use crate::training::{LABELED_FILE, MODEL_FILE, SCALER_FILE};

/// Default HTTP port
const DEFAULT_HTTP_PORT: u16 = 8080;
/// Default artifact directory
const DEFAULT_DATA_DIR: &str = "data";

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Directory holding the trainer's artifacts
    pub data_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is present but unparseable.
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }

        let http_port = env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())?
            .parse()
            .context("Invalid HTTP_PORT value")?;
        let data_dir = PathBuf::from(env_var_or("MEALWISE_DATA_DIR", DEFAULT_DATA_DIR)?);

        Ok(Self {
            http_port,
            data_dir,
        })
    }

    /// Path of the labeled dataset CSV
    #[must_use]
    pub fn labeled_dataset_path(&self) -> PathBuf {
        self.data_dir.join(LABELED_FILE)
    }

    /// Path of the scaler artifact
    #[must_use]
    pub fn scaler_path(&self) -> PathBuf {
        self.data_dir.join(SCALER_FILE)
    }

    /// Path of the cluster model artifact
    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        self.data_dir.join(MODEL_FILE)
    }

    /// One-line summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "http_port={} data_dir={}",
            self.http_port,
            self.data_dir.display()
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

/// Environment variable with a default
fn env_var_or(name: &str, default: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) => Ok(value),
        Err(env::VarError::NotPresent) => Ok(default.to_owned()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {name}")),
    }
}
