// ABOUTME: Main library entry point for the Mealwise meal recommendation service
// ABOUTME: Offline k-means trainer plus an axum server sampling dishes from the labeled dataset
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mealwise

#![deny(unsafe_code)]

//! # Mealwise
//!
//! A small web service that estimates daily calorie needs and suggests
//! dishes from a pre-clustered nutrition dataset.
//!
//! Two stages:
//!
//! - **Offline trainer** (`mealwise-train`): standardizes the nutrition
//!   features of a CSV, clusters it into three goal buckets with k-means,
//!   and persists the scaler, the cluster model, and the labeled dataset.
//! - **Online server** (`mealwise-server`): loads the labeled dataset once
//!   at startup and serves the form, computing BMR/BMI per request and
//!   sampling three matching dishes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mealwise::config::ServerConfig;
//! use mealwise::dataset::MealCatalog;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let catalog = MealCatalog::load(&config.labeled_dataset_path())?;
//!     println!("serving {} dishes on port {}", catalog.len(), config.http_port);
//!     Ok(())
//! }
//! ```

/// Environment-driven server configuration
pub mod config;

/// Meal catalog: load, filter, and sample the labeled dataset
pub mod dataset;

/// Unified error handling system
pub mod errors;

/// Calorie and BMI calculations
pub mod intelligence;

/// Logging configuration and initialization
pub mod logging;

/// Core domain types
pub mod models;

/// HTTP routes and shared application state
pub mod routes;

/// Offline training pipeline and model artifacts
pub mod training;
