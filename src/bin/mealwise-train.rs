// ABOUTME: Trainer binary - clusters the nutrition CSV and writes serving artifacts
// ABOUTME: Thin CLI over the library's training and classification pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mealwise

//! # Mealwise Trainer Binary
//!
//! `train`: one-time offline step that reads the raw nutrition CSV, clusters
//! it into the three goal buckets, and writes `scaler.json`, `kmeans.json`,
//! and the labeled dataset CSV for the server to consume.
//!
//! `classify`: runs one dish's macros through a trained scaler/model pair and
//! prints the goal label, useful for spot-checking a model before deploying.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mealwise::{logging, training};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "mealwise-train")]
#[command(about = "Train and inspect the Mealwise meal clustering model")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Cluster a nutrition CSV and write the serving artifacts
    Train {
        /// Input nutrition CSV (columns: Dish Name, Calories, Protein, Carbs, Fat)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the three artifacts
        #[arg(short, long, default_value = "data")]
        output: PathBuf,

        /// RNG seed for reproducible cluster assignments
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Classify one dish's macros against a trained model
    Classify {
        /// Directory holding scaler.json and kmeans.json
        #[arg(short, long, default_value = "data")]
        data: PathBuf,

        /// Calories per serving
        #[arg(long)]
        calories: f64,

        /// Protein in grams
        #[arg(long)]
        protein: f64,

        /// Carbs in grams
        #[arg(long)]
        carbs: f64,

        /// Fat in grams
        #[arg(long)]
        fat: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_from_env()?;

    match cli.command {
        Command::Train {
            input,
            output,
            seed,
        } => {
            let outcome = training::train(&input, &output, seed)
                .with_context(|| format!("training failed for {}", input.display()))?;

            info!(
                run_id = %outcome.run_id,
                rows = outcome.rows,
                "training complete"
            );
            for (goal, mean_calories) in &outcome.label_mean_calories {
                info!(
                    label = goal.label(),
                    mean_calories = format!("{mean_calories:.1}"),
                    "cluster labeled"
                );
            }
            println!(
                "Wrote {}, {}, {} to {}",
                training::SCALER_FILE,
                training::MODEL_FILE,
                training::LABELED_FILE,
                output.display()
            );
        }
        Command::Classify {
            data,
            calories,
            protein,
            carbs,
            fat,
        } => {
            let goal = training::classify(&data, &[calories, protein, carbs, fat])
                .with_context(|| format!("classification failed using {}", data.display()))?;
            println!("{}", goal.label());
        }
    }

    Ok(())
}
