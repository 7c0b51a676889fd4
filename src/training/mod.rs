// ABOUTME: Offline trainer - standardizes nutrition features, fits k-means, labels clusters
// ABOUTME: Persists scaler, cluster model, and labeled dataset with a shared run id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mealwise

//! Offline training pipeline
//!
//! Reads the raw nutrition CSV, standardizes the four features (z-score),
//! fits k-means with k = 3 and a seeded RNG, ranks the clusters by ascending
//! mean calories, and assigns the fixed goal labels in that order:
//! `Weight Loss`, `Maintain`, `Muscle Gain`.
//!
//! Three artifacts are written: `scaler.json`, `kmeans.json`, and the
//! labeled dataset CSV. Scaler and model carry the same `run_id`; the server
//! refuses to start on a mismatched pair, enforcing the invariant that the
//! scaler/model combination used at inference time is the one produced by a
//! single training run.

use crate::dataset::MealCatalog;
use crate::errors::{AppError, AppResult};
use crate::models::{Goal, NutritionRecord, NUTRITION_FEATURES};
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2, Axis};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Number of clusters; one per goal label
pub const N_CLUSTERS: usize = 3;

/// Scaler artifact filename
pub const SCALER_FILE: &str = "scaler.json";
/// Cluster model artifact filename
pub const MODEL_FILE: &str = "kmeans.json";
/// Labeled dataset filename
pub const LABELED_FILE: &str = "labeled_dishes.csv";

/// One row of the raw (unlabeled) nutrition CSV; extra columns are ignored
#[derive(Debug, Clone, Deserialize)]
struct RawDishRow {
    #[serde(rename = "Dish Name")]
    dish_name: String,
    #[serde(rename = "Calories")]
    calories: f64,
    #[serde(rename = "Protein")]
    protein: f64,
    #[serde(rename = "Carbs")]
    carbs: f64,
    #[serde(rename = "Fat")]
    fat: f64,
}

/// Per-feature standardization parameters (z-score)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardScaler {
    /// Training run this scaler belongs to
    pub run_id: Uuid,
    /// Per-feature mean, in [`NUTRITION_FEATURES`] order
    pub mean: Vec<f64>,
    /// Per-feature standard deviation (population), zero variance stored as 1.0
    pub std: Vec<f64>,
}

impl StandardScaler {
    /// Fit means and standard deviations over the feature matrix
    fn fit(data: &Array2<f64>, run_id: Uuid) -> Self {
        let mean = data
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(data.ncols()));
        let std = data.std_axis(Axis(0), 0.0);

        // Zero-variance feature: store 1.0 so transform is a no-op instead
        // of a division by zero.
        let std = std
            .iter()
            .map(|&s| if s > 0.0 { s } else { 1.0 })
            .collect::<Vec<f64>>();

        Self {
            run_id,
            mean: mean.to_vec(),
            std,
        }
    }

    /// Standardize a feature matrix column-wise
    #[must_use]
    pub fn transform(&self, data: &Array2<f64>) -> Array2<f64> {
        let mut scaled = data.clone();
        for (j, mut column) in scaled.columns_mut().into_iter().enumerate() {
            let (mean, std) = (self.mean[j], self.std[j]);
            column.mapv_inplace(|v| (v - mean) / std);
        }
        scaled
    }

    /// Standardize a single feature vector
    #[must_use]
    pub fn transform_one(&self, features: &[f64; 4]) -> [f64; 4] {
        let mut scaled = [0.0; 4];
        for j in 0..4 {
            scaled[j] = (features[j] - self.mean[j]) / self.std[j];
        }
        scaled
    }

    /// Write the scaler artifact as JSON
    ///
    /// # Errors
    ///
    /// Returns an error on filesystem or serialization failure.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    /// Load a scaler artifact
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or malformed.
    pub fn load(path: &Path) -> AppResult<Self> {
        let bytes = fs::read(path).map_err(|e| {
            AppError::storage(format!("cannot read scaler {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Fitted cluster model: centroids in scaled feature space plus the
/// cluster-id to goal-label mapping
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterModel {
    /// Training run this model belongs to
    pub run_id: Uuid,
    /// `N_CLUSTERS` x 4 centroid matrix, row index = cluster id
    pub centroids: Vec<[f64; 4]>,
    /// Goal label per cluster id, assigned by ascending mean calories
    pub labels: Vec<Goal>,
}

impl ClusterModel {
    /// Nearest-centroid cluster id for one scaled feature vector
    #[must_use]
    pub fn predict_one(&self, scaled: &[f64; 4]) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (id, centroid) in self.centroids.iter().enumerate() {
            let dist: f64 = centroid
                .iter()
                .zip(scaled)
                .map(|(c, x)| (c - x) * (c - x))
                .sum();
            if dist < best_dist {
                best_dist = dist;
                best = id;
            }
        }
        best
    }

    /// Goal label for the cluster nearest to one scaled feature vector
    #[must_use]
    pub fn label_for(&self, scaled: &[f64; 4]) -> Goal {
        self.labels[self.predict_one(scaled)]
    }

    /// Write the model artifact as JSON
    ///
    /// # Errors
    ///
    /// Returns an error on filesystem or serialization failure.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    /// Load a model artifact
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or malformed.
    pub fn load(path: &Path) -> AppResult<Self> {
        let bytes = fs::read(path).map_err(|e| {
            AppError::storage(format!("cannot read model {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Enforce the scaler/model pairing invariant
///
/// # Errors
///
/// Returns an error when the artifacts come from different training runs.
pub fn verify_artifact_pair(scaler: &StandardScaler, model: &ClusterModel) -> AppResult<()> {
    if scaler.run_id == model.run_id {
        Ok(())
    } else {
        Err(AppError::config(format!(
            "scaler run {} does not match model run {}; retrain to produce a consistent pair",
            scaler.run_id, model.run_id
        )))
    }
}

/// Classify one dish's macros against a trained artifact pair
///
/// Loads the scaler and model from `artifact_dir`, verifies they belong to
/// the same training run, and returns the goal label of the nearest cluster.
///
/// # Errors
///
/// Returns an error if either artifact is missing or malformed, or if the
/// pair comes from different training runs.
pub fn classify(artifact_dir: &Path, features: &[f64; 4]) -> AppResult<Goal> {
    let scaler = StandardScaler::load(&artifact_dir.join(SCALER_FILE))?;
    let model = ClusterModel::load(&artifact_dir.join(MODEL_FILE))?;
    verify_artifact_pair(&scaler, &model)?;
    Ok(model.label_for(&scaler.transform_one(features)))
}

/// Summary of a completed training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingOutcome {
    /// Shared id stamped into both artifacts
    pub run_id: Uuid,
    /// Rows read from the input CSV
    pub rows: usize,
    /// Dishes per cluster, indexed by cluster id
    pub cluster_sizes: Vec<usize>,
    /// Mean calories per goal label, ascending
    pub label_mean_calories: Vec<(Goal, f64)>,
}

/// Run the full training pipeline and write all three artifacts to `output_dir`
///
/// # Errors
///
/// Returns an error if a required column is missing, a row fails to parse,
/// there are fewer rows than clusters, or an artifact cannot be written.
pub fn train(input_csv: &Path, output_dir: &Path, seed: u64) -> AppResult<TrainingOutcome> {
    let rows = read_raw_rows(input_csv)?;
    if rows.len() < N_CLUSTERS {
        return Err(AppError::invalid_input(format!(
            "dataset has {} rows but k-means needs at least {N_CLUSTERS}",
            rows.len()
        )));
    }

    let run_id = Uuid::new_v4();
    let features = feature_matrix(&rows);

    let scaler = StandardScaler::fit(&features, run_id);
    let scaled = scaler.transform(&features);

    // Seeded RNG keeps cluster assignments reproducible across retrains on
    // the same data.
    let rng = ChaCha8Rng::seed_from_u64(seed);
    let dataset = DatasetBase::from(scaled.clone());
    let fitted = KMeans::params_with_rng(N_CLUSTERS, rng)
        .max_n_iterations(300)
        .tolerance(1e-4)
        .fit(&dataset)
        .map_err(|e| AppError::internal(format!("k-means fit failed: {e}")))?;
    let assignments: Array1<usize> = fitted.predict(&scaled);

    let labels = rank_clusters_by_calories(&rows, &assignments)?;

    let centroids = fitted
        .centroids()
        .rows()
        .into_iter()
        .map(|row| [row[0], row[1], row[2], row[3]])
        .collect::<Vec<[f64; 4]>>();
    let model = ClusterModel {
        run_id,
        centroids,
        labels: labels.clone(),
    };

    let labeled: Vec<NutritionRecord> = rows
        .iter()
        .zip(assignments.iter())
        .map(|(row, &cluster)| NutritionRecord {
            dish_name: row.dish_name.clone(),
            calories: row.calories,
            protein: row.protein,
            carbs: row.carbs,
            fat: row.fat,
            cluster,
            goal_label: labels[cluster],
        })
        .collect();

    fs::create_dir_all(output_dir)?;
    scaler.save(&output_dir.join(SCALER_FILE))?;
    model.save(&output_dir.join(MODEL_FILE))?;
    MealCatalog::save(&output_dir.join(LABELED_FILE), &labeled)?;

    let mut cluster_sizes = vec![0usize; N_CLUSTERS];
    for &cluster in &assignments {
        cluster_sizes[cluster] += 1;
    }

    let mut label_mean_calories: Vec<(Goal, f64)> = (0..N_CLUSTERS)
        .map(|cluster| {
            let (sum, count) = labeled
                .iter()
                .filter(|r| r.cluster == cluster)
                .fold((0.0, 0usize), |(s, c), r| (s + r.calories, c + 1));
            (labels[cluster], sum / count.max(1) as f64)
        })
        .collect();
    label_mean_calories.sort_by(|a, b| a.1.total_cmp(&b.1));

    info!(
        run_id = %run_id,
        rows = rows.len(),
        output = %output_dir.display(),
        "training complete"
    );

    Ok(TrainingOutcome {
        run_id,
        rows: rows.len(),
        cluster_sizes,
        label_mean_calories,
    })
}

/// Read and validate the raw nutrition CSV
fn read_raw_rows(input_csv: &Path) -> AppResult<Vec<RawDishRow>> {
    let file = fs::File::open(input_csv).map_err(|e| {
        AppError::storage(format!("cannot open dataset {}: {e}", input_csv.display()))
    })?;
    let mut reader = csv::Reader::from_reader(file);

    // Explicit column check so a missing column aborts with its name
    // instead of a row-level deserialize error.
    let headers = reader.headers()?.clone();
    for column in NUTRITION_FEATURES {
        if !headers.iter().any(|h| h == column) {
            return Err(AppError::missing_field(column));
        }
    }
    if !headers.iter().any(|h| h == "Dish Name") {
        return Err(AppError::missing_field("Dish Name"));
    }

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: RawDishRow = record?;
        rows.push(row);
    }
    Ok(rows)
}

/// Feature matrix in [`NUTRITION_FEATURES`] order
fn feature_matrix(rows: &[RawDishRow]) -> Array2<f64> {
    let mut data = Array2::zeros((rows.len(), 4));
    for (i, row) in rows.iter().enumerate() {
        data[[i, 0]] = row.calories;
        data[[i, 1]] = row.protein;
        data[[i, 2]] = row.carbs;
        data[[i, 3]] = row.fat;
    }
    data
}

/// Assign goal labels to clusters strictly by ascending mean calories
fn rank_clusters_by_calories(
    rows: &[RawDishRow],
    assignments: &Array1<usize>,
) -> AppResult<Vec<Goal>> {
    let mut sums = vec![0.0f64; N_CLUSTERS];
    let mut counts = vec![0usize; N_CLUSTERS];
    for (row, &cluster) in rows.iter().zip(assignments.iter()) {
        sums[cluster] += row.calories;
        counts[cluster] += 1;
    }

    if counts.iter().any(|&c| c == 0) {
        return Err(AppError::internal(
            "k-means produced an empty cluster; dataset too small or degenerate",
        ));
    }

    let mut order: Vec<usize> = (0..N_CLUSTERS).collect();
    order.sort_by(|&a, &b| (sums[a] / counts[a] as f64).total_cmp(&(sums[b] / counts[b] as f64)));

    let mut labels = vec![Goal::Maintain; N_CLUSTERS];
    for (rank, &cluster) in order.iter().enumerate() {
        labels[cluster] = Goal::LABELS_BY_CALORIES[rank];
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn row(name: &str, calories: f64) -> RawDishRow {
        RawDishRow {
            dish_name: name.into(),
            calories,
            protein: calories / 20.0,
            carbs: calories / 10.0,
            fat: calories / 30.0,
        }
    }

    /// Three well-separated calorie bands: k-means must recover them and the
    /// labels must follow ascending mean calories regardless of cluster ids.
    fn three_band_csv() -> String {
        let mut csv = String::from("Dish Name,Calories,Protein,Carbs,Fat\n");
        for i in 0..10 {
            csv.push_str(&format!("Light {i},{},5,15,2\n", 100 + i));
            csv.push_str(&format!("Middle {i},{},12,40,8\n", 400 + i));
            csv.push_str(&format!("Heavy {i},{},25,80,20\n", 800 + i));
        }
        csv
    }

    #[test]
    fn test_scaler_standardizes_to_zero_mean_unit_variance() {
        let data = feature_matrix(&[row("a", 100.0), row("b", 200.0), row("c", 300.0)]);
        let scaler = StandardScaler::fit(&data, Uuid::new_v4());
        let scaled = scaler.transform(&data);

        for j in 0..4 {
            let column = scaled.column(j);
            let mean: f64 = column.iter().sum::<f64>() / column.len() as f64;
            let var: f64 = column.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>()
                / column.len() as f64;
            assert!(mean.abs() < 1e-9, "column {j} mean {mean}");
            assert!((var - 1.0).abs() < 1e-9, "column {j} var {var}");
        }
    }

    #[test]
    fn test_scaler_zero_variance_feature_is_noop() {
        let mut data = Array2::zeros((3, 4));
        for i in 0..3 {
            data[[i, 0]] = 100.0 * (i + 1) as f64;
            data[[i, 3]] = 7.5; // constant fat column
        }
        let scaler = StandardScaler::fit(&data, Uuid::new_v4());
        assert!((scaler.std[3] - 1.0).abs() < f64::EPSILON);

        let scaled = scaler.transform(&data);
        for i in 0..3 {
            assert!(scaled[[i, 3]].abs() < 1e-9);
        }
    }

    #[test]
    fn test_labels_follow_ascending_mean_calories() {
        let rows = vec![
            row("light-1", 100.0),
            row("light-2", 110.0),
            row("heavy-1", 900.0),
            row("heavy-2", 910.0),
            row("mid-1", 400.0),
            row("mid-2", 420.0),
        ];
        // Hand-built assignments: cluster 2 = light, 0 = heavy, 1 = mid
        let assignments = Array1::from(vec![2usize, 2, 0, 0, 1, 1]);
        let labels = rank_clusters_by_calories(&rows, &assignments).unwrap();

        assert_eq!(labels[2], Goal::WeightLoss);
        assert_eq!(labels[1], Goal::Maintain);
        assert_eq!(labels[0], Goal::MuscleGain);
    }

    #[test]
    fn test_train_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("nutrition.csv");
        std::fs::write(&input, three_band_csv()).unwrap();

        let outcome = train(&input, dir.path(), 42).unwrap();
        assert_eq!(outcome.rows, 30);
        assert_eq!(outcome.cluster_sizes.iter().sum::<usize>(), 30);

        // Label means must be strictly ascending: Weight Loss < Maintain < Muscle Gain
        assert_eq!(outcome.label_mean_calories[0].0, Goal::WeightLoss);
        assert_eq!(outcome.label_mean_calories[1].0, Goal::Maintain);
        assert_eq!(outcome.label_mean_calories[2].0, Goal::MuscleGain);
        assert!(outcome.label_mean_calories[0].1 < outcome.label_mean_calories[1].1);
        assert!(outcome.label_mean_calories[1].1 < outcome.label_mean_calories[2].1);

        // All three artifacts exist and the pair verifies
        let scaler = StandardScaler::load(&dir.path().join(SCALER_FILE)).unwrap();
        let model = ClusterModel::load(&dir.path().join(MODEL_FILE)).unwrap();
        verify_artifact_pair(&scaler, &model).unwrap();
        assert_eq!(scaler.run_id, outcome.run_id);

        let catalog = MealCatalog::load(&dir.path().join(LABELED_FILE)).unwrap();
        assert_eq!(catalog.len(), 30);
    }

    #[test]
    fn test_train_rejects_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("nutrition.csv");
        std::fs::write(&input, "Dish Name,Calories,Protein,Fat\nDal,180,9,5\n").unwrap();

        let err = train(&input, dir.path(), 42).unwrap_err();
        assert!(err.message.contains("Carbs"), "got: {}", err.message);
    }

    #[test]
    fn test_train_rejects_too_few_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("nutrition.csv");
        std::fs::write(
            &input,
            "Dish Name,Calories,Protein,Carbs,Fat\nDal,180,9,25,5\nRice,200,4,45,1\n",
        )
        .unwrap();

        assert!(train(&input, dir.path(), 42).is_err());
    }

    #[test]
    fn test_artifact_pair_mismatch_detected() {
        let scaler = StandardScaler {
            run_id: Uuid::new_v4(),
            mean: vec![0.0; 4],
            std: vec![1.0; 4],
        };
        let model = ClusterModel {
            run_id: Uuid::new_v4(),
            centroids: vec![[0.0; 4]; 3],
            labels: Goal::LABELS_BY_CALORIES.to_vec(),
        };
        assert!(verify_artifact_pair(&scaler, &model).is_err());
    }

    #[test]
    fn test_nearest_centroid_lookup() {
        let model = ClusterModel {
            run_id: Uuid::new_v4(),
            centroids: vec![
                [-1.0, -1.0, -1.0, -1.0],
                [0.0, 0.0, 0.0, 0.0],
                [1.0, 1.0, 1.0, 1.0],
            ],
            labels: Goal::LABELS_BY_CALORIES.to_vec(),
        };
        assert_eq!(model.predict_one(&[-0.9, -1.1, -0.8, -1.0]), 0);
        assert_eq!(model.label_for(&[0.9, 1.1, 0.8, 1.0]), Goal::MuscleGain);
    }
}
