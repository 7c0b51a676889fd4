// ABOUTME: End-to-end tests for the offline training pipeline
// ABOUTME: Validates column checks, label ordering, and artifact pairing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mealwise
//! Training pipeline tests
//!
//! Runs `training::train` against synthetic CSVs with well-separated calorie
//! bands and checks the artifacts it writes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use mealwise::dataset::MealCatalog;
use mealwise::models::{DietPreference, Goal};
use mealwise::training::{
    self, train, verify_artifact_pair, ClusterModel, StandardScaler, LABELED_FILE, MODEL_FILE,
    SCALER_FILE,
};
use std::fs;

/// Synthetic dataset with three obvious calorie bands
fn three_band_csv() -> String {
    let mut csv = String::from("Dish Name,Calories,Protein,Carbs,Fat\n");
    for i in 0..12 {
        csv.push_str(&format!("Salad {i},{},4,12,2\n", 120 + i * 3));
        csv.push_str(&format!("Chicken Bowl {i},{},18,45,10\n", 450 + i * 3));
        csv.push_str(&format!("Mutton Feast {i},{},30,90,25\n", 850 + i * 3));
    }
    csv
}

#[test]
fn test_train_writes_all_three_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nutrition.csv");
    fs::write(&input, three_band_csv()).unwrap();

    let outcome = train(&input, dir.path(), 42).unwrap();
    assert_eq!(outcome.rows, 36);

    assert!(dir.path().join(SCALER_FILE).exists());
    assert!(dir.path().join(MODEL_FILE).exists());
    assert!(dir.path().join(LABELED_FILE).exists());
}

#[test]
fn test_cluster_labels_follow_ascending_mean_calories() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nutrition.csv");
    fs::write(&input, three_band_csv()).unwrap();

    let outcome = train(&input, dir.path(), 42).unwrap();

    // Reported label means are strictly ascending in the fixed label order
    let means = &outcome.label_mean_calories;
    assert_eq!(means[0].0, Goal::WeightLoss);
    assert_eq!(means[1].0, Goal::Maintain);
    assert_eq!(means[2].0, Goal::MuscleGain);
    assert!(means[0].1 < means[1].1 && means[1].1 < means[2].1);

    // And the labeled dataset agrees: every Salad row is Weight Loss, every
    // Mutton Feast row is Muscle Gain.
    let catalog = MealCatalog::load(&dir.path().join(LABELED_FILE)).unwrap();
    let light = catalog.matching(Goal::WeightLoss, DietPreference::Any);
    assert_eq!(light.len(), 12);
    assert!(light.iter().all(|r| r.dish_name.starts_with("Salad")));

    let heavy = catalog.matching(Goal::MuscleGain, DietPreference::Any);
    assert_eq!(heavy.len(), 12);
    assert!(heavy.iter().all(|r| r.dish_name.starts_with("Mutton Feast")));
}

#[test]
fn test_training_is_reproducible_for_fixed_seed() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let input = dir_a.path().join("nutrition.csv");
    fs::write(&input, three_band_csv()).unwrap();

    train(&input, dir_a.path(), 7).unwrap();
    train(&input, dir_b.path(), 7).unwrap();

    let catalog_a = MealCatalog::load(&dir_a.path().join(LABELED_FILE)).unwrap();
    let catalog_b = MealCatalog::load(&dir_b.path().join(LABELED_FILE)).unwrap();

    for goal in Goal::LABELS_BY_CALORIES {
        assert_eq!(
            catalog_a.matching(goal, DietPreference::Any).len(),
            catalog_b.matching(goal, DietPreference::Any).len(),
            "cluster sizes differ for {goal}"
        );
    }
}

#[test]
fn test_missing_column_aborts_with_column_name() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nutrition.csv");
    fs::write(
        &input,
        "Dish Name,Calories,Protein,Carbs\nDal,180,9,25\nRice,200,4,45\nNaan,290,9,48\n",
    )
    .unwrap();

    let err = train(&input, dir.path(), 42).unwrap_err();
    assert!(err.message.contains("Fat"), "error was: {}", err.message);
    assert!(!dir.path().join(LABELED_FILE).exists(), "no artifacts on failure");
}

#[test]
fn test_scaler_and_model_share_run_id() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nutrition.csv");
    fs::write(&input, three_band_csv()).unwrap();

    train(&input, dir.path(), 42).unwrap();

    let scaler = StandardScaler::load(&dir.path().join(SCALER_FILE)).unwrap();
    let model = ClusterModel::load(&dir.path().join(MODEL_FILE)).unwrap();
    verify_artifact_pair(&scaler, &model).unwrap();
}

#[test]
fn test_artifacts_from_different_runs_are_rejected() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let input = dir_a.path().join("nutrition.csv");
    fs::write(&input, three_band_csv()).unwrap();

    train(&input, dir_a.path(), 42).unwrap();
    train(&input, dir_b.path(), 42).unwrap();

    let scaler = StandardScaler::load(&dir_a.path().join(SCALER_FILE)).unwrap();
    let model = ClusterModel::load(&dir_b.path().join(MODEL_FILE)).unwrap();
    assert!(verify_artifact_pair(&scaler, &model).is_err());
}

#[test]
fn test_model_classifies_new_dish_via_scaler() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nutrition.csv");
    fs::write(&input, three_band_csv()).unwrap();

    train(&input, dir.path(), 42).unwrap();
    let scaler = StandardScaler::load(&dir.path().join(SCALER_FILE)).unwrap();
    let model = ClusterModel::load(&dir.path().join(MODEL_FILE)).unwrap();

    // A very light dish lands in the Weight Loss bucket, a very heavy one
    // in Muscle Gain.
    let light = scaler.transform_one(&[110.0, 4.0, 12.0, 2.0]);
    assert_eq!(model.label_for(&light), Goal::WeightLoss);

    let heavy = scaler.transform_one(&[880.0, 31.0, 92.0, 26.0]);
    assert_eq!(model.label_for(&heavy), Goal::MuscleGain);
}

#[test]
fn test_classify_loads_artifacts_and_labels_a_dish() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nutrition.csv");
    fs::write(&input, three_band_csv()).unwrap();

    train(&input, dir.path(), 42).unwrap();

    let goal = training::classify(dir.path(), &[105.0, 5.0, 14.0, 2.0]).unwrap();
    assert_eq!(goal, Goal::WeightLoss);

    let goal = training::classify(dir.path(), &[820.0, 26.0, 83.0, 21.0]).unwrap();
    assert_eq!(goal, Goal::MuscleGain);
}

#[test]
fn test_classify_rejects_mismatched_artifacts() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let input = dir_a.path().join("nutrition.csv");
    fs::write(&input, three_band_csv()).unwrap();

    train(&input, dir_a.path(), 42).unwrap();
    train(&input, dir_b.path(), 42).unwrap();

    // Cross the pair: scaler from run A, model from run B.
    fs::copy(
        dir_b.path().join(MODEL_FILE),
        dir_a.path().join(MODEL_FILE),
    )
    .unwrap();

    assert!(training::classify(dir_a.path(), &[400.0, 12.0, 40.0, 8.0]).is_err());
}
