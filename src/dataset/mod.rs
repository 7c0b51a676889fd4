// ABOUTME: In-memory meal catalog loaded once at startup from the labeled CSV
// ABOUTME: Goal/preference filtering and without-replacement sampling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mealwise

//! Meal catalog
//!
//! The catalog is the read-only, request-time view of the trainer's labeled
//! dataset. Handlers filter it by goal label and dietary preference and
//! sample rows without replacement; no mutation ever happens after load.
//!
//! The veg/non-veg split approximates dietary preference by matching dish
//! names against a fixed keyword set (chicken, egg, fish, meat, mutton,
//! prawn), case-insensitively.

use crate::errors::{AppError, AppResult};
use crate::models::{DietPreference, Goal, NutritionRecord};
use rand::seq::index;
use rand::Rng;
use regex::Regex;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Keywords whose presence in a dish name marks it non-vegetarian
const NON_VEG_PATTERN: &str = r"(?i)chicken|egg|fish|meat|mutton|prawn";

/// Column headers the labeled CSV must carry
const REQUIRED_COLUMNS: [&str; 7] = [
    "Dish Name",
    "Calories",
    "Protein",
    "Carbs",
    "Fat",
    "Cluster",
    "Goal_Label",
];

/// Read-only catalog of labeled dishes
#[derive(Debug, Clone)]
pub struct MealCatalog {
    records: Vec<NutritionRecord>,
    non_veg: Regex,
}

impl MealCatalog {
    /// Build a catalog from already-loaded records
    ///
    /// # Errors
    ///
    /// Returns an error if the keyword regex fails to compile.
    pub fn from_records(records: Vec<NutritionRecord>) -> AppResult<Self> {
        let non_veg = Regex::new(NON_VEG_PATTERN)
            .map_err(|e| AppError::internal(format!("keyword pattern failed to compile: {e}")))?;
        Ok(Self { records, non_veg })
    }

    /// Load the labeled dataset CSV produced by the trainer
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable, a required column is
    /// missing, or a row fails to deserialize.
    pub fn load(path: &Path) -> AppResult<Self> {
        let file = File::open(path).map_err(|e| {
            AppError::storage(format!("cannot open dataset {}: {e}", path.display()))
        })?;
        let mut reader = csv::Reader::from_reader(file);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(AppError::missing_field(column));
            }
        }

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: NutritionRecord = row?;
            records.push(record);
        }

        info!(dishes = records.len(), path = %path.display(), "meal catalog loaded");
        Self::from_records(records)
    }

    /// Write records as a labeled CSV (used by the trainer)
    ///
    /// # Errors
    ///
    /// Returns an error on filesystem or serialization failure.
    pub fn save(path: &Path, records: &[NutritionRecord]) -> AppResult<()> {
        let file = File::create(path).map_err(|e| {
            AppError::storage(format!("cannot create dataset {}: {e}", path.display()))
        })?;
        let mut writer = csv::Writer::from_writer(file);
        for record in records {
            writer.serialize(record)?;
        }
        writer
            .flush()
            .map_err(|e| AppError::storage(format!("flush failed: {e}")))?;
        Ok(())
    }

    /// Number of dishes in the catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no dishes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All dishes matching the goal label and dietary preference
    #[must_use]
    pub fn matching(&self, goal: Goal, preference: DietPreference) -> Vec<&NutritionRecord> {
        self.records
            .iter()
            .filter(|r| r.goal_label == goal)
            .filter(|r| match preference {
                DietPreference::Veg => !self.non_veg.is_match(&r.dish_name),
                DietPreference::NonVeg => self.non_veg.is_match(&r.dish_name),
                DietPreference::Any => true,
            })
            .collect()
    }

    /// Sample up to `count` distinct matching dishes without replacement
    ///
    /// Returns exactly `count` rows when at least that many match; all
    /// matching rows (possibly zero) otherwise.
    pub fn sample_meals<R: Rng>(
        &self,
        goal: Goal,
        preference: DietPreference,
        count: usize,
        rng: &mut R,
    ) -> Vec<NutritionRecord> {
        let pool = self.matching(goal, preference);
        let amount = count.min(pool.len());
        index::sample(rng, pool.len(), amount)
            .into_iter()
            .map(|i| pool[i].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn record(name: &str, calories: f64, goal: Goal) -> NutritionRecord {
        NutritionRecord {
            dish_name: name.into(),
            calories,
            protein: 10.0,
            carbs: 20.0,
            fat: 5.0,
            cluster: 0,
            goal_label: goal,
        }
    }

    fn catalog() -> MealCatalog {
        MealCatalog::from_records(vec![
            record("Palak Paneer", 260.0, Goal::Maintain),
            record("Chicken Tikka", 300.0, Goal::Maintain),
            record("Egg Curry", 220.0, Goal::Maintain),
            record("Dal Tadka", 180.0, Goal::WeightLoss),
            record("Veg Pulao", 240.0, Goal::WeightLoss),
            record("Mutton Biryani", 550.0, Goal::MuscleGain),
            record("Fish Fry", 320.0, Goal::MuscleGain),
            record("PRAWN Masala", 280.0, Goal::MuscleGain),
        ])
        .unwrap()
    }

    #[test]
    fn test_veg_filter_excludes_keyword_dishes() {
        let catalog = catalog();
        let veg = catalog.matching(Goal::Maintain, DietPreference::Veg);
        assert_eq!(veg.len(), 1);
        assert_eq!(veg[0].dish_name, "Palak Paneer");
    }

    #[test]
    fn test_non_veg_filter_is_case_insensitive() {
        let catalog = catalog();
        let non_veg = catalog.matching(Goal::MuscleGain, DietPreference::NonVeg);
        let names: Vec<&str> = non_veg.iter().map(|r| r.dish_name.as_str()).collect();
        assert!(names.contains(&"PRAWN Masala"));
        assert_eq!(non_veg.len(), 3);
    }

    #[test]
    fn test_any_preference_applies_no_filter() {
        let catalog = catalog();
        assert_eq!(catalog.matching(Goal::Maintain, DietPreference::Any).len(), 3);
    }

    #[test]
    fn test_sample_returns_three_distinct_rows() {
        let catalog = catalog();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let meals = catalog.sample_meals(Goal::Maintain, DietPreference::Any, 3, &mut rng);
        assert_eq!(meals.len(), 3);

        let mut names: Vec<&str> = meals.iter().map(|m| m.dish_name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_sample_with_too_few_matches_returns_all() {
        let catalog = catalog();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let meals = catalog.sample_meals(Goal::WeightLoss, DietPreference::NonVeg, 3, &mut rng);
        assert!(meals.is_empty());

        let meals = catalog.sample_meals(Goal::WeightLoss, DietPreference::Veg, 3, &mut rng);
        assert_eq!(meals.len(), 2);
    }

    #[test]
    fn test_load_rejects_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "Dish Name,Calories,Protein\nDal,180,9\n").unwrap();

        let err = MealCatalog::load(&path).unwrap_err();
        assert!(err.message.contains("Carbs") || err.message.contains("Fat"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labeled.csv");

        let records = vec![
            record("Dal Tadka", 180.0, Goal::WeightLoss),
            record("Mutton Biryani", 550.0, Goal::MuscleGain),
        ];
        MealCatalog::save(&path, &records).unwrap();

        let catalog = MealCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.matching(Goal::MuscleGain, DietPreference::Any).len(),
            1
        );
    }
}
