// ABOUTME: Core domain types shared by the trainer and the HTTP server
// ABOUTME: Nutrition records, goal labels, and lenient form-value enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mealwise

//! Core data models
//!
//! A [`NutritionRecord`] is one dish from the labeled dataset, immutable once
//! written by the trainer. The form-facing enums ([`Gender`],
//! [`ActivityLevel`], [`Goal`], [`DietPreference`]) parse leniently: the web
//! form submits free strings, and unrecognized values fall back to the
//! documented defaults rather than rejecting the request.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four nutrition features used for clustering, in training order
pub const NUTRITION_FEATURES: [&str; 4] = ["Calories", "Protein", "Carbs", "Fat"];

/// One dish from the labeled nutrition dataset
///
/// Field names map onto the dataset's CSV headers; extra columns in the
/// source CSV are ignored on read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutritionRecord {
    /// Dish name as it appears in the dataset
    #[serde(rename = "Dish Name")]
    pub dish_name: String,
    /// Energy (kcal per serving)
    #[serde(rename = "Calories")]
    pub calories: f64,
    /// Protein (g)
    #[serde(rename = "Protein")]
    pub protein: f64,
    /// Carbohydrates (g)
    #[serde(rename = "Carbs")]
    pub carbs: f64,
    /// Fat (g)
    #[serde(rename = "Fat")]
    pub fat: f64,
    /// Numeric cluster id assigned by the trainer
    #[serde(rename = "Cluster")]
    pub cluster: usize,
    /// Goal label derived from the cluster's calorie rank
    #[serde(rename = "Goal_Label")]
    pub goal_label: Goal,
}

impl NutritionRecord {
    /// The four clustering features in training order
    #[must_use]
    pub const fn features(&self) -> [f64; 4] {
        [self.calories, self.protein, self.carbs, self.fat]
    }
}

/// Gender for BMR calculation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    /// Male (+5 constant in Mifflin-St Jeor)
    Male,
    /// Female (-161 constant in Mifflin-St Jeor)
    Female,
}

impl Gender {
    /// Parse a form value; anything other than "male" is treated as female
    #[must_use]
    pub fn from_form_value(value: &str) -> Self {
        if value.eq_ignore_ascii_case("male") {
            Self::Male
        } else {
            Self::Female
        }
    }
}

/// Activity tier for the TDEE multiplier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivityLevel {
    /// Little or no exercise (factor 1.2)
    Low,
    /// Moderate exercise 3-5 days/week (factor 1.55)
    Medium,
    /// Hard exercise 6-7 days/week (factor 1.725)
    High,
}

impl ActivityLevel {
    /// Parse a form value; unrecognized input defaults to `Low`
    #[must_use]
    pub fn from_form_value(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Low,
        }
    }

    /// Multiplier applied to BMR to estimate daily expenditure
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::Low => 1.2,
            Self::Medium => 1.55,
            Self::High => 1.725,
        }
    }
}

/// Training goal; doubles as the label assigned to each dataset cluster
///
/// Serialized with the human-readable label so the `Goal_Label` CSV column
/// round-trips.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Goal {
    /// Caloric deficit (-300 kcal); lowest-calorie cluster
    #[serde(rename = "Weight Loss")]
    WeightLoss,
    /// Caloric balance; middle cluster
    #[serde(rename = "Maintain")]
    Maintain,
    /// Caloric surplus (+300 kcal); highest-calorie cluster
    #[serde(rename = "Muscle Gain")]
    MuscleGain,
}

impl Goal {
    /// Labels in ascending-mean-calorie order, the order the trainer assigns them
    pub const LABELS_BY_CALORIES: [Self; 3] = [Self::WeightLoss, Self::Maintain, Self::MuscleGain];

    /// Parse a form value; unrecognized input defaults to `Maintain` (no adjustment)
    #[must_use]
    pub fn from_form_value(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "weight_loss" => Self::WeightLoss,
            "muscle_gain" => Self::MuscleGain,
            _ => Self::Maintain,
        }
    }

    /// Calorie adjustment applied on top of TDEE
    #[must_use]
    pub const fn calorie_adjustment(self) -> f64 {
        match self {
            Self::WeightLoss => -300.0,
            Self::Maintain => 0.0,
            Self::MuscleGain => 300.0,
        }
    }

    /// Form token, the inverse of [`Goal::from_form_value`]
    #[must_use]
    pub const fn form_value(self) -> &'static str {
        match self {
            Self::WeightLoss => "weight_loss",
            Self::Maintain => "maintain",
            Self::MuscleGain => "muscle_gain",
        }
    }

    /// Human-readable label, matching the `Goal_Label` CSV values
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WeightLoss => "Weight Loss",
            Self::Maintain => "Maintain",
            Self::MuscleGain => "Muscle Gain",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dietary preference for the keyword-based veg/non-veg split
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DietPreference {
    /// Keep only dishes whose names do not mention a non-veg keyword
    Veg,
    /// Keep only dishes whose names mention a non-veg keyword
    NonVeg,
    /// No filtering
    Any,
}

impl DietPreference {
    /// Parse a form value; unrecognized input applies no filter
    #[must_use]
    pub fn from_form_value(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "veg" => Self::Veg,
            "non-veg" | "non_veg" | "nonveg" => Self::NonVeg,
            _ => Self::Any,
        }
    }

    /// Form token, the inverse of [`DietPreference::from_form_value`]
    #[must_use]
    pub const fn form_value(self) -> &'static str {
        match self {
            Self::Veg => "veg",
            Self::NonVeg => "non-veg",
            Self::Any => "any",
        }
    }
}
