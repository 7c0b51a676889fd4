// ABOUTME: Calorie and BMI calculations using the Mifflin-St Jeor equation
// ABOUTME: Pure functions with input validation; shared by handlers and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mealwise

//! Calorie/BMI Calculator
//!
//! Implements the standard daily-energy pipeline:
//! BMR (Mifflin-St Jeor) x activity factor +/- goal adjustment, plus Body
//! Mass Index with the four conventional bands.
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting
//!   energy expenditure. *American Journal of Clinical Nutrition*, 51(2),
//!   241-247. <https://doi.org/10.1093/ajcn/51.2.241>

use crate::errors::AppError;
use crate::models::{ActivityLevel, Gender, Goal};
use serde::{Deserialize, Serialize};
use std::fmt;

/// BMI band thresholds (WHO classification)
const BMI_UNDERWEIGHT_MAX: f64 = 18.5;
const BMI_NORMAL_MAX: f64 = 25.0;
const BMI_OVERWEIGHT_MAX: f64 = 30.0;

/// BMI classification band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BmiCategory {
    /// BMI below 18.5
    Underweight,
    /// BMI in [18.5, 25)
    Normal,
    /// BMI in [25, 30)
    Overweight,
    /// BMI of 30 or above
    Obese,
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        };
        f.write_str(label)
    }
}

/// Full calorie calculation result for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalorieBreakdown {
    /// Basal Metabolic Rate (kcal/day)
    pub bmr: f64,
    /// BMR scaled by the activity factor (kcal/day)
    pub tdee: f64,
    /// TDEE adjusted for the goal (kcal/day); the number shown to the user
    pub target_calories: f64,
    /// Activity factor applied
    pub activity_factor: f64,
    /// Goal adjustment applied (kcal)
    pub goal_adjustment: f64,
}

/// Calculate Basal Metabolic Rate using the Mifflin-St Jeor equation (1990)
///
/// Formula: BMR = (10 x `weight_kg`) + (6.25 x `height_cm`) - (5 x age) + constant
/// - Men: +5
/// - Women: -161
///
/// # Errors
///
/// Returns an error if input values are out of valid ranges.
pub fn calculate_mifflin_st_jeor(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
) -> Result<f64, AppError> {
    if weight_kg <= 0.0 || weight_kg > 300.0 {
        return Err(AppError::invalid_input(
            "Weight must be between 0 and 300 kg",
        ));
    }
    if height_cm <= 0.0 || height_cm > 300.0 {
        return Err(AppError::invalid_input(
            "Height must be between 0 and 300 cm",
        ));
    }
    if !(10..=120).contains(&age) {
        return Err(AppError::invalid_input(
            "Age must be between 10 and 120 years",
        ));
    }

    let gender_constant = match gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };

    Ok(10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age) + gender_constant)
}

/// Calculate the daily calorie target: BMR x activity factor +/- goal adjustment
///
/// # Errors
///
/// Returns an error if the biometric inputs fail BMR validation.
pub fn calorie_target(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
    activity: ActivityLevel,
    goal: Goal,
) -> Result<CalorieBreakdown, AppError> {
    let bmr = calculate_mifflin_st_jeor(weight_kg, height_cm, age, gender)?;
    let tdee = bmr * activity.factor();
    let target_calories = tdee + goal.calorie_adjustment();

    Ok(CalorieBreakdown {
        bmr,
        tdee,
        target_calories,
        activity_factor: activity.factor(),
        goal_adjustment: goal.calorie_adjustment(),
    })
}

/// Body Mass Index: weight (kg) over height (m) squared
///
/// `height_cm` is the form's unit; converted to meters here.
///
/// # Errors
///
/// Returns an error if weight or height is not positive.
pub fn bmi(weight_kg: f64, height_cm: f64) -> Result<f64, AppError> {
    if weight_kg <= 0.0 {
        return Err(AppError::invalid_input("Weight must be positive"));
    }
    if height_cm <= 0.0 {
        return Err(AppError::invalid_input("Height must be positive"));
    }

    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

/// Classify a BMI value into the four conventional bands
#[must_use]
pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < BMI_UNDERWEIGHT_MAX {
        BmiCategory::Underweight
    } else if bmi < BMI_NORMAL_MAX {
        BmiCategory::Normal
    } else if bmi < BMI_OVERWEIGHT_MAX {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}
