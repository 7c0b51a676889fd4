// ABOUTME: Intelligence module grouping the nutrition math used by request handlers
// ABOUTME: Pure functions only; no I/O
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mealwise

//! Nutrition intelligence: BMR, TDEE, calorie targets, and BMI.

pub mod calculator;

pub use calculator::{
    bmi, bmi_category, calculate_mifflin_st_jeor, calorie_target, BmiCategory, CalorieBreakdown,
};
