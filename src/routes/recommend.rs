// ABOUTME: Recommendation endpoints - calorie/BMI calculation plus meal sampling
// ABOUTME: POST /recommend renders the plan page, POST /more_meals resamples dishes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mealwise

//! Recommendation routes
//!
//! `POST /recommend` takes the full form, computes the calorie target and
//! BMI, and samples three dishes from the catalog. `POST /more_meals`
//! resamples three more for the same goal/preference; the calorie and BMI
//! figures are carried through hidden fields so the page can redisplay them
//! without recomputation.
//!
//! Malformed numeric form input is rejected by the typed `Form` extractor
//! before a handler runs.

use axum::extract::{Form, State};
use axum::response::Html;
use axum::routing::post;
use axum::Router;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::errors::AppError;
use crate::intelligence::{bmi, bmi_category, calorie_target};
use crate::models::{ActivityLevel, DietPreference, Gender, Goal, NutritionRecord};

use super::{render_page, AppState};

const RESULT_TEMPLATE: &str = include_str!("../templates/result.html");

/// Number of dishes sampled per request
const MEAL_COUNT: usize = 3;

/// Full recommendation form
#[derive(Debug, Deserialize)]
pub struct RecommendForm {
    /// Age in years
    pub age: u32,
    /// Free-form gender value; anything but "male" counts as female
    pub gender: String,
    /// Height in centimeters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    /// Activity tier (low/medium/high)
    pub activity: String,
    /// Goal (weight_loss/maintain/muscle_gain)
    pub goal: String,
    /// Dietary preference (veg/non-veg/any)
    pub preference: String,
}

/// Resample form posted from the result page
#[derive(Debug, Deserialize)]
pub struct MoreMealsForm {
    /// Goal (weight_loss/maintain/muscle_gain)
    pub goal: String,
    /// Dietary preference (veg/non-veg/any)
    pub preference: String,
    /// Calorie figure carried through for redisplay
    #[serde(default)]
    pub calories: String,
    /// BMI figure carried through for redisplay
    #[serde(default)]
    pub bmi: String,
    /// BMI band carried through for redisplay
    #[serde(default)]
    pub bmi_category: String,
}

/// Routes for the recommendation endpoints
#[must_use]
pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/recommend", post(recommend_handler))
        .route("/more_meals", post(more_meals_handler))
        .with_state(state)
}

async fn recommend_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RecommendForm>,
) -> Result<Html<String>, AppError> {
    let gender = Gender::from_form_value(&form.gender);
    let activity = ActivityLevel::from_form_value(&form.activity);
    let goal = Goal::from_form_value(&form.goal);
    let preference = DietPreference::from_form_value(&form.preference);

    let breakdown = calorie_target(form.weight, form.height, form.age, gender, activity, goal)?;
    let bmi_value = bmi(form.weight, form.height)?;
    let category = bmi_category(bmi_value);

    let meals = state
        .catalog
        .sample_meals(goal, preference, MEAL_COUNT, &mut rand::thread_rng());

    info!(
        goal = goal.label(),
        preference = ?preference,
        target_calories = breakdown.target_calories,
        meals = meals.len(),
        "recommendation served"
    );

    // Calorie display truncates to a whole number
    Ok(Html(render_result(
        &format!("{}", breakdown.target_calories.floor() as i64),
        &format!("{bmi_value:.1}"),
        &category.to_string(),
        goal,
        preference,
        &meals,
    )))
}

async fn more_meals_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<MoreMealsForm>,
) -> Result<Html<String>, AppError> {
    let goal = Goal::from_form_value(&form.goal);
    let preference = DietPreference::from_form_value(&form.preference);

    let meals = state
        .catalog
        .sample_meals(goal, preference, MEAL_COUNT, &mut rand::thread_rng());

    info!(goal = goal.label(), meals = meals.len(), "resampled meals");

    // The carried-through figures came from the browser. They land in both
    // text and double-quoted attribute context, so quotes must be escaped
    // along with the usual markup characters.
    Ok(Html(render_result(
        &html_escape::encode_safe(&form.calories),
        &html_escape::encode_safe(&form.bmi),
        &html_escape::encode_safe(&form.bmi_category),
        goal,
        preference,
        &meals,
    )))
}

/// Fill the result template
fn render_result(
    calories: &str,
    bmi: &str,
    bmi_category: &str,
    goal: Goal,
    preference: DietPreference,
    meals: &[NutritionRecord],
) -> String {
    render_page(RESULT_TEMPLATE)
        .replace("{{CALORIES}}", calories)
        .replace("{{BMI}}", bmi)
        .replace("{{BMI_CATEGORY}}", bmi_category)
        .replace("{{GOAL}}", goal.label())
        .replace("{{GOAL_VALUE}}", goal.form_value())
        .replace("{{PREFERENCE_VALUE}}", preference.form_value())
        .replace("{{MEALS}}", &render_meal_cards(meals))
}

/// Render the sampled dishes as cards, or a friendly empty notice
fn render_meal_cards(meals: &[NutritionRecord]) -> String {
    if meals.is_empty() {
        return r#"<p class="empty">No dishes matched your goal and preference. Try a different preference.</p>"#
            .to_owned();
    }

    meals
        .iter()
        .map(|meal| {
            format!(
                r#"<div class="meal-card">
  <h3>{name}</h3>
  <small>{calories:.0} kcal &middot; {protein:.1} g protein &middot; {carbs:.1} g carbs &middot; {fat:.1} g fat</small>
</div>"#,
                name = html_escape::encode_text(&meal.dish_name),
                calories = meal.calories,
                protein = meal.protein,
                carbs = meal.carbs,
                fat = meal.fat,
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Goal;

    fn meal(name: &str) -> NutritionRecord {
        NutritionRecord {
            dish_name: name.into(),
            calories: 250.0,
            protein: 12.0,
            carbs: 30.0,
            fat: 8.0,
            cluster: 0,
            goal_label: Goal::Maintain,
        }
    }

    #[test]
    fn test_meal_cards_escape_dish_names() {
        let html = render_meal_cards(&[meal("<script>alert(1)</script>")]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_empty_meals_render_notice() {
        let html = render_meal_cards(&[]);
        assert!(html.contains("No dishes matched"));
    }

    #[test]
    fn test_result_template_fully_substituted() {
        let html = render_result(
            "2100",
            "22.9",
            "Normal",
            Goal::WeightLoss,
            DietPreference::Veg,
            &[meal("Dal Tadka")],
        );
        assert!(html.contains("2100"));
        assert!(html.contains("Weight Loss"));
        assert!(html.contains("weight_loss"));
        assert!(html.contains("Dal Tadka"));
        assert!(!html.contains("{{"), "unsubstituted placeholder left");
    }
}
