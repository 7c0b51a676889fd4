// ABOUTME: Route module organization for the Mealwise HTTP endpoints
// ABOUTME: Shared application state, router assembly, and template rendering helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mealwise

//! HTTP routes
//!
//! Routes are organized by domain: informational pages, the recommendation
//! form handlers, and health checks. Handlers are stateless over an
//! [`AppState`] built once at startup; the catalog inside it is never
//! mutated after load.

use crate::config::ServerConfig;
use crate::dataset::MealCatalog;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Health check and system status routes
pub mod health;
/// Informational pages (form, about, contact, login)
pub mod pages;
/// Recommendation form handlers
pub mod recommend;

pub use health::HealthRoutes;
pub use recommend::{MoreMealsForm, RecommendForm};

/// Shared stylesheet embedded into every page
const STYLE: &str = include_str!("../templates/base.css");

/// Read-only state shared by all handlers
pub struct AppState {
    /// Labeled dish catalog loaded at startup
    pub catalog: MealCatalog,
    /// Server configuration
    pub config: ServerConfig,
}

/// Substitute the shared stylesheet into an embedded page template
///
/// Templates are embedded with `include_str!` so rendering never touches the
/// filesystem at request time.
fn render_page(template: &str) -> String {
    template.replace("{{STYLE}}", STYLE)
}

/// Assemble the full application router
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(pages::routes())
        .merge(recommend::routes(state))
        .merge(HealthRoutes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
