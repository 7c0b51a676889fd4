// ABOUTME: Static informational pages - input form, about, contact, login
// ABOUTME: All content embedded at compile time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mealwise

//! Informational pages
//!
//! `GET /` serves the input form; the remaining pages are static. The login
//! page is informational only, there is no authentication.

use axum::response::Html;
use axum::routing::get;
use axum::Router;

use super::render_page;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const ABOUT_TEMPLATE: &str = include_str!("../templates/about.html");
const CONTACT_TEMPLATE: &str = include_str!("../templates/contact.html");
const LOGIN_TEMPLATE: &str = include_str!("../templates/login.html");

/// Routes for the static pages
#[must_use]
pub fn routes() -> Router {
    async fn index_handler() -> Html<String> {
        Html(render_page(INDEX_TEMPLATE))
    }

    async fn about_handler() -> Html<String> {
        Html(render_page(ABOUT_TEMPLATE))
    }

    async fn contact_handler() -> Html<String> {
        Html(render_page(CONTACT_TEMPLATE))
    }

    async fn login_handler() -> Html<String> {
        Html(render_page(LOGIN_TEMPLATE))
    }

    Router::new()
        .route("/", get(index_handler))
        .route("/about", get(about_handler))
        .route("/contact", get(contact_handler))
        .route("/login", get(login_handler))
}
