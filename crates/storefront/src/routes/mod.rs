//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog listing
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products/{id}          - Product detail, quantity stepper
//! POST /products/{id}/cart     - Put the product in the cart
//!
//! # Order
//! GET  /order                  - Order form with cart summary
//! POST /order                  - Submit the order
//! GET  /order/confirmed/{id}   - Confirmation page
//!
//! # Auth (document-store variant)
//! GET  /auth/sign-in           - Sign-in page
//! POST /auth/sign-in           - Sign-in action
//! GET  /auth/sign-up           - Sign-up page
//! POST /auth/sign-up           - Sign-up action
//! GET  /auth/federated         - Redirect to the identity provider
//! GET  /auth/callback          - Federated sign-in callback
//! POST /auth/sign-out          - Sign-out action
//!
//! # Admin
//! GET  /admin                  - Passphrase gate or dashboard
//! POST /admin/login            - Check the passphrase
//! POST /admin/orders/{id}/complete - Mark an order completed
//! POST /admin/logout           - Drop the gate flag
//!
//! # Theme
//! POST /theme/toggle           - Flip light/dark, redirect back
//! ```

pub mod admin;
pub mod auth;
pub mod order;
pub mod products;

use axum::{
    Router,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;

use crate::selection;
use crate::state::AppState;

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(order::new_order).post(order::submit))
        .route("/confirmed/{id}", get(order::confirmed))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-in", get(auth::sign_in_page).post(auth::sign_in))
        .route("/sign-up", get(auth::sign_up_page).post(auth::sign_up))
        .route("/federated", get(auth::federated))
        .route("/callback", get(auth::callback))
        .route("/sign-out", post(auth::sign_out))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/login", post(admin::login))
        .route("/orders/{id}/complete", post(admin::complete_order))
        .route("/logout", post(admin::logout))
}

/// Flip the theme and go back where the form came from.
pub async fn toggle_theme(session: Session, headers: HeaderMap) -> Response {
    let next = selection::theme(&session).await.toggled();
    if let Err(e) = selection::set_theme(&session, next).await {
        tracing::error!(error = %e, "Failed to store theme preference");
    }

    let back = headers
        .get(axum::http::header::REFERER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("/");
    Redirect::to(back).into_response()
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog listing is the home page
        .route("/", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/products/{id}/cart", post(products::add_to_cart))
        .nest("/order", order_routes())
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes())
        .route("/theme/toggle", post(toggle_theme))
}
