use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, adjust_book_count, cancel_checkout, list_checkouts, return_checkout,
};
use super::mail::{MailRelayState, send_email};

/// Creates the checkout ledger router
///
/// Query endpoints:
/// - GET /checkouts?email= - List a borrower's checkouts
///
/// Command endpoints:
/// - POST /checkouts/:id/cancel - Cancel a requested checkout
/// - POST /checkouts/:id/return - Request the return of an approved checkout
/// - POST /books/:id/adjust - Adjust a book's available count
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/checkouts", get(list_checkouts))
        .route("/checkouts/:id/cancel", post(cancel_checkout))
        .route("/checkouts/:id/return", post(return_checkout))
        .route("/books/:id/adjust", post(adjust_book_count))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Creates the mail relay router
///
/// - POST /send-email - Forward one message to the mail provider
pub fn create_mail_router(state: Arc<MailRelayState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/send-email", post(send_email))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
