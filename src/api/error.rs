use crate::application::checkout::CheckoutApplicationError;
use crate::domain::InvalidIdentifier;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
/// メッセージは利用者向けのアラート文として返す。
#[derive(Debug)]
pub enum ApiError {
    Application(CheckoutApplicationError),
    BadRequest(String),
}

impl From<CheckoutApplicationError> for ApiError {
    fn from(err: CheckoutApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl From<InvalidIdentifier> for ApiError {
    fn from(err: InvalidIdentifier) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ApiError::BadRequest(message) => {
                let body = Json(ErrorResponse::new("BAD_REQUEST", message));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            ApiError::Application(err) => err,
        };

        let (status, error_type) = match &err {
            // 404 Not Found - リクエストされたリソースが存在しない
            CheckoutApplicationError::CheckoutNotFound(_) => {
                (StatusCode::NOT_FOUND, "CHECKOUT_NOT_FOUND")
            }
            CheckoutApplicationError::BookNotFound(_) => (StatusCode::NOT_FOUND, "BOOK_NOT_FOUND"),

            // 409 Conflict - 現在の状態と両立しない
            CheckoutApplicationError::InvalidCheckoutState { .. } => {
                (StatusCode::CONFLICT, "INVALID_CHECKOUT_STATE")
            }
            CheckoutApplicationError::ReturnInProgress(_) => {
                (StatusCode::CONFLICT, "RETURN_IN_PROGRESS")
            }
            CheckoutApplicationError::TransactionContention { .. } => {
                tracing::warn!("{}", err);
                (StatusCode::CONFLICT, "TRANSACTION_CONTENTION")
            }

            // 422 Unprocessable Entity - ビジネスルール違反
            CheckoutApplicationError::BookMismatch { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "BOOK_MISMATCH")
            }
            CheckoutApplicationError::Inventory(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVENTORY_INVARIANT")
            }

            // 5xx - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            CheckoutApplicationError::StoreUnavailable(source) => {
                tracing::error!(error.cause = %source, "Document store error");
                let body = Json(ErrorResponse::new(
                    "STORE_UNAVAILABLE",
                    "Document store is unavailable, please try again",
                ));
                return (StatusCode::SERVICE_UNAVAILABLE, body).into_response();
            }
            CheckoutApplicationError::InvalidDocument { .. } => {
                tracing::error!("{}", err);
                let body = Json(ErrorResponse::new(
                    "INVALID_DOCUMENT",
                    "Stored checkout data is invalid",
                ));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
        };

        let body = Json(ErrorResponse::new(error_type, err.to_string()));
        (status, body).into_response()
    }
}
