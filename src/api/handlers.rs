use crate::application::checkout::{
    ServiceDependencies, adjust_book_count as execute_adjust_book_count,
    cancel_checkout as execute_cancel_checkout, list_checkouts as execute_list_checkouts,
    return_checkout as execute_return_checkout, ReturnOutcome,
};
use crate::domain::{
    BookId, BorrowerEmail, CheckoutId,
    commands::{AdjustBookCount, CancelCheckout, ReturnCheckout},
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::{
    error::ApiError,
    types::{
        AdjustBookCountRequest, BookCountResponse, CancelCheckoutRequest,
        CheckoutCancelledResponse, CheckoutResponse, ListCheckoutsQuery, ReturnCheckoutRequest,
        ReturnCheckoutResponse,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /checkouts?email= - 利用者の貸出一覧を取得
///
/// emailが省略または空の場合は、ストアに問い合わせず空の一覧を返す。
pub async fn list_checkouts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCheckoutsQuery>,
) -> Result<Json<Vec<CheckoutResponse>>, ApiError> {
    let borrower = BorrowerEmail::resolve(query.email.as_deref());

    let records = execute_list_checkouts(&state.service_deps, borrower.as_ref()).await?;

    let in_flight = &state.service_deps.in_flight_returns;
    let checkouts = records
        .into_iter()
        .map(|record| {
            let in_progress = in_flight.contains(&record.id);
            CheckoutResponse::new(record, in_progress)
        })
        .collect();

    Ok(Json(checkouts))
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /checkouts/:id/cancel - 貸出申請を取り消す
///
/// 強制されるビジネスルール:
/// - 貸出記録がRequested状態であること
/// - 書籍が存在すること（在庫を1冊戻す）
pub async fn cancel_checkout(
    State(state): State<Arc<AppState>>,
    Path(checkout_id): Path<String>,
    Json(req): Json<CancelCheckoutRequest>,
) -> Result<Json<CheckoutCancelledResponse>, ApiError> {
    let cmd = CancelCheckout {
        checkout_id: CheckoutId::new(checkout_id)?,
        book_id: BookId::new(req.book_id)?,
    };
    let checkout_id = cmd.checkout_id.value().to_string();

    execute_cancel_checkout(&state.service_deps, cmd).await?;

    Ok(Json(CheckoutCancelledResponse {
        checkout_id,
        message: "Checkout cancelled successfully".to_string(),
    }))
}

/// POST /checkouts/:id/return - 書籍の返却を申請する
///
/// 強制されるビジネスルール:
/// - 利用者の確認（confirmed = true）があること。falseなら何も変更しない
/// - 同じ貸出記録の返却が処理中でないこと
/// - 貸出記録がApproved状態であること
pub async fn return_checkout(
    State(state): State<Arc<AppState>>,
    Path(checkout_id): Path<String>,
    Json(req): Json<ReturnCheckoutRequest>,
) -> Result<Json<ReturnCheckoutResponse>, ApiError> {
    let cmd = ReturnCheckout {
        checkout_id: CheckoutId::new(checkout_id)?,
        book_id: BookId::new(req.book_id)?,
        confirmation: req.confirmed.into(),
    };
    let checkout_id = cmd.checkout_id.value().to_string();

    let outcome = execute_return_checkout(&state.service_deps, cmd).await?;

    let message = match outcome {
        ReturnOutcome::ReturnRequested => "Return request submitted successfully",
        ReturnOutcome::Declined => "Return cancelled",
    };

    Ok(Json(ReturnCheckoutResponse {
        checkout_id,
        outcome: outcome.as_str().to_string(),
        message: message.to_string(),
    }))
}

/// POST /books/:id/adjust - 在庫数を増減する
pub async fn adjust_book_count(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
    Json(req): Json<AdjustBookCountRequest>,
) -> Result<Json<BookCountResponse>, ApiError> {
    let cmd = AdjustBookCount {
        book_id: BookId::new(book_id)?,
        delta: req.delta,
    };
    let book_id = cmd.book_id.value().to_string();

    let count = execute_adjust_book_count(&state.service_deps, cmd).await?;

    Ok(Json(BookCountResponse { book_id, count }))
}
