use serde::{Deserialize, Serialize};

use crate::domain::CheckoutRecord;

/// 貸出一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListCheckoutsQuery {
    /// 利用者のメールアドレス（未解決なら省略または空）
    pub email: Option<String>,
}

/// 貸出記録レスポンス（GET /checkouts）
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub id: String,
    pub email: String,
    pub book_id: String,
    pub book_name: String,
    pub author: String,
    pub borrow_time: String,
    pub borrow_code: String,
    /// ストア上の整数表現（0〜3）
    pub status: i64,
    pub status_label: String,
    /// 利用者が実行できる操作（"cancel" / "return"）
    pub allowed_action: Option<String>,
    /// 返却が処理中か（処理中は操作を無効にする）
    pub return_in_progress: bool,
}

impl CheckoutResponse {
    pub fn new(record: CheckoutRecord, return_in_progress: bool) -> Self {
        let status = record.status;
        Self {
            id: record.id.value().to_string(),
            email: record.details.email,
            book_id: record.details.book_id.value().to_string(),
            book_name: record.details.book_name,
            author: record.details.author,
            borrow_time: record.details.borrow_time,
            borrow_code: record.details.borrow_code,
            status: status.code(),
            status_label: status.as_str().to_string(),
            allowed_action: status.available_action().map(|a| a.as_str().to_string()),
            return_in_progress,
        }
    }
}

/// 貸出取消リクエスト（POST /checkouts/:id/cancel）
#[derive(Debug, Serialize, Deserialize)]
pub struct CancelCheckoutRequest {
    pub book_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutCancelledResponse {
    pub checkout_id: String,
    pub message: String,
}

/// 返却リクエスト（POST /checkouts/:id/return）
///
/// `confirmed` は利用者の確認ダイアログの結果。
#[derive(Debug, Serialize, Deserialize)]
pub struct ReturnCheckoutRequest {
    pub book_id: String,
    pub confirmed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReturnCheckoutResponse {
    pub checkout_id: String,
    /// "return_requested" または "declined"
    pub outcome: String,
    pub message: String,
}

/// 在庫数調整リクエスト（POST /books/:id/adjust）
#[derive(Debug, Serialize, Deserialize)]
pub struct AdjustBookCountRequest {
    pub delta: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookCountResponse {
    pub book_id: String,
    pub count: i64,
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
