use thiserror::Error;

use super::{BookId, CheckoutStatus};

/// 識別子のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidIdentifier {
    #[error("checkout id must not be empty")]
    EmptyCheckoutId,
    #[error("book id must not be empty")]
    EmptyBookId,
    #[error("borrower email must not be empty")]
    EmptyBorrowerEmail,
}

/// 貸出ステータスの整数表現が不正
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown checkout status code: {0}")]
pub struct UnknownStatus(pub i64);

/// 貸出記録の状態遷移エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutTransitionError {
    /// 遷移元の状態が期待と異なる
    #[error("checkout is {actual}, expected {expected}")]
    InvalidState {
        expected: CheckoutStatus,
        actual: CheckoutStatus,
    },

    /// 貸出記録が参照する書籍と呼び出し側の書籍が一致しない
    #[error("checkout references book {recorded}, not {requested}")]
    BookMismatch { recorded: BookId, requested: BookId },
}

/// 在庫数の不変条件違反
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// 在庫数が0未満になる
    #[error("available count {current} cannot be adjusted by {delta}: result would be negative")]
    Underflow { current: i64, delta: i64 },

    #[error("available count {current} cannot be adjusted by {delta}: result overflows")]
    Overflow { current: i64, delta: i64 },
}
