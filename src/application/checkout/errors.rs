use crate::domain::{BookId, CheckoutId, CheckoutStatus, CheckoutTransitionError, InventoryError};
use thiserror::Error;

/// 貸出台帳アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum CheckoutApplicationError {
    /// ドキュメントストアとの通信に失敗した
    #[error("Document store unavailable")]
    StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// トランザクション実行時点で書籍ドキュメントが存在しない
    #[error("Book {0} not found")]
    BookNotFound(BookId),

    #[error("Checkout {0} not found")]
    CheckoutNotFound(CheckoutId),

    /// 貸出記録の状態が操作の前提と異なる（例: 取消を要求したが承認済みだった）
    #[error("Checkout is {actual}, expected {expected}")]
    InvalidCheckoutState {
        expected: CheckoutStatus,
        actual: CheckoutStatus,
    },

    /// 貸出記録が別の書籍を参照している
    #[error("Checkout references book {recorded}, not {requested}")]
    BookMismatch { recorded: BookId, requested: BookId },

    /// 在庫数の不変条件違反
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// 同じ貸出記録の返却が処理中
    #[error("Return already in progress for checkout {0}")]
    ReturnInProgress(CheckoutId),

    /// 競合が続き、再試行の上限に達した
    #[error("Transaction aborted after {attempts} conflicting attempts")]
    TransactionContention { attempts: usize },

    /// ストア上のドキュメントを読み取れない
    #[error("Invalid document {document}: {reason}")]
    InvalidDocument { document: String, reason: String },
}

impl From<CheckoutTransitionError> for CheckoutApplicationError {
    fn from(err: CheckoutTransitionError) -> Self {
        match err {
            CheckoutTransitionError::InvalidState { expected, actual } => {
                CheckoutApplicationError::InvalidCheckoutState { expected, actual }
            }
            CheckoutTransitionError::BookMismatch {
                recorded,
                requested,
            } => CheckoutApplicationError::BookMismatch {
                recorded,
                requested,
            },
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, CheckoutApplicationError>;
