use serde::{Deserialize, Serialize};
use std::fmt;

use super::{BookId, CheckoutId, CheckoutTransitionError, UnknownStatus};

// ============================================================================
// 貸出ステータス
// ============================================================================

/// 貸出記録のステータス
///
/// ドキュメントストアには整数（0〜3）で保存される。
/// 遷移は一方向のみ：
/// - Requested → （削除）      … 取消
/// - Approved → ReturnPending  … 返却申請
/// - ReturnPending → Returned  … 職員による承認（このサービスの範囲外）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum CheckoutStatus {
    /// 貸出申請中
    Requested,
    /// 貸出中（承認済み）
    Approved,
    /// 返却承認待ち
    ReturnPending,
    /// 返却済み
    Returned,
}

/// 利用者が貸出記録に対して実行できる操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutAction {
    Cancel,
    Return,
}

impl CheckoutAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutAction::Cancel => "cancel",
            CheckoutAction::Return => "return",
        }
    }
}

impl CheckoutStatus {
    /// ストア上の整数表現
    pub fn code(self) -> i64 {
        match self {
            CheckoutStatus::Requested => 0,
            CheckoutStatus::Approved => 1,
            CheckoutStatus::ReturnPending => 2,
            CheckoutStatus::Returned => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStatus::Requested => "requested",
            CheckoutStatus::Approved => "approved",
            CheckoutStatus::ReturnPending => "return_pending",
            CheckoutStatus::Returned => "returned",
        }
    }

    /// この状態で利用者に許される操作
    ///
    /// 返却承認待ち・返却済みでは操作できない。
    pub fn available_action(self) -> Option<CheckoutAction> {
        match self {
            CheckoutStatus::Requested => Some(CheckoutAction::Cancel),
            CheckoutStatus::Approved => Some(CheckoutAction::Return),
            CheckoutStatus::ReturnPending | CheckoutStatus::Returned => None,
        }
    }
}

impl TryFrom<i64> for CheckoutStatus {
    type Error = UnknownStatus;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(CheckoutStatus::Requested),
            1 => Ok(CheckoutStatus::Approved),
            2 => Ok(CheckoutStatus::ReturnPending),
            3 => Ok(CheckoutStatus::Returned),
            other => Err(UnknownStatus(other)),
        }
    }
}

impl From<CheckoutStatus> for i64 {
    fn from(status: CheckoutStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for CheckoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// 貸出記録
// ============================================================================

/// 貸出記録のフィールド（checkout コレクションのドキュメント本体）
///
/// 表示用の文字列（書名・著者・貸出日時・貸出コード）は欠けていてもよい。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDetails {
    pub email: String,
    pub book_id: BookId,
    #[serde(default)]
    pub book_name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub borrow_time: String,
    #[serde(default)]
    pub borrow_code: String,
    pub status: CheckoutStatus,
}

/// 貸出記録 - ある利用者によるある書籍の1回の貸出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRecord {
    pub id: CheckoutId,
    pub details: CheckoutDetails,
}

impl std::ops::Deref for CheckoutRecord {
    type Target = CheckoutDetails;

    fn deref(&self) -> &Self::Target {
        &self.details
    }
}

// ============================================================================
// 状態遷移（純粋関数）
// ============================================================================

fn ensure_book(record: &CheckoutRecord, book_id: &BookId) -> Result<(), CheckoutTransitionError> {
    if &record.book_id != book_id {
        return Err(CheckoutTransitionError::BookMismatch {
            recorded: record.book_id.clone(),
            requested: book_id.clone(),
        });
    }
    Ok(())
}

/// 純粋関数：貸出申請を取り消せるか検証する
///
/// ビジネスルール：
/// - Requested状態のみ取消可能（承認後は削除しない）
/// - 指定された書籍が貸出記録の書籍と一致すること
///
/// 取消は記録の削除なので、新しい状態は返さない。
pub fn cancel(record: &CheckoutRecord, book_id: &BookId) -> Result<(), CheckoutTransitionError> {
    if record.status != CheckoutStatus::Requested {
        return Err(CheckoutTransitionError::InvalidState {
            expected: CheckoutStatus::Requested,
            actual: record.status,
        });
    }
    ensure_book(record, book_id)
}

/// 純粋関数：返却を申請する
///
/// ビジネスルール：
/// - Approved状態のみ返却申請可能
/// - 遷移先はReturnPending（Returnedへの遷移は職員の承認による）
pub fn request_return(
    record: &CheckoutRecord,
    book_id: &BookId,
) -> Result<CheckoutStatus, CheckoutTransitionError> {
    if record.status != CheckoutStatus::Approved {
        return Err(CheckoutTransitionError::InvalidState {
            expected: CheckoutStatus::Approved,
            actual: record.status,
        });
    }
    ensure_book(record, book_id)?;
    Ok(CheckoutStatus::ReturnPending)
}
