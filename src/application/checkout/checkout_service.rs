use crate::domain::{
    self, BorrowerEmail, CheckoutRecord, CheckoutStatus,
    commands::{AdjustBookCount, CancelCheckout, ReturnCheckout, ReturnConfirmation},
};
use crate::ports::{DocumentStore, Write};
use serde_json::Value;
use std::sync::Arc;

use super::documents::{
    CHECKOUT_COLLECTION, EMAIL_FIELD, book_ref, checkout_ref, count_fields, decode_checkout,
    decode_count, status_fields,
};
use super::errors::{CheckoutApplicationError, Result};
use super::in_flight::InFlightReturns;
use super::transaction::run_transaction;

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub document_store: Arc<dyn DocumentStore>,
    pub in_flight_returns: Arc<InFlightReturns>,
}

impl ServiceDependencies {
    pub fn new(document_store: Arc<dyn DocumentStore>) -> Self {
        Self {
            document_store,
            in_flight_returns: Arc::new(InFlightReturns::new()),
        }
    }
}

/// 返却操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// 返却を申請した（ReturnPendingへ遷移し、在庫を1冊戻した）
    ReturnRequested,
    /// 利用者が確認を拒否した（何も変更していない）
    Declined,
}

impl ReturnOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnOutcome::ReturnRequested => "return_requested",
            ReturnOutcome::Declined => "declined",
        }
    }
}

/// 利用者の貸出記録一覧を取得する
///
/// 識別子が未解決（`None`）の場合はストアに問い合わせず空の一覧を返す。
/// 並び順はストア依存。1件でも読み取れないドキュメントがあれば全体をエラーにする。
pub async fn list_checkouts(
    deps: &ServiceDependencies,
    borrower: Option<&BorrowerEmail>,
) -> Result<Vec<CheckoutRecord>> {
    let Some(borrower) = borrower else {
        return Ok(Vec::new());
    };

    let documents = deps
        .document_store
        .find_by_field(
            CHECKOUT_COLLECTION,
            EMAIL_FIELD,
            &Value::from(borrower.value()),
        )
        .await
        .map_err(CheckoutApplicationError::StoreUnavailable)?;

    documents.iter().map(decode_checkout).collect()
}

/// 貸出申請を取り消す（純粋な関数）
///
/// ビジネスルール：
/// - 貸出記録が存在し、Requested状態であること（トランザクション内で再検証）
/// - 貸出記録の書籍が指定された書籍と一致すること
/// - 書籍ドキュメントが存在すること
///
/// 貸出記録の削除と在庫の+1は1つのコミットで適用される。
/// どの失敗でも何も適用されない。
pub async fn cancel_checkout(deps: &ServiceDependencies, cmd: CancelCheckout) -> Result<()> {
    let checkout = checkout_ref(&cmd.checkout_id);
    let book = book_ref(&cmd.book_id);

    run_transaction(
        deps.document_store.as_ref(),
        &[checkout.clone(), book.clone()],
        |snapshot| {
            // 1. 貸出記録の状態を検証
            let checkout_doc = snapshot
                .document(0)
                .ok_or_else(|| CheckoutApplicationError::CheckoutNotFound(cmd.checkout_id.clone()))?;
            let record = decode_checkout(checkout_doc)?;
            domain::checkout::cancel(&record, &cmd.book_id)?;

            // 2. 在庫数を計算
            let book_doc = snapshot
                .document(1)
                .ok_or_else(|| CheckoutApplicationError::BookNotFound(cmd.book_id.clone()))?;
            let count = domain::inventory::adjust_count(decode_count(book_doc)?, 1)?;

            // 3. 削除と在庫更新をまとめて書き込む
            let writes = vec![
                Write::Delete {
                    target: checkout.clone(),
                    expected_version: checkout_doc.version,
                },
                Write::Update {
                    target: book.clone(),
                    expected_version: book_doc.version,
                    fields: count_fields(count),
                },
            ];
            Ok((writes, count))
        },
    )
    .await
    .map(|count| {
        tracing::info!(
            checkout_id = %cmd.checkout_id,
            book_id = %cmd.book_id,
            count,
            "Checkout cancelled"
        );
    })
}

/// 書籍の返却を申請する（純粋な関数）
///
/// ビジネスルール：
/// - 利用者の確認が得られていること（拒否された場合は何もせず `Declined`）
/// - 同じ貸出記録の返却が処理中でないこと
/// - 貸出記録が存在し、Approved状態であること（トランザクション内で再検証）
/// - 貸出記録の書籍が指定された書籍と一致すること
/// - 書籍ドキュメントが存在すること
///
/// ステータスのReturnPendingへの更新と在庫の+1は1つのコミットで適用される。
pub async fn return_checkout(
    deps: &ServiceDependencies,
    cmd: ReturnCheckout,
) -> Result<ReturnOutcome> {
    if cmd.confirmation == ReturnConfirmation::Declined {
        return Ok(ReturnOutcome::Declined);
    }

    let _guard = deps
        .in_flight_returns
        .try_begin(&cmd.checkout_id)
        .ok_or_else(|| CheckoutApplicationError::ReturnInProgress(cmd.checkout_id.clone()))?;

    let checkout = checkout_ref(&cmd.checkout_id);
    let book = book_ref(&cmd.book_id);

    let count = run_transaction(
        deps.document_store.as_ref(),
        &[checkout.clone(), book.clone()],
        |snapshot| {
            let checkout_doc = snapshot
                .document(0)
                .ok_or_else(|| CheckoutApplicationError::CheckoutNotFound(cmd.checkout_id.clone()))?;
            let record = decode_checkout(checkout_doc)?;
            let next_status: CheckoutStatus =
                domain::checkout::request_return(&record, &cmd.book_id)?;

            let book_doc = snapshot
                .document(1)
                .ok_or_else(|| CheckoutApplicationError::BookNotFound(cmd.book_id.clone()))?;
            let count = domain::inventory::adjust_count(decode_count(book_doc)?, 1)?;

            let writes = vec![
                Write::Update {
                    target: checkout.clone(),
                    expected_version: checkout_doc.version,
                    fields: status_fields(next_status),
                },
                Write::Update {
                    target: book.clone(),
                    expected_version: book_doc.version,
                    fields: count_fields(count),
                },
            ];
            Ok((writes, count))
        },
    )
    .await?;

    tracing::info!(
        checkout_id = %cmd.checkout_id,
        book_id = %cmd.book_id,
        count,
        "Return requested"
    );

    Ok(ReturnOutcome::ReturnRequested)
}

/// 書籍の在庫数を増減する
///
/// トランザクション実行時点で書籍ドキュメントが存在しなければ `BookNotFound`。
/// ドキュメントを新規作成することはない。
/// 結果が0未満になる調整は拒否する。
///
/// # 戻り値
/// 調整後の在庫数
pub async fn adjust_book_count(deps: &ServiceDependencies, cmd: AdjustBookCount) -> Result<i64> {
    let book = book_ref(&cmd.book_id);

    let count = run_transaction(
        deps.document_store.as_ref(),
        std::slice::from_ref(&book),
        |snapshot| {
            let book_doc = snapshot
                .document(0)
                .ok_or_else(|| CheckoutApplicationError::BookNotFound(cmd.book_id.clone()))?;
            let count = domain::inventory::adjust_count(decode_count(book_doc)?, cmd.delta)?;

            let writes = vec![Write::Update {
                target: book.clone(),
                expected_version: book_doc.version,
                fields: count_fields(count),
            }];
            Ok((writes, count))
        },
    )
    .await?;

    tracing::info!(book_id = %cmd.book_id, delta = cmd.delta, count, "Book count adjusted");

    Ok(count)
}
