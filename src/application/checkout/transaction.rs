use crate::ports::{CommitOutcome, DocumentRef, DocumentStore, VersionedDocument, Write};
use futures::future::try_join_all;

use super::errors::{CheckoutApplicationError, Result};

/// 競合時にトランザクション本体を再実行する上限回数
pub const MAX_TRANSACTION_ATTEMPTS: usize = 5;

/// トランザクション開始時に読み出したドキュメント
///
/// `reads` に渡した参照と同じ順序で並ぶ。
pub struct Snapshot {
    documents: Vec<Option<VersionedDocument>>,
}

impl Snapshot {
    /// `reads[index]` のドキュメント（存在しなければ `None`）
    pub fn document(&self, index: usize) -> Option<&VersionedDocument> {
        self.documents.get(index).and_then(Option::as_ref)
    }
}

/// 楽観的排他制御による読み取り・変更・書き込み
///
/// 1. `reads` のドキュメントをバージョン付きで読み出す
/// 2. `body` が読み出した内容から書き込みを決める
/// 3. 読み出したバージョンを前提条件としてコミットする
///
/// 前提条件が崩れていれば（並行する更新があれば）1からやり直す。
/// `body` のエラーと通信エラーは再試行しない。
pub async fn run_transaction<T, F>(
    store: &dyn DocumentStore,
    reads: &[DocumentRef],
    mut body: F,
) -> Result<T>
where
    F: FnMut(&Snapshot) -> Result<(Vec<Write>, T)>,
{
    for attempt in 1..=MAX_TRANSACTION_ATTEMPTS {
        let documents = try_join_all(reads.iter().map(|target| store.get(target)))
            .await
            .map_err(CheckoutApplicationError::StoreUnavailable)?;
        let snapshot = Snapshot { documents };

        let (writes, output) = body(&snapshot)?;

        match store
            .commit(writes)
            .await
            .map_err(CheckoutApplicationError::StoreUnavailable)?
        {
            CommitOutcome::Committed => return Ok(output),
            CommitOutcome::Conflict => {
                tracing::debug!(attempt, "Transaction conflict, retrying");
            }
        }
    }

    Err(CheckoutApplicationError::TransactionContention {
        attempts: MAX_TRANSACTION_ATTEMPTS,
    })
}
