use crate::ports::document_store::{
    CommitOutcome, Document, DocumentRef, DocumentStore as DocumentStoreTrait, Result,
    VersionedDocument, Write,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use uuid::Uuid;

/// ストアが到達不能な状態を表すエラー
#[derive(Debug, Error)]
#[error("document store is unavailable")]
pub struct StoreUnavailable;

#[derive(Debug, Clone)]
struct StoredDocument {
    version: u64,
    data: Document,
}

#[derive(Debug, Default)]
struct Collections {
    documents: HashMap<String, HashMap<String, StoredDocument>>,
    // ストア全体で単調増加させ、削除後の再作成でも同じバージョンを再利用しない
    last_version: u64,
}

impl Collections {
    fn next_version(&mut self) -> u64 {
        self.last_version += 1;
        self.last_version
    }

    fn current_version(&self, target: &DocumentRef) -> Option<u64> {
        self.documents
            .get(&target.collection)
            .and_then(|c| c.get(&target.id))
            .map(|d| d.version)
    }
}

/// DocumentStoreのインメモリ実装
///
/// 開発用のバックエンド兼テスト用。
/// バージョンによる楽観的排他制御はPostgreSQL実装と同じ動作をする。
/// `set_unavailable` で通信障害を再現できる。
#[derive(Debug, Default)]
pub struct DocumentStore {
    inner: Mutex<Collections>,
    unavailable: AtomicBool,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// テスト用に通信障害を再現する
    ///
    /// 有効な間はすべての操作がエラーを返し、状態は変化しない。
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Box::new(StoreUnavailable));
        }
        self.inner
            .lock()
            .map_err(|_| "in-memory document store lock poisoned".into())
    }
}

#[async_trait]
impl DocumentStoreTrait for DocumentStore {
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<VersionedDocument>> {
        let inner = self.lock()?;
        let Some(documents) = inner.documents.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(documents
            .iter()
            .filter(|(_, stored)| stored.data.get(field) == Some(value))
            .map(|(id, stored)| VersionedDocument {
                id: id.clone(),
                version: stored.version,
                data: stored.data.clone(),
            })
            .collect())
    }

    async fn get(&self, target: &DocumentRef) -> Result<Option<VersionedDocument>> {
        let inner = self.lock()?;
        Ok(inner
            .documents
            .get(&target.collection)
            .and_then(|c| c.get(&target.id))
            .map(|stored| VersionedDocument {
                id: target.id.clone(),
                version: stored.version,
                data: stored.data.clone(),
            }))
    }

    async fn add(&self, collection: &str, data: Document) -> Result<String> {
        let mut inner = self.lock()?;
        let id = Uuid::new_v4().simple().to_string();
        let version = inner.next_version();
        inner
            .documents
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), StoredDocument { version, data });
        Ok(id)
    }

    async fn set(&self, target: &DocumentRef, data: Document) -> Result<()> {
        let mut inner = self.lock()?;
        let version = inner.next_version();
        inner
            .documents
            .entry(target.collection.clone())
            .or_default()
            .insert(target.id.clone(), StoredDocument { version, data });
        Ok(())
    }

    /// すべての前提条件を検証してから適用する
    ///
    /// ロックを保持したまま検証と適用を行うため、並行するコミットと
    /// 部分的に混ざることはない。
    async fn commit(&self, writes: Vec<Write>) -> Result<CommitOutcome> {
        let mut inner = self.lock()?;

        let preconditions_hold = writes
            .iter()
            .all(|w| inner.current_version(w.target()) == Some(w.expected_version()));
        if !preconditions_hold {
            return Ok(CommitOutcome::Conflict);
        }

        for write in writes {
            match write {
                Write::Update { target, fields, .. } => {
                    let version = inner.next_version();
                    if let Some(stored) = inner
                        .documents
                        .get_mut(&target.collection)
                        .and_then(|c| c.get_mut(&target.id))
                    {
                        stored.data.extend(fields);
                        stored.version = version;
                    }
                }
                Write::Delete { target, .. } => {
                    if let Some(collection) = inner.documents.get_mut(&target.collection) {
                        collection.remove(&target.id);
                    }
                }
            }
        }

        Ok(CommitOutcome::Committed)
    }
}
