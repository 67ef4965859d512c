use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// スキーマレスなドキュメント本体
pub type Document = Map<String, Value>;

/// コレクション内のドキュメントへの参照
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    pub collection: String,
    pub id: String,
}

impl DocumentRef {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// バージョン付きで読み出したドキュメント
///
/// バージョンは書き込みのたびに変わる。楽観的排他制御の前提条件に使う。
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedDocument {
    pub id: String,
    pub version: u64,
    pub data: Document,
}

/// トランザクション内の書き込み
///
/// いずれも「読み出したときのバージョンから変わっていないこと」を前提条件に持つ。
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    /// 指定フィールドを上書きする（他のフィールドは保持）
    Update {
        target: DocumentRef,
        expected_version: u64,
        fields: Document,
    },
    Delete {
        target: DocumentRef,
        expected_version: u64,
    },
}

impl Write {
    pub fn target(&self) -> &DocumentRef {
        match self {
            Write::Update { target, .. } | Write::Delete { target, .. } => target,
        }
    }

    pub fn expected_version(&self) -> u64 {
        match self {
            Write::Update {
                expected_version, ..
            }
            | Write::Delete {
                expected_version, ..
            } => *expected_version,
        }
    }
}

/// コミット結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// すべての書き込みが適用された
    Committed,
    /// 前提条件のいずれかが満たされず、何も適用されなかった
    Conflict,
}

/// ドキュメントストアポート
///
/// コレクション単位のスキーマレスなストレージを抽象化する。
/// 唯一の信頼できる情報源であり、サービス側は状態を保持しない。
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// フィールドの等値条件でコレクションを検索する
    ///
    /// 返す順序はストア依存。
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<VersionedDocument>>;

    /// ドキュメントを1件取得する
    async fn get(&self, target: &DocumentRef) -> Result<Option<VersionedDocument>>;

    /// ストアがIDを採番してドキュメントを追加する
    async fn add(&self, collection: &str, data: Document) -> Result<String>;

    /// 指定IDでドキュメントを作成または置き換える
    async fn set(&self, target: &DocumentRef, data: Document) -> Result<()>;

    /// バージョン前提条件付きの書き込みをまとめて適用する
    ///
    /// すべて適用されるか、何も適用されないかのどちらか。
    /// 前提条件の不一致はエラーではなく `CommitOutcome::Conflict` で返す。
    async fn commit(&self, writes: Vec<Write>) -> Result<CommitOutcome>;
}
