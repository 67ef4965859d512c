use crate::ports::document_store::{
    CommitOutcome, Document, DocumentRef, DocumentStore as DocumentStoreTrait, Result,
    VersionedDocument, Write,
};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row, postgres::PgRow, types::Json};
use uuid::Uuid;

/// PostgreSQLの行データをVersionedDocumentに変換する
///
/// versionはBIGINT（i64）で保存されているため、u64への変換で
/// エラーハンドリングを行う。
fn map_row_to_document(row: &PgRow) -> Result<VersionedDocument> {
    let version: i64 = row.get("version");
    let version: u64 = version.try_into().map_err(|_| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("document version out of range: {}", version),
        )) as Box<dyn std::error::Error + Send + Sync>
    })?;
    let Json(data): Json<Document> = row.get("data");

    Ok(VersionedDocument {
        id: row.get("id"),
        version,
        data,
    })
}

/// DocumentStoreのPostgreSQL実装
///
/// 1つの `documents` テーブルに (collection, id) をキーとしてJSONBで保存する。
/// バージョンはシーケンス `document_versions` から採番する。
pub struct DocumentStore {
    pool: PgPool,
}

impl DocumentStore {
    /// PostgreSQLコネクションプールから新しいDocumentStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// マイグレーションを適用する
    pub async fn migrate(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl DocumentStoreTrait for DocumentStore {
    /// JSONBの包含演算子（@>）で等値検索する
    ///
    /// `documents_data_idx`（GIN, jsonb_path_ops）が使われる。
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<VersionedDocument>> {
        let mut filter = Document::new();
        filter.insert(field.to_string(), value.clone());

        let rows = sqlx::query(
            r#"
            SELECT id, version, data
            FROM documents
            WHERE collection = $1 AND data @> $2
            "#,
        )
        .bind(collection)
        .bind(Json(filter))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_document).collect()
    }

    async fn get(&self, target: &DocumentRef) -> Result<Option<VersionedDocument>> {
        let row = sqlx::query(
            r#"
            SELECT id, version, data
            FROM documents
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(&target.collection)
        .bind(&target.id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_document).transpose()
    }

    async fn add(&self, collection: &str, data: Document) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, version, data)
            VALUES ($1, $2, nextval('document_versions'), $3)
            "#,
        )
        .bind(collection)
        .bind(&id)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn set(&self, target: &DocumentRef, data: Document) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, version, data)
            VALUES ($1, $2, nextval('document_versions'), $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET
                data = EXCLUDED.data,
                version = EXCLUDED.version
            "#,
        )
        .bind(&target.collection)
        .bind(&target.id)
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 1つのデータベーストランザクション内で前提条件付きの書き込みを実行する
    ///
    /// `WHERE version = $n` で比較し、0行しか更新されなければロールバックして
    /// Conflictを返す。並行するトランザクションが同じ行を更新している場合、
    /// 行ロックの解放後に条件が再評価される。
    async fn commit(&self, writes: Vec<Write>) -> Result<CommitOutcome> {
        let mut tx = self.pool.begin().await?;

        for write in writes {
            let expected_version = i64::try_from(write.expected_version())?;
            let result = match &write {
                Write::Update { target, fields, .. } => {
                    sqlx::query(
                        r#"
                        UPDATE documents
                        SET data = data || $3,
                            version = nextval('document_versions')
                        WHERE collection = $1 AND id = $2 AND version = $4
                        "#,
                    )
                    .bind(&target.collection)
                    .bind(&target.id)
                    .bind(Json(fields))
                    .bind(expected_version)
                    .execute(&mut *tx)
                    .await?
                }
                Write::Delete { target, .. } => {
                    sqlx::query(
                        r#"
                        DELETE FROM documents
                        WHERE collection = $1 AND id = $2 AND version = $3
                        "#,
                    )
                    .bind(&target.collection)
                    .bind(&target.id)
                    .bind(expected_version)
                    .execute(&mut *tx)
                    .await?
                }
            };

            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(CommitOutcome::Conflict);
            }
        }

        tx.commit().await?;
        Ok(CommitOutcome::Committed)
    }
}
