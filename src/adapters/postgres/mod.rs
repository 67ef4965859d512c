pub mod document_store;

// パブリックに型を再エクスポート
pub use document_store::DocumentStore as PostgresDocumentStore;
