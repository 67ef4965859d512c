//! ドキュメントストア上の表現と、ドメイン型との変換

use crate::domain::{BookId, CheckoutDetails, CheckoutId, CheckoutRecord, CheckoutStatus};
use crate::ports::{Document, DocumentRef, VersionedDocument};
use serde_json::Value;

use super::errors::{CheckoutApplicationError, Result};

pub const CHECKOUT_COLLECTION: &str = "checkout";
pub const BOOKS_COLLECTION: &str = "books";

pub const EMAIL_FIELD: &str = "email";
pub const STATUS_FIELD: &str = "status";
pub const COUNT_FIELD: &str = "count";

pub fn checkout_ref(checkout_id: &CheckoutId) -> DocumentRef {
    DocumentRef::new(CHECKOUT_COLLECTION, checkout_id.value())
}

pub fn book_ref(book_id: &BookId) -> DocumentRef {
    DocumentRef::new(BOOKS_COLLECTION, book_id.value())
}

fn invalid(collection: &str, id: &str, reason: impl ToString) -> CheckoutApplicationError {
    CheckoutApplicationError::InvalidDocument {
        document: format!("{}/{}", collection, id),
        reason: reason.to_string(),
    }
}

pub fn decode_checkout(doc: &VersionedDocument) -> Result<CheckoutRecord> {
    let id =
        CheckoutId::new(doc.id.clone()).map_err(|e| invalid(CHECKOUT_COLLECTION, &doc.id, e))?;
    let details: CheckoutDetails = serde_json::from_value(Value::Object(doc.data.clone()))
        .map_err(|e| invalid(CHECKOUT_COLLECTION, &doc.id, e))?;
    Ok(CheckoutRecord { id, details })
}

pub fn encode_checkout(details: &CheckoutDetails) -> Document {
    match serde_json::to_value(details) {
        Ok(Value::Object(map)) => map,
        // CheckoutDetailsは常にオブジェクトにシリアライズされる
        _ => Document::new(),
    }
}

/// 在庫数を読み取る
///
/// 整数でない・欠けている場合は不正なドキュメントとして扱う。
pub fn decode_count(doc: &VersionedDocument) -> Result<i64> {
    doc.data
        .get(COUNT_FIELD)
        .and_then(Value::as_i64)
        .ok_or_else(|| invalid(BOOKS_COLLECTION, &doc.id, "missing integer field `count`"))
}

pub fn count_fields(count: i64) -> Document {
    let mut fields = Document::new();
    fields.insert(COUNT_FIELD.to_string(), Value::from(count));
    fields
}

pub fn status_fields(status: CheckoutStatus) -> Document {
    let mut fields = Document::new();
    fields.insert(STATUS_FIELD.to_string(), Value::from(status.code()));
    fields
}
