pub mod document_store;
pub mod mail_provider;

pub use document_store::{
    CommitOutcome, Document, DocumentRef, DocumentStore, VersionedDocument, Write,
};
pub use mail_provider::{MailProvider, OutgoingMail};
