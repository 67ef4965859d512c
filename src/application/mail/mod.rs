mod errors;
mod mail_service;

pub use errors::{MailApplicationError, Result};
pub use mail_service::send_mail;
