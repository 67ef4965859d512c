pub mod mail_provider;

pub use mail_provider::{MailConfigError, MailProvider as SmtpMailProvider};
