pub mod mail_provider;

pub use mail_provider::MailProvider as MockMailProvider;
