use crate::config::SmtpConfig;
use crate::ports::mail_provider::{MailProvider as MailProviderTrait, OutgoingMail, Result};
use async_trait::async_trait;
use lettre::{
    Address, Message, SmtpTransport, Transport,
    address::AddressError,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::time::Duration;
use thiserror::Error;

/// SMTP送信元の設定エラー
#[derive(Debug, Error)]
pub enum MailConfigError {
    /// smtp.from も smtp.username も設定されていない
    #[error("no sender address configured (set smtp.from or smtp.username)")]
    MissingSender,

    #[error("invalid sender address")]
    InvalidSender(#[from] AddressError),

    #[error("failed to create SMTP transport")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// MailProviderのSMTP実装（lettre）
///
/// 差出人と認証情報は設定からのみ受け取る。
/// `smtp.from` が未設定の場合はログインユーザーを差出人アドレスとして使う。
pub struct MailProvider {
    transport: SmtpTransport,
    sender: Mailbox,
}

impl MailProvider {
    pub fn new(config: &SmtpConfig) -> std::result::Result<Self, MailConfigError> {
        let sender_address = config
            .from
            .as_deref()
            .or(config.username.as_deref())
            .ok_or(MailConfigError::MissingSender)?;
        let sender = Mailbox::new(config.from_name.clone(), sender_address.parse::<Address>()?);

        let builder = if config.use_tls {
            SmtpTransport::starttls_relay(&config.host)?
        } else {
            SmtpTransport::builder_dangerous(&config.host)
        }
        .port(config.port)
        .timeout(Some(Duration::from_secs(config.timeout_secs)));

        let builder = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            sender,
        })
    }

    pub fn sender(&self) -> &Mailbox {
        &self.sender
    }
}

#[async_trait]
impl MailProviderTrait for MailProvider {
    /// HTML本文のメールを1通送信する
    ///
    /// lettreのSmtpTransportは同期APIなので、ブロッキングスレッドで実行する。
    async fn send(&self, mail: OutgoingMail) -> Result<String> {
        let recipient: Mailbox = mail.recipient.parse()?;
        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html)?;

        let transport = self.transport.clone();
        let response = tokio::task::spawn_blocking(move || transport.send(&message)).await??;

        Ok(response.message().collect::<Vec<_>>().join(" "))
    }
}
