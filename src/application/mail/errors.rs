use thiserror::Error;

/// メール中継アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum MailApplicationError {
    /// プロバイダが送信を拒否した、または到達できない
    #[error("Mail provider failure")]
    ProviderFailure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, MailApplicationError>;
