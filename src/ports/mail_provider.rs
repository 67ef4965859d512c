use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 送信するメール
///
/// 差出人は送信側の設定で固定されるため、ここには含めない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub recipient: String,
    pub subject: String,
    pub html: String,
}

/// メールプロバイダポート
///
/// 実際の配送は外部サービスに委譲する。
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// メールを1通送信し、プロバイダの応答を返す
    async fn send(&self, mail: OutgoingMail) -> Result<String>;
}
