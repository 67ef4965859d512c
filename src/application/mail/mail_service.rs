use crate::ports::{MailProvider, OutgoingMail};

use super::errors::{MailApplicationError, Result};

/// メールを1通中継する
///
/// 宛先・件名・本文はそのままプロバイダに渡す。再試行はしない。
pub async fn send_mail(provider: &dyn MailProvider, mail: OutgoingMail) -> Result<()> {
    let recipient = mail.recipient.clone();

    let response = provider
        .send(mail)
        .await
        .map_err(MailApplicationError::ProviderFailure)?;

    tracing::info!(%recipient, %response, "Email sent");
    Ok(())
}
