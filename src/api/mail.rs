use crate::application::mail::send_mail;
use crate::ports::{MailProvider, OutgoingMail};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// メール中継で共有される状態
#[derive(Clone)]
pub struct MailRelayState {
    pub mail_provider: Arc<dyn MailProvider>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub recipient: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendEmailResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendEmailErrorResponse {
    pub error: String,
}

/// POST /send-email - メールを1通中継する
///
/// プロバイダのエラーはすべて同じ500レスポンスになる（詳細はログのみ）。
pub async fn send_email(
    State(state): State<Arc<MailRelayState>>,
    Json(req): Json<SendEmailRequest>,
) -> Response {
    let mail = OutgoingMail {
        recipient: req.recipient,
        subject: req.subject,
        html: req.html,
    };

    match send_mail(state.mail_provider.as_ref(), mail).await {
        Ok(()) => (
            StatusCode::OK,
            Json(SendEmailResponse {
                message: "Email sent successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Error sending email");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SendEmailErrorResponse {
                    error: "Error sending email".to_string(),
                }),
            )
                .into_response()
        }
    }
}
