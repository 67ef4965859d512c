use crate::ports::mail_provider::{MailProvider as MailProviderTrait, OutgoingMail, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Mock implementation of MailProvider
///
/// Records every accepted message instead of delivering it.
/// Can be switched into a failing mode to simulate an unreachable provider.
#[derive(Default)]
pub struct MailProvider {
    sent: Mutex<Vec<OutgoingMail>>,
    failing: AtomicBool,
}

impl MailProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider that rejects every message
    pub fn failing() -> Self {
        let provider = Self::new();
        provider.set_failing(true);
        provider
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages accepted so far
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MailProviderTrait for MailProvider {
    async fn send(&self, mail: OutgoingMail) -> Result<String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err("mock mail provider unreachable".into());
        }
        self.sent
            .lock()
            .map_err(|_| "mock mail provider lock poisoned")?
            .push(mail);
        Ok("250 OK: queued".to_string())
    }
}
