//! 設定の読み込み
//!
//! 優先順位（後のものが勝つ）：
//! 1. 各セクションのデフォルト値
//! 2. `config/default.toml`
//! 3. `config/{RUN_MODE}.toml`
//! 4. 環境変数 `LEDGER_<SECTION>__<KEY>`
//! 5. `DATABASE_URL`, `SMTP_USERNAME`, `SMTP_PASSWORD`

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// メール中継サーバーの待ち受け設定
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MailRelayConfig {
    pub host: String,
    pub port: u16,
}

/// ドキュメントストアのバックエンド
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// プロセス内メモリ（永続化しない）
    Memory,
    Postgres,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub url: Option<String>,
    pub max_connections: u32,
}

/// SMTP送信の設定
///
/// 認証情報はファイルに書かず、`SMTP_USERNAME` / `SMTP_PASSWORD` で渡す。
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
    pub from_name: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` または `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub mail_relay: MailRelayConfig,
    pub store: StoreConfig,
    pub smtp: SmtpConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 設定ファイルと環境変数から読み込む
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix("LEDGER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("store.url", env::var("DATABASE_URL").ok())?
            .set_override_option("smtp.username", env::var("SMTP_USERNAME").ok())?
            .set_override_option("smtp.password", env::var("SMTP_PASSWORD").ok())?
            .build()?
            .try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for MailRelayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

impl MailRelayConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: None,
            max_connections: 5,
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            use_tls: true,
            username: None,
            password: None,
            from: None,
            from_name: None,
            timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_need_no_file() {
        let config = from_toml("");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.smtp.username, None);
        assert_eq!(config.smtp.password, None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_sections_are_overridable() {
        let config = from_toml(
            r#"
            [server]
            port = 8080

            [mail_relay]
            host = "127.0.0.1"

            [store]
            backend = "postgres"
            url = "postgres://localhost/library"

            [smtp]
            host = "smtp.gmail.com"
            from_name = "Library Management System"
            "#,
        );
        assert_eq!(config.server.address(), "0.0.0.0:8080");
        assert_eq!(config.mail_relay.address(), "127.0.0.1:3001");
        assert_eq!(config.store.backend, StoreBackend::Postgres);
        assert_eq!(config.store.max_connections, 5);
        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert_eq!(config.smtp.port, 587);
        assert!(config.smtp.use_tls);
    }

    #[test]
    fn test_mail_relay_default_port() {
        assert_eq!(from_toml("").mail_relay.port, 3001);
    }
}
