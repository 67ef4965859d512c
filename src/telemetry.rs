use crate::config::LoggingConfig;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// tracingのサブスクライバーを初期化する
///
/// `RUST_LOG` が設定されていればそれを優先し、なければ設定のレベルを使う。
pub fn init(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "rusty_library_ledger={},mail_relay={},tower_http=debug",
            logging.level, logging.level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
