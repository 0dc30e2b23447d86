use std::env;
use std::time::Duration;
use thiserror::Error;

/// 設定読み込みのエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
}

/// 環境変数から読み込むアプリケーション設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    /// 口座管理マイクロサービスのベースURL
    pub accounts_service_url: String,
    /// 口座サービス呼び出しのタイムアウト（削除ガードの行ロック保持時間の上限にもなる）
    pub accounts_service_timeout: Duration,
}

impl AppConfig {
    /// 環境変数から設定を読み込む
    ///
    /// `.env`があれば先に読み込む（開発用）。未設定の項目はデフォルト値を使う。
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let timeout_ms: u64 = parse_or(&lookup, "ACCOUNTS_SERVICE_TIMEOUT_MS", 3000)?;

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost/socios".to_string()),
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            accounts_service_url: lookup("ACCOUNTS_SERVICE_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            accounts_service_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.database_url, "postgres://localhost/socios");
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.port, 8080);
        assert_eq!(config.accounts_service_url, "http://localhost:3000");
        assert_eq!(config.accounts_service_timeout, Duration::from_millis(3000));
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/socios"),
            ("PORT", "8081"),
            ("ACCOUNTS_SERVICE_URL", "http://cuentas:3000"),
            ("ACCOUNTS_SERVICE_TIMEOUT_MS", "750"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "postgres://db/socios");
        assert_eq!(config.port, 8081);
        assert_eq!(config.accounts_service_url, "http://cuentas:3000");
        assert_eq!(config.accounts_service_timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_default_accounts_service_is_not_this_service() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        let own_port = format!(":{}", config.port);
        assert!(!config.accounts_service_url.ends_with(&own_port));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { name: "PORT", .. }));
    }
}
