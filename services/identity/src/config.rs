//! 配置模块职责：
//! 1. 启动时一次性读取监听地址、签名密钥、令牌 TTL 与 bcrypt cost。
//! 2. 非法值直接报错退出，不做静默回退。

use anyhow::{Context, anyhow};
use tracing::warn;

use crate::auth::password::{MAX_COST, MIN_COST};

/// 默认监听地址。
pub(crate) const DEFAULT_ADDR: &str = "0.0.0.0:8080";
/// 开发态默认签名密钥；生产环境必须通过 `IDS_JWT_SECRET` 覆盖。
pub(crate) const DEFAULT_JWT_SECRET: &str = "ids-dev-secret-key";
/// 默认令牌有效期：24 小时。
pub(crate) const DEFAULT_TOKEN_TTL_SEC: u64 = 24 * 60 * 60;

const ADDR_ENV: &str = "IDS_ADDR";
const JWT_SECRET_ENV: &str = "IDS_JWT_SECRET";
const TOKEN_TTL_ENV: &str = "IDS_TOKEN_TTL_SEC";
const BCRYPT_COST_ENV: &str = "IDS_BCRYPT_COST";

/// 服务运行时配置。
#[derive(Clone)]
pub(crate) struct Config {
    /// HTTP 监听地址。
    pub(crate) addr: String,
    /// 进程级共享签名密钥。
    pub(crate) jwt_secret: String,
    /// 令牌有效期（秒）。
    pub(crate) token_ttl_sec: u64,
    /// bcrypt cost。
    pub(crate) bcrypt_cost: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_sec", &self.token_ttl_sec)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl Config {
    /// 从进程环境变量构建配置。
    pub(crate) fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源构建配置；空白值视为未设置。
    ///
    /// 签名密钥按原样保留，不做 trim，与其他副本使用同一组字节。
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let read_raw = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let read = |key: &str| read_raw(key).map(|value| value.trim().to_string());

        let addr = read(ADDR_ENV).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let jwt_secret =
            read_raw(JWT_SECRET_ENV).unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());

        let token_ttl_sec = match read(TOKEN_TTL_ENV) {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("{TOKEN_TTL_ENV} must be an integer, got {raw:?}"))?,
            None => DEFAULT_TOKEN_TTL_SEC,
        };
        if token_ttl_sec == 0 {
            return Err(anyhow!("{TOKEN_TTL_ENV} must be greater than 0"));
        }

        let bcrypt_cost = match read(BCRYPT_COST_ENV) {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("{BCRYPT_COST_ENV} must be an integer, got {raw:?}"))?,
            None => bcrypt::DEFAULT_COST,
        };
        if !(MIN_COST..=MAX_COST).contains(&bcrypt_cost) {
            return Err(anyhow!(
                "{BCRYPT_COST_ENV} must be within {MIN_COST}..={MAX_COST}, got {bcrypt_cost}"
            ));
        }

        Ok(Self {
            addr,
            jwt_secret,
            token_ttl_sec,
            bcrypt_cost,
        })
    }

    /// 是否仍在使用开发态默认密钥。
    pub(crate) fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    /// 启动时提示不安全配置。
    pub(crate) fn warn_insecure(&self) {
        if self.uses_default_secret() {
            warn!("{JWT_SECRET_ENV} not set, using development secret; do not run this in production");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{Config, DEFAULT_ADDR, DEFAULT_TOKEN_TTL_SEC};

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let env = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<String, String>>();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.token_ttl_sec, DEFAULT_TOKEN_TTL_SEC);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(config.uses_default_secret());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            ("IDS_ADDR", "127.0.0.1:9000"),
            ("IDS_JWT_SECRET", "prod-secret"),
            ("IDS_TOKEN_TTL_SEC", "3600"),
            ("IDS_BCRYPT_COST", "10"),
        ])
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert_eq!(config.jwt_secret, "prod-secret");
        assert_eq!(config.token_ttl_sec, 3600);
        assert_eq!(config.bcrypt_cost, 10);
        assert!(!config.uses_default_secret());
    }

    #[test]
    fn secret_keeps_surrounding_whitespace() {
        let config = config_from(&[
            ("IDS_JWT_SECRET", "  prod-secret\n"),
            ("IDS_ADDR", " 127.0.0.1:9000 "),
        ])
        .unwrap();
        assert_eq!(config.jwt_secret, "  prod-secret\n");
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert!(!config.uses_default_secret());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[("IDS_JWT_SECRET", "   "), ("IDS_ADDR", "")]).unwrap();
        assert!(config.uses_default_secret());
        assert_eq!(config.addr, DEFAULT_ADDR);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config_from(&[("IDS_TOKEN_TTL_SEC", "0")]).is_err());
        assert!(config_from(&[("IDS_TOKEN_TTL_SEC", "soon")]).is_err());
        assert!(config_from(&[("IDS_BCRYPT_COST", "3")]).is_err());
        assert!(config_from(&[("IDS_BCRYPT_COST", "32")]).is_err());
    }

    #[test]
    fn debug_output_hides_secret() {
        let config = config_from(&[("IDS_JWT_SECRET", "prod-secret")]).unwrap();
        assert!(!format!("{config:?}").contains("prod-secret"));
    }
}
