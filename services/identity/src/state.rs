//! 服务共享状态：鉴权服务句柄。

use std::sync::Arc;

use crate::{
    auth::{password::PasswordHasher, service::AuthService, token::TokenEngine},
    config::Config,
    users::store::UserStore,
};

/// 路由共享状态。
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth: Arc<AuthService>,
}

impl AppState {
    /// 按配置装配存储、哈希器与令牌引擎。
    pub(crate) fn from_config(config: &Config) -> Self {
        let store = Arc::new(UserStore::new());
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        let tokens = Arc::new(TokenEngine::new(&config.jwt_secret, config.token_ttl_sec));
        Self::new(AuthService::new(store, hasher, tokens))
    }

    pub(crate) fn new(auth: AuthService) -> Self {
        Self {
            auth: Arc::new(auth),
        }
    }
}
