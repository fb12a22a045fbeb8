//! 鉴权编排：组合用户存储、口令哈希与令牌引擎，实现注册、登录与资料读写。

use std::sync::Arc;

use chrono::Utc;
use ids_shared_protocol::{
    LoginData, LoginRequest, RegisterRequest, TokenClaims, UpdateUserRequest, UserProfile,
};
use rand::{RngCore, rngs::OsRng};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::{
    auth::{
        password::{MAX_PASSWORD_BYTES, PasswordHasher},
        token::TokenEngine,
    },
    error::{AuthError, UniqueKey},
    users::{
        model::{PasswordHash, UserRecord},
        store::UserStore,
    },
};

/// 口令最小长度（按字符计）。
pub(crate) const MIN_PASSWORD_LEN: usize = 8;
/// 用户 ID 随机字节数（128 bit）。
const USER_ID_BYTES: usize = 16;
/// 未知用户名登录时用于对齐耗时的占位口令。
const DUMMY_PASSWORD: &str = "ids-dummy-password";

/// 鉴权服务。存储由外部构造后注入，不存在全局单例。
#[derive(Debug)]
pub(crate) struct AuthService {
    store: Arc<UserStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenEngine>,
    dummy_digest: OnceCell<PasswordHash>,
}

impl AuthService {
    pub(crate) fn new(
        store: Arc<UserStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenEngine>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            dummy_digest: OnceCell::new(),
        }
    }

    /// 注册新用户，返回公开视图。
    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<UserProfile, AuthError> {
        require_non_empty("username", &req.username)?;
        require_non_empty("password", &req.password)?;
        require_non_empty("email", &req.email)?;
        require_password_len(&req.password)?;

        // 预检仅用于尽早返回；并发下以存储的原子插入为准。
        if self.store.find_by_username(&req.username).await.is_ok() {
            return Err(AuthError::AlreadyExists(UniqueKey::Username));
        }

        let id = generate_user_id()?;
        let password_hash = self.hasher.hash_blocking(req.password).await?;
        let record = UserRecord::new(id, req.username, password_hash, req.email, Utc::now());
        let profile = UserProfile::from(&record);

        match self.store.insert(record).await {
            Ok(()) => {}
            Err(AuthError::AlreadyExists(UniqueKey::Id)) => {
                return Err(AuthError::internal("generated user id collided"));
            }
            Err(err) => return Err(err),
        }

        info!(
            "user registered: id={} users={}",
            profile.id,
            self.store.len().await
        );
        Ok(profile)
    }

    /// 校验口令并签发令牌。未知用户名与口令错误返回同一错误。
    pub(crate) async fn login(&self, req: LoginRequest) -> Result<LoginData, AuthError> {
        let record = match self.store.find_by_username(&req.username).await {
            Ok(record) => record,
            Err(AuthError::NotFound) => {
                // 与口令错误分支付出相同的 bcrypt 代价。
                let digest = self.decoy_digest().await?;
                self.hasher.verify_blocking(req.password, digest).await?;
                debug!("login rejected: unknown username");
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => return Err(err),
        };

        let matched = self
            .hasher
            .verify_blocking(req.password, record.password_hash.clone())
            .await?;
        if !matched {
            debug!("login rejected: password mismatch for id={}", record.id);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&record.id, &record.username)?;
        info!("user logged in: id={}", record.id);
        Ok(LoginData {
            token,
            token_type: "Bearer".to_string(),
            expires_in_sec: self.tokens.ttl_sec(),
        })
    }

    /// 按 ID 读取公开视图。
    pub(crate) async fn get_user(&self, id: &str) -> Result<UserProfile, AuthError> {
        let record = self.store.find_by_id(id).await?;
        Ok(UserProfile::from(&record))
    }

    /// 更新资料：仅替换请求中提供的字段。
    pub(crate) async fn update_user(
        &self,
        id: &str,
        req: UpdateUserRequest,
    ) -> Result<UserProfile, AuthError> {
        if req.is_empty() {
            return Err(AuthError::InvalidInput("no fields to update".to_string()));
        }
        if let Some(username) = req.username.as_deref() {
            require_non_empty("username", username)?;
        }
        if let Some(email) = req.email.as_deref() {
            require_non_empty("email", email)?;
        }
        if let Some(password) = req.password.as_deref() {
            require_non_empty("password", password)?;
            require_password_len(password)?;
        }

        let mut record = self.store.find_by_id(id).await?;
        if let Some(username) = req.username {
            record.username = username;
        }
        if let Some(email) = req.email {
            record.email = email;
        }
        if let Some(password) = req.password {
            record.password_hash = self.hasher.hash_blocking(password).await?;
        }
        record.updated_at = Utc::now();

        let stored = self.store.update(record).await?;
        info!("user updated: id={}", stored.id);
        Ok(UserProfile::from(&stored))
    }

    /// 删除用户。已签发的令牌仍可通过校验，但后续读取返回不存在。
    pub(crate) async fn delete_user(&self, id: &str) -> Result<(), AuthError> {
        self.store.delete(id).await?;
        info!("user deleted: id={id}");
        Ok(())
    }

    /// 校验请求携带的令牌。
    pub(crate) fn authenticate(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.tokens.verify(token)
    }

    /// 按当前 cost 惰性生成的占位摘要。
    async fn decoy_digest(&self) -> Result<PasswordHash, AuthError> {
        self.dummy_digest
            .get_or_try_init(|| self.hasher.hash_blocking(DUMMY_PASSWORD.to_string()))
            .await
            .cloned()
    }

    #[cfg(test)]
    /// 测试辅助：当前注册用户数。
    pub(crate) async fn user_count(&self) -> usize {
        self.store.len().await
    }
}

/// 必填字段校验；纯空白视为空。
fn require_non_empty(field: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

/// 下限按字符计；上限按字节计（bcrypt 限制）。
fn require_password_len(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::InvalidInput(format!(
            "password must be at most {MAX_PASSWORD_BYTES} bytes long"
        )));
    }
    Ok(())
}

/// 生成 128 bit 随机 ID（hex）。
fn generate_user_id() -> Result<String, AuthError> {
    let mut raw = [0u8; USER_ID_BYTES];
    OsRng
        .try_fill_bytes(&mut raw)
        .map_err(|err| AuthError::internal(format!("read randomness failed: {err}")))?;
    Ok(hex::encode(raw))
}
