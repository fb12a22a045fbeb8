//! 口令哈希与校验（bcrypt）。

use crate::{error::AuthError, users::model::PasswordHash};

/// 允许配置的最小 bcrypt cost。
pub(crate) const MIN_COST: u32 = 4;
/// 允许配置的最大 bcrypt cost。
pub(crate) const MAX_COST: u32 = 31;
/// bcrypt 只读取前 72 字节。
pub(crate) const MAX_PASSWORD_BYTES: usize = 72;

/// 无状态口令哈希器；每次哈希使用随机盐。
#[derive(Debug, Clone, Copy)]
pub(crate) struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub(crate) fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// 生成口令摘要。超过 72 字节的口令返回 `InvalidInput`。
    pub(crate) fn hash(&self, plaintext: &str) -> Result<PasswordHash, AuthError> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::InvalidInput(format!(
                "password must be at most {MAX_PASSWORD_BYTES} bytes long"
            )));
        }
        bcrypt::hash(plaintext, self.cost)
            .map(PasswordHash::new)
            .map_err(|err| AuthError::internal(format!("hash password failed: {err}")))
    }

    /// 校验口令是否与摘要匹配。超长口令照常计算后判为不匹配。
    pub(crate) fn verify(&self, plaintext: &str, digest: &PasswordHash) -> Result<bool, AuthError> {
        let matched = bcrypt::verify(plaintext, digest.as_str())
            .map_err(|err| AuthError::internal(format!("verify password failed: {err}")))?;
        Ok(matched && plaintext.len() <= MAX_PASSWORD_BYTES)
    }

    /// 在阻塞线程池上哈希，避免占用异步 worker。
    pub(crate) async fn hash_blocking(&self, plaintext: String) -> Result<PasswordHash, AuthError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|err| AuthError::internal(format!("hash task failed: {err}")))?
    }

    /// 在阻塞线程池上校验。
    pub(crate) async fn verify_blocking(
        &self,
        plaintext: String,
        digest: PasswordHash,
    ) -> Result<bool, AuthError> {
        let hasher = *self;
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &digest))
            .await
            .map_err(|err| AuthError::internal(format!("verify task failed: {err}")))?
    }
}
