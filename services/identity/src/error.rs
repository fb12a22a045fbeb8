//! 身份服务内部错误分类。

use thiserror::Error;

/// 唯一性约束的冲突键。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UniqueKey {
    Id,
    Username,
}

impl std::fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id => f.write_str("id"),
            Self::Username => f.write_str("username"),
        }
    }
}

/// 注册、登录、令牌校验与存储操作的统一错误。
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum AuthError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} already exists")]
    AlreadyExists(UniqueKey),

    #[error("user not found")]
    NotFound,

    /// 未知用户名与口令错误共用同一信号。
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("malformed token")]
    MalformedToken,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token has expired")]
    TokenExpired,

    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// 令牌校验类错误，在边界处统一折叠为未授权。
    pub(crate) fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::MalformedToken | Self::InvalidSignature | Self::TokenExpired
        )
    }

    pub(crate) fn internal(detail: impl std::fmt::Display) -> Self {
        Self::Internal(detail.to_string())
    }
}
