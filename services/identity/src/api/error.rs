//! API 错误定义与响应转换。

use axum::{extract::rejection::JsonRejection, http::StatusCode};
use tracing::{debug, error};

use super::response::{ApiReply, failure};
use crate::error::{AuthError, UniqueKey};

/// 对外暴露的接口错误；消息不泄露内部细节。
#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    pub(crate) code: &'static str,
    pub(crate) message: String,
    pub(crate) suggestion: &'static str,
}

impl ApiError {
    /// 构造统一 API 错误。
    pub(crate) fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        suggestion: &'static str,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            suggestion,
        }
    }

    /// 转换为任意数据类型的失败响应体。
    pub(crate) fn into_reply<T>(self) -> ApiReply<T> {
        failure(self.status, self.code, self.message, self.suggestion)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidInput(detail) => Self::new(
                StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                detail,
                "请检查请求参数后重试",
            ),
            AuthError::AlreadyExists(UniqueKey::Username) => Self::new(
                StatusCode::CONFLICT,
                "USERNAME_TAKEN",
                "用户名已被占用",
                "请更换用户名",
            ),
            AuthError::AlreadyExists(UniqueKey::Id) => Self::new(
                StatusCode::CONFLICT,
                "ALREADY_EXISTS",
                "记录已存在",
                "请稍后重试",
            ),
            AuthError::NotFound => Self::new(
                StatusCode::NOT_FOUND,
                "USER_NOT_FOUND",
                "用户不存在",
                "请确认账号后重试",
            ),
            AuthError::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "用户名或密码错误",
                "请检查后重新登录",
            ),
            AuthError::MalformedToken | AuthError::InvalidSignature | AuthError::TokenExpired => {
                Self::new(
                    StatusCode::UNAUTHORIZED,
                    "TOKEN_INVALID",
                    "登录凭证无效或已过期",
                    "请重新登录",
                )
            }
            AuthError::Internal(detail) => {
                error!("internal error: {detail}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "服务内部错误",
                    "请稍后重试",
                )
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("reject request body: {rejection}");
        Self::new(
            StatusCode::BAD_REQUEST,
            "INVALID_INPUT",
            "请求格式无效",
            "请检查请求体 JSON 后重试",
        )
    }
}
