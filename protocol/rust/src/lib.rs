// 文件职责：
// 1) 定义身份服务对外可见的协议数据结构（token header/claims、用户公开视图、HTTP 请求体）。
// 2) 提供秒级 unix 时间等跨端一致的基础函数。
// 3) 作为 Rust 侧协议唯一代码源，供服务端与客户端复用。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// token header 中固定的签名算法标识。
pub const TOKEN_ALG: &str = "HS256";
/// token header 中固定的类型标识。
pub const TOKEN_TYP: &str = "JWT";

/// 当前 unix 秒。
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// token 第一段：`{"alg":"HS256","typ":"JWT"}`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    // 签名算法。
    pub alg: String,
    // 类型标签。
    pub typ: String,
}

impl Default for TokenHeader {
    /// 返回服务签发时使用的固定 header。
    fn default() -> Self {
        Self {
            alg: TOKEN_ALG.to_string(),
            typ: TOKEN_TYP.to_string(),
        }
    }
}

/// token 第二段：身份与时间声明。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    // 用户唯一 ID。
    pub user_id: String,
    // 签发时的用户名。
    pub username: String,
    // 过期时间（unix 秒）。
    pub exp: u64,
    // 签发时间（unix 秒）。
    pub iat: u64,
}

/// 用户公开视图：不包含任何口令相关字段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 注册请求。缺失字段按空串处理，由服务端统一校验。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
}

/// 登录请求。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// 登录成功返回数据。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub token_type: String,
    pub expires_in_sec: u64,
}

/// 资料更新请求：仅更新提供的字段。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    /// 是否没有任何待更新字段。
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// 删除用户返回数据。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserData {
    pub id: String,
}
