//! 用户记录（内部）与公开视图映射。

use chrono::{DateTime, Utc};
use ids_shared_protocol::UserProfile;

/// bcrypt 口令摘要；不可序列化，Debug 输出脱敏。
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct PasswordHash(String);

impl PasswordHash {
    pub(crate) fn new(digest: String) -> Self {
        Self(digest)
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// 存储中的权威用户记录。调用方只拿到快照，修改必须经由存储操作整体替换。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UserRecord {
    /// 生成后不可变的唯一 ID。
    pub(crate) id: String,
    /// 全局唯一用户名（大小写敏感）。
    pub(crate) username: String,
    pub(crate) password_hash: PasswordHash,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
    /// 始终不早于 `created_at`。
    pub(crate) updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// 新建记录：创建与更新时间相同。
    pub(crate) fn new(
        id: String,
        username: String,
        password_hash: PasswordHash,
        email: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            password_hash,
            email,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&UserRecord> for UserProfile {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id.clone(),
            username: record.username.clone(),
            email: record.email.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
