//! 内存用户存储：读写锁保护的 `id -> record` 映射，负责 ID 与用户名唯一性。

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::{
    error::{AuthError, UniqueKey},
    users::model::UserRecord,
};

/// 进程内权威用户集合。读操作可并发；写操作独占。
#[derive(Debug, Default)]
pub(crate) struct UserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl UserStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 按 ID 查找。
    pub(crate) async fn find_by_id(&self, id: &str) -> Result<UserRecord, AuthError> {
        let guard = self.users.read().await;
        guard.get(id).cloned().ok_or(AuthError::NotFound)
    }

    /// 按用户名精确匹配查找（线性扫描）。
    pub(crate) async fn find_by_username(&self, username: &str) -> Result<UserRecord, AuthError> {
        let guard = self.users.read().await;
        guard
            .values()
            .find(|record| record.username == username)
            .cloned()
            .ok_or(AuthError::NotFound)
    }

    /// 插入新记录；ID 或用户名已存在时拒绝。
    pub(crate) async fn insert(&self, record: UserRecord) -> Result<(), AuthError> {
        let mut guard = self.users.write().await;
        if guard.contains_key(&record.id) {
            return Err(AuthError::AlreadyExists(UniqueKey::Id));
        }
        if guard
            .values()
            .any(|existing| existing.username == record.username)
        {
            return Err(AuthError::AlreadyExists(UniqueKey::Username));
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    /// 整体替换已有记录；新用户名不得与其他用户冲突。
    ///
    /// `created_at` 以存储内的值为准，`updated_at` 不会回退。
    pub(crate) async fn update(&self, mut record: UserRecord) -> Result<UserRecord, AuthError> {
        let mut guard = self.users.write().await;
        let Some(existing) = guard.get(&record.id) else {
            return Err(AuthError::NotFound);
        };
        if guard
            .values()
            .any(|other| other.id != record.id && other.username == record.username)
        {
            return Err(AuthError::AlreadyExists(UniqueKey::Username));
        }

        record.created_at = existing.created_at;
        record.updated_at = record.updated_at.max(existing.updated_at);
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    /// 删除记录。
    pub(crate) async fn delete(&self, id: &str) -> Result<(), AuthError> {
        let mut guard = self.users.write().await;
        guard.remove(id).map(|_| ()).ok_or(AuthError::NotFound)
    }

    /// 当前用户数。
    pub(crate) async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use super::UserStore;
    use crate::{
        error::{AuthError, UniqueKey},
        users::model::{PasswordHash, UserRecord},
    };

    fn record(id: &str, username: &str) -> UserRecord {
        UserRecord::new(
            id.to_string(),
            username.to_string(),
            PasswordHash::new("digest".to_string()),
            format!("{username}@x.com"),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn insert_then_find_by_both_keys() {
        let store = UserStore::new();
        store.insert(record("id1", "alice")).await.unwrap();

        assert_eq!(store.find_by_id("id1").await.unwrap().username, "alice");
        assert_eq!(store.find_by_username("alice").await.unwrap().id, "id1");
        assert_eq!(store.find_by_id("nope").await, Err(AuthError::NotFound));
        assert_eq!(
            store.find_by_username("Alice").await,
            Err(AuthError::NotFound)
        );
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_id_and_username() {
        let store = UserStore::new();
        store.insert(record("id1", "alice")).await.unwrap();

        assert_eq!(
            store.insert(record("id1", "bob")).await,
            Err(AuthError::AlreadyExists(UniqueKey::Id))
        );
        assert_eq!(
            store.insert(record("id2", "alice")).await,
            Err(AuthError::AlreadyExists(UniqueKey::Username))
        );
        // 用户名大小写敏感。
        store.insert(record("id3", "ALICE")).await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn update_checks_presence_and_collisions() {
        let store = UserStore::new();
        store.insert(record("id1", "alice")).await.unwrap();
        store.insert(record("id2", "bob")).await.unwrap();

        assert_eq!(
            store.update(record("id9", "carol")).await,
            Err(AuthError::NotFound)
        );
        assert_eq!(
            store.update(record("id2", "alice")).await,
            Err(AuthError::AlreadyExists(UniqueKey::Username))
        );

        // 保留自己的用户名不算冲突。
        let mut same = record("id1", "alice");
        same.email = "new@x.com".to_string();
        store.update(same).await.unwrap();
        assert_eq!(store.find_by_id("id1").await.unwrap().email, "new@x.com");

        store.update(record("id2", "bobby")).await.unwrap();
        assert_eq!(store.find_by_username("bobby").await.unwrap().id, "id2");
        assert_eq!(store.find_by_username("bob").await, Err(AuthError::NotFound));
    }

    #[tokio::test]
    async fn update_keeps_timestamps_monotonic() {
        let store = UserStore::new();
        let original = record("id1", "alice");
        let created_at = original.created_at;
        store.insert(original).await.unwrap();

        let mut stale = record("id1", "alice");
        stale.created_at = created_at + Duration::days(1);
        stale.updated_at = created_at - Duration::days(1);
        let stored = store.update(stale).await.unwrap();

        assert_eq!(stored.created_at, created_at);
        assert!(stored.updated_at >= stored.created_at);
        assert_eq!(store.find_by_id("id1").await.unwrap(), stored);
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let store = UserStore::new();
        store.insert(record("id1", "alice")).await.unwrap();

        store.delete("id1").await.unwrap();
        assert_eq!(store.delete("id1").await, Err(AuthError::NotFound));
        assert_eq!(store.find_by_id("id1").await, Err(AuthError::NotFound));
        // 删除后用户名可再次使用。
        store.insert(record("id2", "alice")).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_inserts_with_same_username_admit_exactly_one() {
        let store = Arc::new(UserStore::new());
        let mut handles = Vec::new();
        for idx in 0..64 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.insert(record(&format!("id{idx}"), "alice")).await
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => admitted += 1,
                Err(err) => assert_eq!(err, AuthError::AlreadyExists(UniqueKey::Username)),
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_renames_never_duplicate_usernames() {
        let store = Arc::new(UserStore::new());
        for idx in 0..16 {
            store
                .insert(record(&format!("id{idx}"), &format!("user{idx}")))
                .await
                .unwrap();
        }

        let mut handles = Vec::new();
        for idx in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.update(record(&format!("id{idx}"), "taken")).await
            }));
        }
        let admitted = futures_admitted(handles).await;
        assert_eq!(admitted, 1);
        assert_eq!(store.find_by_username("taken").await.map(|_| ()), Ok(()));
    }

    async fn futures_admitted(
        handles: Vec<tokio::task::JoinHandle<Result<UserRecord, AuthError>>>,
    ) -> usize {
        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                admitted += 1;
            }
        }
        admitted
    }
}
