use crate::domain::model::UserId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// インメモリセッションストア
/// Bearerトークンとログイン中の利用者を対応付ける。
/// プロセス再起動でセッションは消える（再ログインで回復する）
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, UserId>>>,
}

impl SessionStore {
    /// 新しいセッションストアを作成
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// セッションを作成しトークンを返す
    pub fn create(&self, user_id: UserId) -> Uuid {
        let token = Uuid::new_v4();
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(token, user_id);
        token
    }

    /// トークンから利用者IDを解決する
    pub fn resolve(&self, token: Uuid) -> Option<UserId> {
        let sessions = self.sessions.lock().unwrap();
        sessions.get(&token).copied()
    }

    /// セッションを破棄する
    /// 存在しないトークンの破棄は黙って成功する
    pub fn destroy(&self, token: Uuid) {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.remove(&token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_resolve() {
        let store = SessionStore::new();
        let user_id = UserId::new();
        let token = store.create(user_id);
        assert_eq!(store.resolve(token), Some(user_id));
    }

    #[test]
    fn test_unknown_token_resolves_to_none() {
        let store = SessionStore::new();
        assert_eq!(store.resolve(Uuid::new_v4()), None);
    }

    #[test]
    fn test_destroy_invalidates_token() {
        let store = SessionStore::new();
        let token = store.create(UserId::new());
        store.destroy(token);
        assert_eq!(store.resolve(token), None);

        // 二重破棄もエラーにならない
        store.destroy(token);
    }
}
