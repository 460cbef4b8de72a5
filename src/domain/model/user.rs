use crate::domain::error::DomainError;
use crate::domain::model::{Role, UserId};

/// User エンティティ
/// 予約コアにとっては外部キーに過ぎず、認証そのものは境界層の責務
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    username: String,
    password: String,
    role: Role,
}

impl User {
    /// 新しい利用者を作成
    pub fn new(id: UserId, username: String, password: String, role: Role) -> Result<Self, DomainError> {
        if username.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "ユーザー名は空にできません".to_string(),
            ));
        }
        Ok(Self {
            id,
            username,
            password,
            role,
        })
    }

    /// データベースから取得したデータで利用者を再構築
    pub fn reconstruct(id: UserId, username: String, password: String, role: Role) -> Self {
        Self {
            id,
            username,
            password,
            role,
        }
    }

    /// 利用者IDを取得
    pub fn id(&self) -> UserId {
        self.id
    }

    /// ユーザー名を取得
    pub fn username(&self) -> &str {
        &self.username
    }

    /// パスワードを取得
    pub fn password(&self) -> &str {
        &self.password
    }

    /// 役割を取得
    pub fn role(&self) -> Role {
        self.role
    }

    /// 運行管理者かどうか
    pub fn is_operator(&self) -> bool {
        self.role == Role::Operator
    }
}
