use crate::domain::error::DomainError;
use crate::domain::model::{MessageId, UserId};
use chrono::{DateTime, Utc};

/// Message エンティティ
/// 利用者から運行管理者への問い合わせフィード（ポーリング型チャット）
/// リクエスト間の不変条件を持たない単純なCRUDデータ
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    id: MessageId,
    sender_id: UserId,
    content: String,
    sent_at: DateTime<Utc>,
}

impl Message {
    /// 新しいメッセージを作成
    pub fn new(id: MessageId, sender_id: UserId, content: String) -> Result<Self, DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "メッセージ本文は空にできません".to_string(),
            ));
        }
        Ok(Self {
            id,
            sender_id,
            content,
            sent_at: Utc::now(),
        })
    }

    /// データベースから取得したデータでメッセージを再構築
    pub fn reconstruct(
        id: MessageId,
        sender_id: UserId,
        content: String,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sender_id,
            content,
            sent_at,
        }
    }

    /// メッセージIDを取得
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// 送信者IDを取得
    pub fn sender_id(&self) -> UserId {
        self.sender_id
    }

    /// 本文を取得
    pub fn content(&self) -> &str {
        &self.content
    }

    /// 送信日時を取得
    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }
}
