use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{Message, MessageId, UserId};
use crate::domain::port::{MessageRepository, RepositoryError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQLメッセージリポジトリ
#[derive(Clone)]
pub struct MySqlMessageRepository {
    pool: Pool<MySql>,
}

impl MySqlMessageRepository {
    /// 新しいMySQLメッセージリポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行からメッセージを再構築する
    fn message_from_row(row: &sqlx::mysql::MySqlRow) -> Result<Message, RepositoryError> {
        let message_id = MessageId::from_string(row.get("id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("メッセージIDの解析に失敗しました: {}", e))
        })?;
        let sender_id = UserId::from_string(row.get("sender_id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("送信者IDの解析に失敗しました: {}", e))
        })?;

        Ok(Message::reconstruct(
            message_id,
            sender_id,
            row.get("content"),
            row.get::<DateTime<Utc>, _>("sent_at"),
        ))
    }
}

#[async_trait]
impl MessageRepository for MySqlMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, sender_id, content, sent_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(message.id().to_string())
        .bind(message.sender_id().to_string())
        .bind(message.content())
        .bind(message.sent_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("メッセージの保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Message>, RepositoryError> {
        // 送信日時の昇順で並べる
        let rows =
            sqlx::query("SELECT id, sender_id, content, sent_at FROM messages ORDER BY sent_at ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    DatabaseError::QueryError(format!("メッセージ一覧の取得に失敗しました: {}", e))
                })
                .map_err(RepositoryError::from)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(Self::message_from_row(&row)?);
        }

        Ok(messages)
    }
}
