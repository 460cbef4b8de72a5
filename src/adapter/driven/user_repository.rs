use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{Role, User, UserId};
use crate::domain::port::{RepositoryError, UserRepository};
use async_trait::async_trait;

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQL利用者リポジトリ
#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: Pool<MySql>,
}

impl MySqlUserRepository {
    /// 新しいMySQL利用者リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行から利用者を再構築する
    fn user_from_row(row: &sqlx::mysql::MySqlRow) -> Result<User, RepositoryError> {
        let user_id = UserId::from_string(row.get("id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("利用者IDの解析に失敗しました: {}", e))
        })?;
        let role = Role::from_string(row.get("role")).map_err(|e| {
            RepositoryError::FetchFailed(format!("役割の解析に失敗しました: {}", e))
        })?;

        Ok(User::reconstruct(
            user_id,
            row.get("username"),
            row.get("password"),
            role,
        ))
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password, role)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user.id().to_string())
        .bind(user.username())
        .bind(user.password())
        .bind(user.role().to_string())
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT id, username, password, role FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("利用者の取得に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(Self::user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT id, username, password, role FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("利用者の検索に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(Self::user_from_row(&row)?)),
            None => Ok(None),
        }
    }
}
