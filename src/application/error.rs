use crate::domain::error::DomainError;
use crate::domain::port::RepositoryError;
use crate::domain::store::StoreError;

/// アプリケーション層のエラー型
/// ドメインエラー、リポジトリエラー、認証・認可エラーをラップする
#[derive(Debug)]
pub enum ApplicationError {
    /// ドメインエラー（ビジネスルール違反）
    DomainError(DomainError),
    /// リポジトリエラー（永続化の失敗）
    RepositoryError(RepositoryError),
    /// イベント発行エラー
    EventPublishingFailed(String),
    /// エンティティが見つからない
    NotFound(String),
    /// 認証失敗（パスワード不一致など）
    AuthenticationFailed(String),
    /// 権限不足（他人の予約のキャンセルなど）
    PermissionDenied(String),
}

impl std::fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationError::DomainError(err) => write!(f, "Domain error: {}", err),
            ApplicationError::RepositoryError(err) => write!(f, "Repository error: {}", err),
            ApplicationError::EventPublishingFailed(msg) => {
                write!(f, "Event publishing failed: {}", msg)
            }
            ApplicationError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApplicationError::AuthenticationFailed(msg) => {
                write!(f, "Authentication failed: {}", msg)
            }
            ApplicationError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
        }
    }
}

impl std::error::Error for ApplicationError {}

// From実装でエラー変換を簡潔に
impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        ApplicationError::DomainError(err)
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        ApplicationError::RepositoryError(err)
    }
}

impl From<StoreError> for ApplicationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RouteNotFound(route_id) => {
                ApplicationError::NotFound(format!("路線が見つかりません: {}", route_id))
            }
            StoreError::BookingNotFound(booking_id) => {
                ApplicationError::NotFound(format!("予約が見つかりません: {}", booking_id))
            }
            StoreError::Domain(err) => ApplicationError::DomainError(err),
            StoreError::Repository(err) => ApplicationError::RepositoryError(err),
        }
    }
}
