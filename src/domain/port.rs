// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::event::DomainEvent;
use crate::domain::model::{
    Booking, BookingId, BusRoute, Message, RouteId, User, UserId,
};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::collections::HashMap;
use uuid::Uuid;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// ロガートレイト
/// ログ出力を抽象化するポート
pub trait Logger: Send + Sync {
    /// デバッグレベルのログを出力
    fn debug(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 情報レベルのログを出力
    fn info(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 警告レベルのログを出力
    fn warn(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// エラーレベルのログを出力
    fn error(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );
}

/// リポジトリエラー型
/// リポジトリ操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq)]
pub enum RepositoryError {
    /// データベース接続に失敗
    ConnectionFailed(String),
    /// 操作に失敗
    OperationFailed(String),
    /// データの取得に失敗
    FetchFailed(String),
    /// 一意性制約違反（(route_id, seat_number) のバックストップ制約など）
    ConstraintViolation(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            RepositoryError::OperationFailed(msg) => write!(f, "Operation failed: {}", msg),
            RepositoryError::FetchFailed(msg) => write!(f, "Fetch failed: {}", msg),
            RepositoryError::ConstraintViolation(msg) => {
                write!(f, "Constraint violation: {}", msg)
            }
        }
    }
}

impl std::error::Error for RepositoryError {}

/// 路線リポジトリトレイト
/// BusRoute集約の永続化を抽象化する
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// 路線を保存する（存在すれば上書き）
    async fn save(&self, route: &BusRoute) -> Result<(), RepositoryError>;

    /// 路線IDで路線を検索する
    ///
    /// # Returns
    /// * `Ok(Some(BusRoute))` - 路線が見つかった
    /// * `Ok(None)` - 路線が見つからなかった
    /// * `Err(RepositoryError)` - 検索失敗
    async fn find_by_id(&self, route_id: RouteId) -> Result<Option<BusRoute>, RepositoryError>;

    /// すべての路線を取得する
    /// 路線名の昇順で並べて返す
    async fn find_all(&self) -> Result<Vec<BusRoute>, RepositoryError>;

    /// 路線を削除する
    /// 存在しない路線の削除は黙って成功する
    async fn delete(&self, route_id: RouteId) -> Result<(), RepositoryError>;
}

/// 予約リポジトリトレイト
/// Booking の永続化を抽象化する
/// 予約は作成後に変更されないため、保存は追記のみ
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// 予約を追加する
    /// (route_id, seat_number) の一意性制約に違反した場合は
    /// `RepositoryError::ConstraintViolation` を返す
    async fn insert(&self, booking: &Booking) -> Result<(), RepositoryError>;

    /// 予約IDで予約を検索する
    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>, RepositoryError>;

    /// 指定された路線の全予約を取得する
    /// 座席番号の昇順で並べて返す
    async fn find_by_route(&self, route_id: RouteId) -> Result<Vec<Booking>, RepositoryError>;

    /// 指定された利用者の全予約を取得する
    /// 予約日時の降順で並べて返す
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Booking>, RepositoryError>;

    /// すべての予約を取得する
    /// 予約日時の降順で並べて返す
    async fn find_all(&self) -> Result<Vec<Booking>, RepositoryError>;

    /// 指定された路線の予約済み座席番号の集合を取得する
    /// 呼び出し時点の一貫したスナップショット
    async fn booked_seats(&self, route_id: RouteId) -> Result<BTreeSet<u32>, RepositoryError>;

    /// 指定された路線の予約済み座席番号の最大値を取得する
    /// 予約がなければ None
    async fn highest_booked_seat(
        &self,
        route_id: RouteId,
    ) -> Result<Option<u32>, RepositoryError>;

    /// 予約を削除する
    async fn delete(&self, booking_id: BookingId) -> Result<(), RepositoryError>;

    /// 指定された路線の全予約を削除する（路線削除のカスケード）
    /// 削除した件数を返す
    async fn delete_by_route(&self, route_id: RouteId) -> Result<u64, RepositoryError>;
}

/// 利用者リポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 利用者を追加する
    async fn insert(&self, user: &User) -> Result<(), RepositoryError>;

    /// 利用者IDで利用者を検索する
    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, RepositoryError>;

    /// ユーザー名で利用者を検索する
    /// ユーザー名は一意
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
}

/// メッセージリポジトリトレイト
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを追加する
    async fn insert(&self, message: &Message) -> Result<(), RepositoryError>;

    /// すべてのメッセージを取得する
    /// 送信日時の昇順で並べて返す
    async fn find_all(&self) -> Result<Vec<Message>, RepositoryError>;
}

/// イベント発行エラー
#[derive(Debug, thiserror::Error)]
pub enum PublisherError {
    #[error("Event publishing failed: {0}")]
    PublishingFailed(String),
}

/// イベント発行者トレイト
/// ドメインイベントの発行を抽象化するポート
pub trait EventPublisher: Send + Sync {
    /// イベントを発行する
    fn publish(&self, event: &DomainEvent) -> Result<(), PublisherError>;
}
