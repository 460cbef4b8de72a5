use crate::application::ApplicationError;
use crate::domain::event::{
    BookingCancelled, CapacityAdjusted, DomainEvent, RouteRemoved, SeatReserved,
};
use crate::domain::model::{
    Booking, BookingId, BusRoute, Message, MessageId, Money, Role, RouteId, RouteUpdate,
    SeatAvailability, User, UserId,
};
use crate::domain::port::{EventPublisher, Logger, MessageRepository, UserRepository};
use crate::domain::store::ReservationStore;
use std::collections::HashMap;
use std::sync::Arc;

/// 予約アプリケーションサービス
/// ユースケースの調整役。座席の排他制御そのものは予約ストアの責務
pub struct ReservationApplicationService {
    store: Arc<ReservationStore>,
    event_publisher: Arc<dyn EventPublisher>,
    logger: Arc<dyn Logger>,
}

impl ReservationApplicationService {
    /// 新しい予約アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `store` - 予約ストア
    /// * `event_publisher` - イベント発行者
    /// * `logger` - ロガー
    pub fn new(
        store: Arc<ReservationStore>,
        event_publisher: Arc<dyn EventPublisher>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            store,
            event_publisher,
            logger,
        }
    }

    /// 指定された路線の空席状況を取得
    ///
    /// # Returns
    /// * `Ok(SeatAvailability)` - 予約済み座席と空席の集合
    /// * `Err(ApplicationError::NotFound)` - 路線が存在しない
    pub async fn list_availability(
        &self,
        route_id: RouteId,
    ) -> Result<SeatAvailability, ApplicationError> {
        let route = self.store.get_route(route_id).await?;
        let taken = self.store.booked_seats(route_id).await?;
        Ok(SeatAvailability::derive(&route, &taken))
    }

    /// 座席を予約する
    ///
    /// # Arguments
    /// * `route_id` - 路線ID
    /// * `seat_number` - 座席番号（1始まり）
    /// * `user_id` - 予約する利用者のID
    ///
    /// # Returns
    /// * `Ok(Booking)` - 予約成功
    /// * `Err(ApplicationError::DomainError(SeatTaken))` - 座席が既に予約済み
    pub async fn reserve_seat(
        &self,
        route_id: RouteId,
        seat_number: u32,
        user_id: UserId,
    ) -> Result<Booking, ApplicationError> {
        let booking = self.store.try_reserve(route_id, seat_number, user_id).await?;

        let mut context = HashMap::new();
        context.insert("route_id".to_string(), route_id.to_string());
        context.insert("seat_number".to_string(), seat_number.to_string());
        self.logger.info(
            "ReservationApplicationService",
            "座席を予約しました",
            Some(booking.id().as_uuid()),
            Some(context),
        );

        let event = SeatReserved::new(booking.id(), route_id, seat_number, user_id);
        self.event_publisher
            .publish(&DomainEvent::SeatReserved(event))
            .map_err(|e| ApplicationError::EventPublishingFailed(e.to_string()))?;

        Ok(booking)
    }

    /// 予約をキャンセルする
    /// 利用者は自分の予約のみ、運行管理者は任意の予約をキャンセルできる
    ///
    /// # Arguments
    /// * `booking_id` - 予約ID
    /// * `acting_user` - 操作を行う利用者
    ///
    /// # Returns
    /// * `Ok(Booking)` - キャンセルされた予約
    /// * `Err(ApplicationError::PermissionDenied)` - 他人の予約
    /// * `Err(ApplicationError::NotFound)` - 予約が存在しない
    pub async fn cancel_seat(
        &self,
        booking_id: BookingId,
        acting_user: &User,
    ) -> Result<Booking, ApplicationError> {
        let booking = self.store.get_booking(booking_id).await?;
        if !acting_user.is_operator() && booking.user_id() != acting_user.id() {
            return Err(ApplicationError::PermissionDenied(
                "他の利用者の予約はキャンセルできません".to_string(),
            ));
        }

        let cancelled = self.store.cancel(booking_id).await?;

        self.logger.info(
            "ReservationApplicationService",
            "予約をキャンセルしました",
            Some(cancelled.id().as_uuid()),
            None,
        );

        let event = BookingCancelled::new(
            cancelled.id(),
            cancelled.route_id(),
            cancelled.seat_number(),
        );
        self.event_publisher
            .publish(&DomainEvent::BookingCancelled(event))
            .map_err(|e| ApplicationError::EventPublishingFailed(e.to_string()))?;

        Ok(cancelled)
    }

    /// 指定された利用者の全予約を取得
    /// 予約日時の降順で並べて返す
    pub async fn get_bookings_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Booking>, ApplicationError> {
        self.store
            .bookings_for_user(user_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// すべての予約を取得（運行管理者向け一覧）
    /// 予約日時の降順で並べて返す
    pub async fn get_all_bookings(&self) -> Result<Vec<Booking>, ApplicationError> {
        self.store.all_bookings().await.map_err(ApplicationError::from)
    }
}

/// 路線アプリケーションサービス
pub struct RouteApplicationService {
    store: Arc<ReservationStore>,
    event_publisher: Arc<dyn EventPublisher>,
    logger: Arc<dyn Logger>,
}

impl RouteApplicationService {
    /// 新しい路線アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `store` - 予約ストア
    /// * `event_publisher` - イベント発行者
    /// * `logger` - ロガー
    pub fn new(
        store: Arc<ReservationStore>,
        event_publisher: Arc<dyn EventPublisher>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            store,
            event_publisher,
            logger,
        }
    }

    /// すべての路線を取得
    /// 路線名の昇順で並べて返す
    pub async fn get_all_routes(&self) -> Result<Vec<BusRoute>, ApplicationError> {
        self.store.list_routes().await.map_err(ApplicationError::from)
    }

    /// 路線IDで路線を取得
    pub async fn get_route_by_id(&self, route_id: RouteId) -> Result<BusRoute, ApplicationError> {
        self.store.get_route(route_id).await.map_err(ApplicationError::from)
    }

    /// 新しい路線を登録
    ///
    /// # Arguments
    /// * `name` - 路線名
    /// * `source` - 出発地
    /// * `destination` - 目的地
    /// * `departure_time` - 出発時刻（表示用文字列）
    /// * `arrival_time` - 到着時刻（表示用文字列）
    /// * `total_seats` - 座席数
    /// * `ticket_price` - 運賃
    #[allow(clippy::too_many_arguments)]
    pub async fn create_route(
        &self,
        name: String,
        source: String,
        destination: String,
        departure_time: String,
        arrival_time: String,
        total_seats: u32,
        ticket_price: Money,
    ) -> Result<BusRoute, ApplicationError> {
        let route = BusRoute::new(
            RouteId::new(),
            name,
            source,
            destination,
            departure_time,
            arrival_time,
            total_seats,
            ticket_price,
        )?;
        self.store.add_route(&route).await?;

        self.logger.info(
            "RouteApplicationService",
            "路線を登録しました",
            Some(route.id().as_uuid()),
            None,
        );

        Ok(route)
    }

    /// 路線を部分更新する
    /// 座席数の削減は既存予約の最大座席番号を下回れない
    pub async fn update_route(
        &self,
        route_id: RouteId,
        update: RouteUpdate,
    ) -> Result<BusRoute, ApplicationError> {
        let previous_total = match update.total_seats {
            Some(_) => Some(self.store.get_route(route_id).await?.total_seats()),
            None => None,
        };

        let route = self.store.update_route(route_id, &update).await?;

        if let Some(previous) = previous_total {
            if previous != route.total_seats() {
                let event = CapacityAdjusted::new(route_id, previous, route.total_seats());
                self.event_publisher
                    .publish(&DomainEvent::CapacityAdjusted(event))
                    .map_err(|e| ApplicationError::EventPublishingFailed(e.to_string()))?;
            }
        }

        Ok(route)
    }

    /// 路線の座席数を変更する
    ///
    /// # Returns
    /// * `Ok(BusRoute)` - 更新後の路線
    /// * `Err(ApplicationError::DomainError(CapacityBelowBookedSeat))` - 削減が予約と衝突
    pub async fn adjust_capacity(
        &self,
        route_id: RouteId,
        new_total: u32,
    ) -> Result<BusRoute, ApplicationError> {
        let (previous_total, route) = self.store.update_capacity(route_id, new_total).await?;

        let mut context = HashMap::new();
        context.insert("previous_total".to_string(), previous_total.to_string());
        context.insert("new_total".to_string(), new_total.to_string());
        self.logger.info(
            "RouteApplicationService",
            "路線の座席数を変更しました",
            Some(route_id.as_uuid()),
            Some(context),
        );

        if previous_total != new_total {
            let event = CapacityAdjusted::new(route_id, previous_total, new_total);
            self.event_publisher
                .publish(&DomainEvent::CapacityAdjusted(event))
                .map_err(|e| ApplicationError::EventPublishingFailed(e.to_string()))?;
        }

        Ok(route)
    }

    /// 路線を削除する
    /// その路線の予約もカスケード削除される
    ///
    /// # Returns
    /// * `Ok(u64)` - カスケード削除された予約の件数
    pub async fn remove_route(&self, route_id: RouteId) -> Result<u64, ApplicationError> {
        let removed = self.store.remove_route(route_id).await?;

        let mut context = HashMap::new();
        context.insert("removed_bookings".to_string(), removed.to_string());
        self.logger.info(
            "RouteApplicationService",
            "路線を削除しました",
            Some(route_id.as_uuid()),
            Some(context),
        );

        let event = RouteRemoved::new(route_id, removed);
        self.event_publisher
            .publish(&DomainEvent::RouteRemoved(event))
            .map_err(|e| ApplicationError::EventPublishingFailed(e.to_string()))?;

        Ok(removed)
    }
}

/// 認証アプリケーションサービス
/// ログイン時にアカウントがなければ利用者として自動登録する
pub struct AuthApplicationService {
    user_repository: Arc<dyn UserRepository>,
    logger: Arc<dyn Logger>,
}

impl AuthApplicationService {
    /// 新しい認証アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `user_repository` - 利用者リポジトリ
    /// * `logger` - ロガー
    pub fn new(user_repository: Arc<dyn UserRepository>, logger: Arc<dyn Logger>) -> Self {
        Self {
            user_repository,
            logger,
        }
    }

    /// ログインする
    /// ユーザー名が未登録なら利用者（Rider）として自動登録してログインする。
    /// 既存ユーザーの場合はパスワードが一致しなければ認証失敗
    ///
    /// # Returns
    /// * `Ok(User)` - ログインした利用者
    /// * `Err(ApplicationError::AuthenticationFailed)` - パスワード不一致
    pub async fn login_or_register(
        &self,
        username: String,
        password: String,
    ) -> Result<User, ApplicationError> {
        if let Some(user) = self.user_repository.find_by_username(&username).await? {
            if user.password() != password {
                return Err(ApplicationError::AuthenticationFailed(
                    "パスワードが正しくありません".to_string(),
                ));
            }
            return Ok(user);
        }

        let user = User::new(UserId::new(), username, password, Role::Rider)?;
        self.user_repository.insert(&user).await?;

        self.logger.info(
            "AuthApplicationService",
            "利用者を自動登録しました",
            Some(user.id().as_uuid()),
            None,
        );

        Ok(user)
    }

    /// 利用者IDで利用者を取得
    pub async fn get_user_by_id(&self, user_id: UserId) -> Result<User, ApplicationError> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("利用者が見つかりません: {}", user_id))
            })
    }
}

/// メッセージアプリケーションサービス
/// 利用者から運行管理者への問い合わせフィード
pub struct MessageApplicationService {
    message_repository: Arc<dyn MessageRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl MessageApplicationService {
    /// 新しいメッセージアプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `message_repository` - メッセージリポジトリ
    /// * `user_repository` - 利用者リポジトリ
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            message_repository,
            user_repository,
        }
    }

    /// メッセージを投稿する
    pub async fn post_message(
        &self,
        sender_id: UserId,
        content: String,
    ) -> Result<Message, ApplicationError> {
        let message = Message::new(MessageId::new(), sender_id, content)?;
        self.message_repository.insert(&message).await?;
        Ok(message)
    }

    /// すべてのメッセージを送信者とともに取得
    /// 送信日時の昇順で並べて返す。送信者が削除済みの場合は None
    pub async fn get_all_messages(
        &self,
    ) -> Result<Vec<(Message, Option<User>)>, ApplicationError> {
        let messages = self.message_repository.find_all().await?;
        let mut result = Vec::with_capacity(messages.len());
        for message in messages {
            let sender = self.user_repository.find_by_id(message.sender_id()).await?;
            result.push((message, sender));
        }
        Ok(result)
    }
}
