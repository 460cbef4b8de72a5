// 予約ストア
// 路線と予約の唯一の権威であり、座席の一意性不変条件を守る
// 同期が必要なのはこの層だけで、上位のアプリケーションサービスは状態を持たない

use crate::domain::error::DomainError;
use crate::domain::model::{Booking, BookingId, BusRoute, RouteId, RouteUpdate, UserId};
use crate::domain::port::{BookingRepository, RepositoryError, RouteRepository};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

/// ストア操作のエラー型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Route not found: {0}")]
    RouteNotFound(RouteId),
    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 予約ストア
/// 排他ドメインは路線単位: 路線Aのロック取得が路線Bの操作を
/// ブロックすることはない。ロックは初回アクセス時に遅延生成され、
/// 路線が存在する間は削除されない
pub struct ReservationStore {
    route_repository: Arc<dyn RouteRepository>,
    booking_repository: Arc<dyn BookingRepository>,
    route_locks: Mutex<HashMap<RouteId, Arc<Mutex<()>>>>,
}

impl ReservationStore {
    /// 新しい予約ストアを作成
    ///
    /// # Arguments
    /// * `route_repository` - 路線リポジトリ
    /// * `booking_repository` - 予約リポジトリ
    pub fn new(
        route_repository: Arc<dyn RouteRepository>,
        booking_repository: Arc<dyn BookingRepository>,
    ) -> Self {
        Self {
            route_repository,
            booking_repository,
            route_locks: Mutex::new(HashMap::new()),
        }
    }

    /// 指定された路線の排他ロックを取得（なければ遅延生成）
    async fn route_lock(&self, route_id: RouteId) -> Arc<Mutex<()>> {
        let mut locks = self.route_locks.lock().await;
        locks
            .entry(route_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// 路線IDで路線を取得
    pub async fn get_route(&self, route_id: RouteId) -> Result<BusRoute, StoreError> {
        self.route_repository
            .find_by_id(route_id)
            .await?
            .ok_or(StoreError::RouteNotFound(route_id))
    }

    /// すべての路線を取得
    pub async fn list_routes(&self) -> Result<Vec<BusRoute>, StoreError> {
        Ok(self.route_repository.find_all().await?)
    }

    /// 新しい路線を登録
    /// 集約のバリデーションは BusRoute::new 側で済んでいる前提
    pub async fn add_route(&self, route: &BusRoute) -> Result<(), StoreError> {
        self.route_repository.save(route).await?;
        Ok(())
    }

    /// 指定された路線の予約済み座席番号の集合を取得
    /// 呼び出し時点の一貫したスナップショット（単一のリポジトリ読み取り）
    pub async fn booked_seats(&self, route_id: RouteId) -> Result<BTreeSet<u32>, StoreError> {
        // 路線の存在確認を先に行い、存在しない路線と空の路線を区別する
        self.get_route(route_id).await?;
        Ok(self.booking_repository.booked_seats(route_id).await?)
    }

    /// 座席の予約を試みる
    /// 「座席が空いているか」の確認と「予約を記録する」操作は、
    /// 同一路線に対する他の予約操作と完全に直列化された1つの原子的単位。
    /// 同じ (路線, 座席) を同時に要求した2者は必ず一方だけが成功し、
    /// 他方は `DomainError::SeatTaken` を受け取る。敗者への再試行は行わない
    ///
    /// # Returns
    /// * `Ok(Booking)` - 予約成功（リポジトリへの記録完了後に返る）
    /// * `Err(StoreError::RouteNotFound)` - 路線が存在しない
    /// * `Err(StoreError::Domain(InvalidSeat))` - 座席番号が範囲外
    /// * `Err(StoreError::Domain(SeatTaken))` - 座席が既に予約済み
    pub async fn try_reserve(
        &self,
        route_id: RouteId,
        seat_number: u32,
        user_id: UserId,
    ) -> Result<Booking, StoreError> {
        let lock = self.route_lock(route_id).await;
        let _guard = lock.lock().await;

        let route = self
            .route_repository
            .find_by_id(route_id)
            .await?
            .ok_or(StoreError::RouteNotFound(route_id))?;

        route.validate_seat(seat_number)?;

        let taken = self.booking_repository.booked_seats(route_id).await?;
        if taken.contains(&seat_number) {
            return Err(DomainError::SeatTaken { seat: seat_number }.into());
        }

        let booking = Booking::new(BookingId::new(), user_id, route_id, seat_number);
        match self.booking_repository.insert(&booking).await {
            Ok(()) => Ok(booking),
            // ストレージ層の一意性制約はロックに対するバックストップ。
            // ここに到達した場合も呼び出し側には通常の競合結果として報告する
            Err(RepositoryError::ConstraintViolation(_)) => {
                Err(DomainError::SeatTaken { seat: seat_number }.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 予約をキャンセルする
    /// 同一路線の try_reserve と直列化され、キャンセルと予約の競合で
    /// 同一座席に二重予約が生じる隙間を作らない
    ///
    /// # Returns
    /// * `Ok(Booking)` - 削除された予約
    /// * `Err(StoreError::BookingNotFound)` - 予約が存在しない（キャンセル済み含む）
    pub async fn cancel(&self, booking_id: BookingId) -> Result<Booking, StoreError> {
        // ロック対象の路線を知るため、ロック取得前に一度読む
        let booking = self
            .booking_repository
            .find_by_id(booking_id)
            .await?
            .ok_or(StoreError::BookingNotFound(booking_id))?;

        let lock = self.route_lock(booking.route_id()).await;
        let _guard = lock.lock().await;

        // ロック下で再読し、同時キャンセルや路線削除との競合を排除する
        let booking = self
            .booking_repository
            .find_by_id(booking_id)
            .await?
            .ok_or(StoreError::BookingNotFound(booking_id))?;

        self.booking_repository.delete(booking_id).await?;
        Ok(booking)
    }

    /// 路線の座席数を変更する
    /// 既存予約の最大座席番号を下回る削減は拒否する（定員フロア）
    ///
    /// # Returns
    /// * `Ok((previous_total, BusRoute))` - 変更前の座席数と更新後の路線
    /// * `Err(StoreError::Domain(CapacityBelowBookedSeat))` - 削減が予約と衝突
    pub async fn update_capacity(
        &self,
        route_id: RouteId,
        new_total: u32,
    ) -> Result<(u32, BusRoute), StoreError> {
        let lock = self.route_lock(route_id).await;
        let _guard = lock.lock().await;

        let mut route = self
            .route_repository
            .find_by_id(route_id)
            .await?
            .ok_or(StoreError::RouteNotFound(route_id))?;

        self.check_capacity_floor(route_id, new_total).await?;

        let previous_total = route.total_seats();
        route.set_total_seats(new_total)?;
        self.route_repository.save(&route).await?;
        Ok((previous_total, route))
    }

    /// 路線を部分更新する
    /// 座席数を含む更新は update_capacity と同じ定員フロアチェックを通る
    pub async fn update_route(
        &self,
        route_id: RouteId,
        update: &RouteUpdate,
    ) -> Result<BusRoute, StoreError> {
        let lock = self.route_lock(route_id).await;
        let _guard = lock.lock().await;

        let mut route = self
            .route_repository
            .find_by_id(route_id)
            .await?
            .ok_or(StoreError::RouteNotFound(route_id))?;

        if let Some(new_total) = update.total_seats {
            self.check_capacity_floor(route_id, new_total).await?;
        }

        route.apply_update(update)?;
        self.route_repository.save(&route).await?;
        Ok(route)
    }

    /// 路線を削除する
    /// その路線の予約もカスケード削除する（文書化された副作用であり、
    /// 黙殺ではなく削除件数を返す）
    ///
    /// # Returns
    /// * `Ok(u64)` - カスケード削除された予約の件数
    pub async fn remove_route(&self, route_id: RouteId) -> Result<u64, StoreError> {
        let lock = self.route_lock(route_id).await;
        let _guard = lock.lock().await;

        // 存在しない路線の削除は NotFound として報告する
        self.route_repository
            .find_by_id(route_id)
            .await?
            .ok_or(StoreError::RouteNotFound(route_id))?;

        let removed = self.booking_repository.delete_by_route(route_id).await?;
        self.route_repository.delete(route_id).await?;

        // 路線が消えたのでロックエントリも破棄する。
        // 進行中の操作が持つ Arc クローンはそのまま有効で、
        // 遅れてきた try_reserve はエントリを再生成した上で RouteNotFound になる
        self.route_locks.lock().await.remove(&route_id);

        Ok(removed)
    }

    /// 予約IDで予約を取得
    pub async fn get_booking(&self, booking_id: BookingId) -> Result<Booking, StoreError> {
        self.booking_repository
            .find_by_id(booking_id)
            .await?
            .ok_or(StoreError::BookingNotFound(booking_id))
    }

    /// 指定された利用者の全予約を取得
    pub async fn bookings_for_user(&self, user_id: UserId) -> Result<Vec<Booking>, StoreError> {
        Ok(self.booking_repository.find_by_user(user_id).await?)
    }

    /// すべての予約を取得（運行管理者向け一覧）
    pub async fn all_bookings(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(self.booking_repository.find_all().await?)
    }

    /// 定員フロアチェック
    /// new_total が既存予約の最大座席番号を下回っていないことを確認する
    async fn check_capacity_floor(
        &self,
        route_id: RouteId,
        new_total: u32,
    ) -> Result<(), StoreError> {
        if new_total == 0 {
            return Err(DomainError::InvalidCapacity(new_total).into());
        }
        if let Some(highest) = self.booking_repository.highest_booked_seat(route_id).await? {
            if new_total < highest {
                return Err(DomainError::CapacityBelowBookedSeat {
                    requested: new_total,
                    highest_booked: highest,
                }
                .into());
            }
        }
        Ok(())
    }
}
