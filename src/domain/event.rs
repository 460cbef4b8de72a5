use crate::domain::model::{BookingId, RouteId, UserId};
use chrono::{DateTime, Utc};

/// ドメインイベント列挙型
/// ビジネス上の重要なイベントを表現する
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// 座席が予約された
    SeatReserved(SeatReserved),
    /// 予約がキャンセルされた
    BookingCancelled(BookingCancelled),
    /// 路線の座席数が変更された
    CapacityAdjusted(CapacityAdjusted),
    /// 路線が削除された（予約のカスケード削除を含む）
    RouteRemoved(RouteRemoved),
}

/// 座席予約イベント
#[derive(Debug, Clone)]
pub struct SeatReserved {
    /// 予約ID
    pub booking_id: BookingId,
    /// 路線ID
    pub route_id: RouteId,
    /// 座席番号
    pub seat_number: u32,
    /// 利用者ID
    pub user_id: UserId,
    /// イベント発生日時
    pub occurred_at: DateTime<Utc>,
}

impl SeatReserved {
    /// 新しい座席予約イベントを作成
    pub fn new(booking_id: BookingId, route_id: RouteId, seat_number: u32, user_id: UserId) -> Self {
        Self {
            booking_id,
            route_id,
            seat_number,
            user_id,
            occurred_at: Utc::now(),
        }
    }
}

/// 予約キャンセルイベント
#[derive(Debug, Clone)]
pub struct BookingCancelled {
    /// 予約ID
    pub booking_id: BookingId,
    /// 路線ID
    pub route_id: RouteId,
    /// 解放された座席番号
    pub seat_number: u32,
    /// イベント発生日時
    pub occurred_at: DateTime<Utc>,
}

impl BookingCancelled {
    /// 新しい予約キャンセルイベントを作成
    pub fn new(booking_id: BookingId, route_id: RouteId, seat_number: u32) -> Self {
        Self {
            booking_id,
            route_id,
            seat_number,
            occurred_at: Utc::now(),
        }
    }
}

/// 座席数変更イベント
#[derive(Debug, Clone)]
pub struct CapacityAdjusted {
    /// 路線ID
    pub route_id: RouteId,
    /// 変更前の座席数
    pub previous_total: u32,
    /// 変更後の座席数
    pub new_total: u32,
    /// イベント発生日時
    pub occurred_at: DateTime<Utc>,
}

impl CapacityAdjusted {
    /// 新しい座席数変更イベントを作成
    pub fn new(route_id: RouteId, previous_total: u32, new_total: u32) -> Self {
        Self {
            route_id,
            previous_total,
            new_total,
            occurred_at: Utc::now(),
        }
    }
}

/// 路線削除イベント
#[derive(Debug, Clone)]
pub struct RouteRemoved {
    /// 路線ID
    pub route_id: RouteId,
    /// カスケード削除された予約の件数
    pub removed_bookings: u64,
    /// イベント発生日時
    pub occurred_at: DateTime<Utc>,
}

impl RouteRemoved {
    /// 新しい路線削除イベントを作成
    pub fn new(route_id: RouteId, removed_bookings: u64) -> Self {
        Self {
            route_id,
            removed_bookings,
            occurred_at: Utc::now(),
        }
    }
}
