use crate::domain::model::{BookingId, RouteId, UserId};
use chrono::{DateTime, Utc};

/// Booking エンティティ
/// 1人の利用者による1路線・1座席への確定済み予約
/// 作成後は変更されない。明示的なキャンセルか路線削除のカスケードでのみ消える
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    id: BookingId,
    user_id: UserId,
    route_id: RouteId,
    seat_number: u32,
    booked_at: DateTime<Utc>,
}

impl Booking {
    /// 新しい予約を作成
    /// 座席番号の範囲検証は ReservationStore が路線の定員に対して行う
    pub fn new(id: BookingId, user_id: UserId, route_id: RouteId, seat_number: u32) -> Self {
        Self {
            id,
            user_id,
            route_id,
            seat_number,
            booked_at: Utc::now(),
        }
    }

    /// データベースから取得したデータで予約を再構築
    pub fn reconstruct(
        id: BookingId,
        user_id: UserId,
        route_id: RouteId,
        seat_number: u32,
        booked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            route_id,
            seat_number,
            booked_at,
        }
    }

    /// 予約IDを取得
    pub fn id(&self) -> BookingId {
        self.id
    }

    /// 利用者IDを取得
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// 路線IDを取得
    pub fn route_id(&self) -> RouteId {
        self.route_id
    }

    /// 座席番号を取得
    pub fn seat_number(&self) -> u32 {
        self.seat_number
    }

    /// 予約日時を取得
    pub fn booked_at(&self) -> DateTime<Utc> {
        self.booked_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_creation() {
        let booking = Booking::new(BookingId::new(), UserId::new(), RouteId::new(), 12);
        assert_eq!(booking.seat_number(), 12);
    }

    #[test]
    fn test_booking_reconstruct_preserves_timestamp() {
        let booked_at = Utc::now();
        let id = BookingId::new();
        let booking = Booking::reconstruct(id, UserId::new(), RouteId::new(), 3, booked_at);
        assert_eq!(booking.id(), id);
        assert_eq!(booking.booked_at(), booked_at);
    }
}
