use crate::domain::model::{Booking, BusRoute, Message, SeatAvailability, User};
use serde::Serialize;

/// 利用者用のレスポンスDTO
/// パスワードは含めない
#[derive(Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub username: String,
    pub role: String,
}

/// ログイン用のレスポンスDTO
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// 路線用のレスポンスDTO
#[derive(Serialize)]
pub struct RouteResponse {
    pub route_id: String,
    pub name: String,
    pub source: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub total_seats: u32,
    pub ticket_price_amount: i64,
    pub ticket_price_currency: String,
}

/// 空席状況用のレスポンスDTO
#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub route_id: String,
    pub total_seats: u32,
    pub taken_seats: Vec<u32>,
    pub free_seats: Vec<u32>,
}

/// 予約用のレスポンスDTO
#[derive(Serialize)]
pub struct BookingResponse {
    pub booking_id: String,
    pub user_id: String,
    pub route_id: String,
    pub seat_number: u32,
    pub booked_at: String,
}

/// メッセージ用のレスポンスDTO
#[derive(Serialize)]
pub struct MessageResponse {
    pub message_id: String,
    pub sender_id: String,
    pub sender_username: Option<String>,
    pub content: String,
    pub sent_at: String,
}

impl UserResponse {
    /// ドメインオブジェクトからUserResponseを作成
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id().to_string(),
            username: user.username().to_string(),
            role: user.role().to_string(),
        }
    }
}

impl RouteResponse {
    /// ドメインオブジェクトからRouteResponseを作成
    pub fn from_route(route: &BusRoute) -> Self {
        Self {
            route_id: route.id().to_string(),
            name: route.name().to_string(),
            source: route.source().to_string(),
            destination: route.destination().to_string(),
            departure_time: route.departure_time().to_string(),
            arrival_time: route.arrival_time().to_string(),
            total_seats: route.total_seats(),
            ticket_price_amount: route.ticket_price().amount(),
            ticket_price_currency: route.ticket_price().currency(),
        }
    }
}

impl AvailabilityResponse {
    /// ドメインオブジェクトからAvailabilityResponseを作成
    pub fn from_availability(availability: &SeatAvailability) -> Self {
        Self {
            route_id: availability.route_id().to_string(),
            total_seats: availability.total_seats(),
            taken_seats: availability.taken_seats().iter().copied().collect(),
            free_seats: availability.free_seats().iter().copied().collect(),
        }
    }
}

impl BookingResponse {
    /// ドメインオブジェクトからBookingResponseを作成
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id().to_string(),
            user_id: booking.user_id().to_string(),
            route_id: booking.route_id().to_string(),
            seat_number: booking.seat_number(),
            booked_at: booking.booked_at().to_rfc3339(),
        }
    }
}

impl MessageResponse {
    /// ドメインオブジェクトからMessageResponseを作成
    /// 送信者が削除済みの場合、ユーザー名は None
    pub fn from_message(message: &Message, sender: Option<&User>) -> Self {
        Self {
            message_id: message.id().to_string(),
            sender_id: message.sender_id().to_string(),
            sender_username: sender.map(|u| u.username().to_string()),
            content: message.content().to_string(),
            sent_at: message.sent_at().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BookingId, Money, Role, RouteId, UserId};

    #[test]
    fn test_user_response_excludes_password() {
        let user = User::new(
            UserId::new(),
            "citizen".to_string(),
            "secret".to_string(),
            Role::Rider,
        )
        .unwrap();
        let response = UserResponse::from_user(&user);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("citizen"));
        assert!(json.contains("rider"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_route_response_from_route() {
        let route = BusRoute::new(
            RouteId::new(),
            "Churu Express".to_string(),
            "Churu (चूरू)".to_string(),
            "Bikaner (बीकानेर)".to_string(),
            "08:00 AM".to_string(),
            "11:00 AM".to_string(),
            40,
            Money::inr(150),
        )
        .unwrap();

        let response = RouteResponse::from_route(&route);
        assert_eq!(response.name, "Churu Express");
        assert_eq!(response.total_seats, 40);
        assert_eq!(response.ticket_price_amount, 150);
        assert_eq!(response.ticket_price_currency, "INR");
    }

    #[test]
    fn test_booking_response_from_booking() {
        let booking = Booking::new(BookingId::new(), UserId::new(), RouteId::new(), 7);
        let response = BookingResponse::from_booking(&booking);
        assert_eq!(response.seat_number, 7);
        assert_eq!(response.booking_id, booking.id().to_string());
    }
}
