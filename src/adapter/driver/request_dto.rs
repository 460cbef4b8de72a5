use crate::domain::model::RouteUpdate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ログイン用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 路線作成用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateRouteRequest {
    pub name: String,
    pub source: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub total_seats: u32,
    pub ticket_price: i64, // INR
}

/// 路線更新用のリクエストDTO
/// 指定されていないフィールドは変更しない
#[derive(Serialize, Deserialize, Default)]
pub struct UpdateRouteRequest {
    pub name: Option<String>,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub total_seats: Option<u32>,
    pub ticket_price: Option<i64>,
}

impl UpdateRouteRequest {
    /// ドメインの部分更新オブジェクトに変換
    pub fn into_route_update(self) -> Result<RouteUpdate, crate::domain::error::DomainError> {
        let ticket_price = match self.ticket_price {
            Some(amount) => Some(crate::domain::model::Money::new(amount, "INR".to_string())?),
            None => None,
        };
        Ok(RouteUpdate {
            name: self.name,
            source: self.source,
            destination: self.destination,
            departure_time: self.departure_time,
            arrival_time: self.arrival_time,
            total_seats: self.total_seats,
            ticket_price,
        })
    }
}

/// 予約作成用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub route_id: Uuid,
    pub seat_number: u32,
}

/// メッセージ送信用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_serialization() {
        let request = LoginRequest {
            username: "citizen".to_string(),
            password: "password".to_string(),
        };

        let json = serde_json::to_string(&request).unwrap();
        let _deserialized: LoginRequest = serde_json::from_str(&json).unwrap();

        assert!(json.contains("username"));
        assert!(json.contains("password"));
    }

    #[test]
    fn test_create_booking_request_serialization() {
        let request = CreateBookingRequest {
            route_id: Uuid::new_v4(),
            seat_number: 12,
        };

        let json = serde_json::to_string(&request).unwrap();
        let _deserialized: CreateBookingRequest = serde_json::from_str(&json).unwrap();

        assert!(json.contains("route_id"));
        assert!(json.contains("seat_number"));
    }

    #[test]
    fn test_update_route_request_partial_fields() {
        let json = r#"{"total_seats": 50}"#;
        let request: UpdateRouteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.total_seats, Some(50));
        assert!(request.name.is_none());

        let update = request.into_route_update().unwrap();
        assert_eq!(update.total_seats, Some(50));
        assert!(update.ticket_price.is_none());
    }

    #[test]
    fn test_update_route_request_negative_price_rejected() {
        let request = UpdateRouteRequest {
            ticket_price: Some(-10),
            ..Default::default()
        };
        assert!(request.into_route_update().is_err());
    }
}
