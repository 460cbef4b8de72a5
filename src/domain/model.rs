// ドメインモデル（エンティティと値オブジェクト）

mod availability;
mod booking;
mod message;
mod route;
mod user;
mod value_objects;

pub use value_objects::{
    BookingId, Currency, MessageId, Money, Role, RouteId, UserId,
};

pub use availability::SeatAvailability;
pub use booking::Booking;
pub use message::Message;
pub use route::{BusRoute, RouteUpdate};
pub use user::User;
