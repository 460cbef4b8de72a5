// 駆動される側アダプター（リポジトリ実装など）

mod booking_repository;
mod console_logger;
mod event_publisher;
mod message_repository;
mod route_repository;
mod user_repository;

pub use booking_repository::MySqlBookingRepository;
pub use console_logger::{ConsoleLogger, LogEntry};
pub use event_publisher::ConsoleEventPublisher;
pub use message_repository::MySqlMessageRepository;
pub use route_repository::MySqlRouteRepository;
pub use user_repository::MySqlUserRepository;
