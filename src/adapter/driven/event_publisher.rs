use crate::domain::event::DomainEvent;
use crate::domain::port::{EventPublisher, PublisherError};

/// コンソールイベント発行者
/// ドメインイベントをコンソールに出力する
pub struct ConsoleEventPublisher;

impl ConsoleEventPublisher {
    /// 新しいコンソールイベント発行者を作成
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleEventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for ConsoleEventPublisher {
    fn publish(&self, event: &DomainEvent) -> Result<(), PublisherError> {
        match event {
            DomainEvent::SeatReserved(e) => {
                println!("🎫 [イベント] 座席予約");
                println!("  予約ID: {}", e.booking_id);
                println!("  路線ID: {}", e.route_id);
                println!("  座席番号: {}", e.seat_number);
                println!("  利用者ID: {}", e.user_id);
                println!("  発生日時: {}", e.occurred_at.format("%Y-%m-%d %H:%M:%S"));
            }
            DomainEvent::BookingCancelled(e) => {
                println!("❌ [イベント] 予約キャンセル");
                println!("  予約ID: {}", e.booking_id);
                println!("  路線ID: {}", e.route_id);
                println!("  解放された座席番号: {}", e.seat_number);
                println!("  発生日時: {}", e.occurred_at.format("%Y-%m-%d %H:%M:%S"));
            }
            DomainEvent::CapacityAdjusted(e) => {
                println!("🚌 [イベント] 座席数変更");
                println!("  路線ID: {}", e.route_id);
                println!("  変更前: {}席", e.previous_total);
                println!("  変更後: {}席", e.new_total);
                println!("  発生日時: {}", e.occurred_at.format("%Y-%m-%d %H:%M:%S"));
            }
            DomainEvent::RouteRemoved(e) => {
                println!("🗑️ [イベント] 路線削除");
                println!("  路線ID: {}", e.route_id);
                println!("  カスケード削除された予約数: {}", e.removed_bookings);
                println!("  発生日時: {}", e.occurred_at.format("%Y-%m-%d %H:%M:%S"));
            }
        }
        println!(); // 空行を追加
        Ok(())
    }
}
