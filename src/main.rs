use bus_reservation_system::adapter::driven::{
    ConsoleEventPublisher, ConsoleLogger, MySqlBookingRepository, MySqlMessageRepository,
    MySqlRouteRepository, MySqlUserRepository,
};
use bus_reservation_system::adapter::driver::rest_api::{create_router, AppStateInner};
use bus_reservation_system::adapter::driver::session::SessionStore;
use bus_reservation_system::adapter::{DatabaseConfig, DatabaseMigration, DatabaseSeeder};
use bus_reservation_system::application::service::{
    AuthApplicationService, MessageApplicationService, ReservationApplicationService,
    RouteApplicationService,
};
use bus_reservation_system::domain::store::ReservationStore;

use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== バス座席予約システム REST API ===");
    println!();

    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    // データベース設定を読み込む
    let config = DatabaseConfig::from_env()?;
    println!(
        "データベース設定を読み込みました: {}:{}",
        config.host, config.port
    );

    // 接続プールを作成
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await?;
    println!("データベース接続プールを作成しました");

    // マイグレーションを実行
    let migration = DatabaseMigration::new(pool.clone());
    migration.run().await?;
    println!("データベースマイグレーションを実行しました");

    // MySQLリポジトリを作成
    let route_repository = Arc::new(MySqlRouteRepository::new(pool.clone()));
    let booking_repository = Arc::new(MySqlBookingRepository::new(pool.clone()));
    let user_repository = Arc::new(MySqlUserRepository::new(pool.clone()));
    let message_repository = Arc::new(MySqlMessageRepository::new(pool.clone()));

    // 初期データを投入（べき等）
    let seeder = DatabaseSeeder::new(route_repository.clone(), user_repository.clone());
    seeder.run().await?;
    println!("初期データを投入しました");

    // 予約ストアを作成
    // 座席の排他制御はすべてこのストアを経由する
    let store = Arc::new(ReservationStore::new(
        route_repository.clone(),
        booking_repository.clone(),
    ));

    // ロガーとイベント発行者を作成
    let logger = Arc::new(ConsoleLogger::new());
    let event_publisher = Arc::new(ConsoleEventPublisher::new());

    // アプリケーションサービスを作成
    let reservation_service = ReservationApplicationService::new(
        store.clone(),
        event_publisher.clone(),
        logger.clone(),
    );
    let route_service =
        RouteApplicationService::new(store.clone(), event_publisher.clone(), logger.clone());
    let auth_service = AuthApplicationService::new(user_repository.clone(), logger.clone());
    let message_service =
        MessageApplicationService::new(message_repository.clone(), user_repository.clone());

    // アプリケーション状態を作成
    let app_state = AppStateInner {
        reservation_service: Arc::new(reservation_service),
        route_service: Arc::new(route_service),
        auth_service: Arc::new(auth_service),
        message_service: Arc::new(message_service),
        session_store: SessionStore::new(),
    };

    // REST APIルーターを作成
    let app = create_router()
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // サーバーを起動
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("REST APIサーバーが起動しました: http://localhost:3000");
    println!("ヘルスチェック: GET http://localhost:3000/health");
    println!("API仕様:");
    println!("  POST   /api/login - ログイン（未登録なら自動登録）");
    println!("  POST   /api/logout - ログアウト");
    println!("  GET    /api/me - ログイン中の利用者情報");
    println!("  GET    /api/buses - 路線一覧取得");
    println!("  GET    /api/buses/:id - 路線詳細取得");
    println!("  GET    /api/buses/:id/availability - 空席状況取得");
    println!("  POST   /api/buses - 路線作成（運行管理者）");
    println!("  PATCH  /api/buses/:id - 路線更新（運行管理者）");
    println!("  DELETE /api/buses/:id - 路線削除（運行管理者）");
    println!("  GET    /api/bookings - 予約一覧取得（運行管理者）");
    println!("  POST   /api/bookings - 座席予約");
    println!("  DELETE /api/bookings/:id - 予約キャンセル");
    println!("  GET    /api/my-bookings - 自分の予約一覧取得");
    println!("  GET    /api/messages - メッセージ一覧取得");
    println!("  POST   /api/messages - メッセージ送信");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}
