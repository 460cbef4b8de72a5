use crate::domain::model::{BusRoute, Money, Role, RouteId, User, UserId};
use crate::domain::port::{RepositoryError, RouteRepository, UserRepository};
use std::sync::Arc;

/// 初期データ投入
/// 運行管理者アカウント・デモ利用者・デモ路線を登録する。
/// べき等: 既に存在するデータは再投入しない
pub struct DatabaseSeeder {
    route_repository: Arc<dyn RouteRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl DatabaseSeeder {
    /// 新しいDatabaseSeederインスタンスを作成
    pub fn new(
        route_repository: Arc<dyn RouteRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            route_repository,
            user_repository,
        }
    }

    /// 初期データを投入する
    pub async fn run(&self) -> Result<(), RepositoryError> {
        self.ensure_user("admin", "password", Role::Operator).await?;
        self.ensure_user("citizen", "password", Role::Rider).await?;
        self.ensure_demo_routes().await?;
        Ok(())
    }

    /// 指定されたユーザー名のアカウントがなければ作成する
    async fn ensure_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<(), RepositoryError> {
        if self.user_repository.find_by_username(username).await?.is_some() {
            return Ok(());
        }

        let user = User::new(
            UserId::new(),
            username.to_string(),
            password.to_string(),
            role,
        )
        .map_err(|e| RepositoryError::OperationFailed(format!("初期利用者の構築に失敗しました: {}", e)))?;
        self.user_repository.insert(&user).await
    }

    /// デモ路線がひとつもなければ投入する
    async fn ensure_demo_routes(&self) -> Result<(), RepositoryError> {
        if !self.route_repository.find_all().await?.is_empty() {
            return Ok(());
        }

        let cities = [
            "Churu (चूरू)",
            "Taranagar (तारानगर)",
            "Sardarshahar (सरदारशहर)",
            "Bikaner (बीकानेर)",
            "Buchawas (बुचावास)",
            "Gelegti (गेलेगटी)",
            "Mehri (मेहरी)",
            "Nohar (नोहर)",
        ];

        let demo_routes: [(&str, &str, &str, &str, &str, u32, i64); 7] = [
            ("Churu Express", cities[0], cities[3], "08:00 AM", "11:00 AM", 40, 150),
            ("Taranagar Local", cities[1], cities[0], "09:30 AM", "10:30 AM", 30, 50),
            ("Sardarshahar Deluxe", cities[2], cities[3], "07:00 AM", "10:30 AM", 45, 200),
            ("Nohar Seva", cities[7], cities[2], "11:00 AM", "01:30 PM", 35, 120),
            ("Buchawas Connect", cities[4], cities[1], "06:30 AM", "07:15 AM", 25, 30),
            ("Mehri Link", cities[5], cities[0], "02:00 PM", "03:00 PM", 30, 60),
            ("Gelegti Express", cities[6], cities[7], "04:00 PM", "05:00 PM", 30, 70),
        ];

        for (name, source, destination, departure, arrival, total_seats, price) in demo_routes {
            let route = BusRoute::new(
                RouteId::new(),
                name.to_string(),
                source.to_string(),
                destination.to_string(),
                departure.to_string(),
                arrival.to_string(),
                total_seats,
                Money::inr(price),
            )
            .map_err(|e| {
                RepositoryError::OperationFailed(format!("デモ路線の構築に失敗しました: {}", e))
            })?;
            self.route_repository.save(&route).await?;
        }

        Ok(())
    }
}
