use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{BusRoute, Money, RouteId};
use crate::domain::port::{RepositoryError, RouteRepository};
use async_trait::async_trait;

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQL路線リポジトリ
/// MySQLデータベースを使用して路線を永続化する
#[derive(Clone)]
pub struct MySqlRouteRepository {
    pool: Pool<MySql>,
}

impl MySqlRouteRepository {
    /// 新しいMySQL路線リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行から路線を再構築する
    fn route_from_row(row: &sqlx::mysql::MySqlRow) -> Result<BusRoute, RepositoryError> {
        let route_id = RouteId::from_string(row.get("id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("路線IDの解析に失敗しました: {}", e))
        })?;

        let ticket_price = Money::new(
            row.get::<i64, _>("ticket_price_amount"),
            row.get::<String, _>("ticket_price_currency"),
        )
        .map_err(|e| RepositoryError::FetchFailed(format!("運賃の構築に失敗しました: {}", e)))?;

        BusRoute::reconstruct(
            route_id,
            row.get("name"),
            row.get("source"),
            row.get("destination"),
            row.get("departure_time"),
            row.get("arrival_time"),
            row.get::<u32, _>("total_seats"),
            ticket_price,
        )
        .map_err(|e| RepositoryError::FetchFailed(format!("路線の再構築に失敗しました: {}", e)))
    }
}

#[async_trait]
impl RouteRepository for MySqlRouteRepository {
    async fn save(&self, route: &BusRoute) -> Result<(), RepositoryError> {
        // 路線データをbus_routesテーブルにUPSERT
        sqlx::query(
            r#"
            INSERT INTO bus_routes (id, name, source, destination, departure_time, arrival_time, total_seats, ticket_price_amount, ticket_price_currency)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                name = VALUES(name),
                source = VALUES(source),
                destination = VALUES(destination),
                departure_time = VALUES(departure_time),
                arrival_time = VALUES(arrival_time),
                total_seats = VALUES(total_seats),
                ticket_price_amount = VALUES(ticket_price_amount),
                ticket_price_currency = VALUES(ticket_price_currency)
            "#,
        )
        .bind(route.id().to_string())
        .bind(route.name())
        .bind(route.source())
        .bind(route.destination())
        .bind(route.departure_time())
        .bind(route.arrival_time())
        .bind(route.total_seats())
        .bind(route.ticket_price().amount())
        .bind(route.ticket_price().currency())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("路線の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_id(&self, route_id: RouteId) -> Result<Option<BusRoute>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, source, destination, departure_time, arrival_time, total_seats, ticket_price_amount, ticket_price_currency FROM bus_routes WHERE id = ?"
        )
        .bind(route_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("路線の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(Self::route_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<BusRoute>, RepositoryError> {
        // 路線名の昇順で並べる
        let rows = sqlx::query(
            "SELECT id, name, source, destination, departure_time, arrival_time, total_seats, ticket_price_amount, ticket_price_currency FROM bus_routes ORDER BY name ASC"
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("路線一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let mut routes = Vec::new();
        for row in rows {
            routes.push(Self::route_from_row(&row)?);
        }

        Ok(routes)
    }

    async fn delete(&self, route_id: RouteId) -> Result<(), RepositoryError> {
        // 存在しない路線の削除は黙って成功する
        sqlx::query("DELETE FROM bus_routes WHERE id = ?")
            .bind(route_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("路線の削除に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        Ok(())
    }
}
