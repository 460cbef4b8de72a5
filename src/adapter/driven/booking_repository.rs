use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{Booking, BookingId, RouteId, UserId};
use crate::domain::port::{BookingRepository, RepositoryError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQL予約リポジトリ
/// MySQLデータベースを使用して予約を永続化する。
/// (route_id, seat_number) の一意性はテーブルのUNIQUE制約でも保証される
#[derive(Clone)]
pub struct MySqlBookingRepository {
    pool: Pool<MySql>,
}

impl MySqlBookingRepository {
    /// 新しいMySQL予約リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行から予約を再構築する
    fn booking_from_row(row: &sqlx::mysql::MySqlRow) -> Result<Booking, RepositoryError> {
        let booking_id = BookingId::from_string(row.get("id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("予約IDの解析に失敗しました: {}", e))
        })?;
        let user_id = UserId::from_string(row.get("user_id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("利用者IDの解析に失敗しました: {}", e))
        })?;
        let route_id = RouteId::from_string(row.get("route_id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("路線IDの解析に失敗しました: {}", e))
        })?;

        Ok(Booking::reconstruct(
            booking_id,
            user_id,
            route_id,
            row.get::<u32, _>("seat_number"),
            row.get::<DateTime<Utc>, _>("booked_at"),
        ))
    }
}

#[async_trait]
impl BookingRepository for MySqlBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), RepositoryError> {
        // 一意性制約違反は ConstraintViolation として報告し、
        // 上位層が座席競合として扱えるようにする
        sqlx::query(
            r#"
            INSERT INTO bookings (id, user_id, route_id, seat_number, booked_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(booking.id().to_string())
        .bind(booking.user_id().to_string())
        .bind(booking.route_id().to_string())
        .bind(booking.seat_number())
        .bind(booking.booked_at())
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, user_id, route_id, seat_number, booked_at FROM bookings WHERE id = ?",
        )
        .bind(booking_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("予約の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(Self::booking_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_route(&self, route_id: RouteId) -> Result<Vec<Booking>, RepositoryError> {
        // 座席番号の昇順で並べる
        let rows = sqlx::query(
            "SELECT id, user_id, route_id, seat_number, booked_at FROM bookings WHERE route_id = ? ORDER BY seat_number ASC"
        )
        .bind(route_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("路線の予約一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let mut bookings = Vec::new();
        for row in rows {
            bookings.push(Self::booking_from_row(&row)?);
        }

        Ok(bookings)
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Booking>, RepositoryError> {
        // 予約日時の降順で並べる
        let rows = sqlx::query(
            "SELECT id, user_id, route_id, seat_number, booked_at FROM bookings WHERE user_id = ? ORDER BY booked_at DESC"
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("利用者の予約一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let mut bookings = Vec::new();
        for row in rows {
            bookings.push(Self::booking_from_row(&row)?);
        }

        Ok(bookings)
    }

    async fn find_all(&self) -> Result<Vec<Booking>, RepositoryError> {
        // 予約日時の降順で並べる
        let rows = sqlx::query(
            "SELECT id, user_id, route_id, seat_number, booked_at FROM bookings ORDER BY booked_at DESC"
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("予約一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let mut bookings = Vec::new();
        for row in rows {
            bookings.push(Self::booking_from_row(&row)?);
        }

        Ok(bookings)
    }

    async fn booked_seats(&self, route_id: RouteId) -> Result<BTreeSet<u32>, RepositoryError> {
        let rows = sqlx::query("SELECT seat_number FROM bookings WHERE route_id = ?")
            .bind(route_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("予約済み座席の取得に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        let mut seats = BTreeSet::new();
        for row in rows {
            seats.insert(row.get::<u32, _>("seat_number"));
        }

        Ok(seats)
    }

    async fn highest_booked_seat(
        &self,
        route_id: RouteId,
    ) -> Result<Option<u32>, RepositoryError> {
        let row = sqlx::query(
            "SELECT MAX(seat_number) AS highest_seat FROM bookings WHERE route_id = ?",
        )
        .bind(route_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::QueryError(format!("最大予約座席の取得に失敗しました: {}", e))
        })
        .map_err(RepositoryError::from)?;

        Ok(row.get::<Option<u32>, _>("highest_seat"))
    }

    async fn delete(&self, booking_id: BookingId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(booking_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("予約の削除に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn delete_by_route(&self, route_id: RouteId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM bookings WHERE route_id = ?")
            .bind(route_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("路線の予約削除に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        Ok(result.rows_affected())
    }
}
