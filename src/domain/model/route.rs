use crate::domain::error::DomainError;
use crate::domain::model::{Money, RouteId};

/// BusRoute集約
/// 運行便の座席定員と運賃を管理し、座席番号の有効範囲を定義する
#[derive(Debug, Clone, PartialEq)]
pub struct BusRoute {
    id: RouteId,
    name: String,
    source: String,
    destination: String,
    departure_time: String,
    arrival_time: String,
    total_seats: u32,
    ticket_price: Money,
}

/// 路線の部分更新
/// Noneのフィールドは変更しない
#[derive(Debug, Clone, Default)]
pub struct RouteUpdate {
    pub name: Option<String>,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub total_seats: Option<u32>,
    pub ticket_price: Option<Money>,
}

impl BusRoute {
    /// 新しい路線を作成
    /// バリデーション:
    /// - 名称・出発地・到着地は空でない
    /// - 座席数は1以上
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RouteId,
        name: String,
        source: String,
        destination: String,
        departure_time: String,
        arrival_time: String,
        total_seats: u32,
        ticket_price: Money,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::RouteValidation(
                "路線名は空にできません".to_string(),
            ));
        }
        if source.trim().is_empty() {
            return Err(DomainError::RouteValidation(
                "出発地は空にできません".to_string(),
            ));
        }
        if destination.trim().is_empty() {
            return Err(DomainError::RouteValidation(
                "到着地は空にできません".to_string(),
            ));
        }
        if total_seats == 0 {
            return Err(DomainError::InvalidCapacity(total_seats));
        }

        Ok(Self {
            id,
            name,
            source,
            destination,
            departure_time,
            arrival_time,
            total_seats,
            ticket_price,
        })
    }

    /// データベースから取得したデータで路線を再構築
    /// リポジトリでの使用を想定
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: RouteId,
        name: String,
        source: String,
        destination: String,
        departure_time: String,
        arrival_time: String,
        total_seats: u32,
        ticket_price: Money,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            name,
            source,
            destination,
            departure_time,
            arrival_time,
            total_seats,
            ticket_price,
        })
    }

    /// 路線IDを取得
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// 路線名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 出発地を取得
    pub fn source(&self) -> &str {
        &self.source
    }

    /// 到着地を取得
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// 出発時刻（表示用文字列）を取得
    pub fn departure_time(&self) -> &str {
        &self.departure_time
    }

    /// 到着時刻（表示用文字列）を取得
    pub fn arrival_time(&self) -> &str {
        &self.arrival_time
    }

    /// 座席数を取得
    pub fn total_seats(&self) -> u32 {
        self.total_seats
    }

    /// 運賃を取得
    pub fn ticket_price(&self) -> Money {
        self.ticket_price
    }

    /// 座席番号が有効範囲内かチェック
    /// 有効範囲は 1..=total_seats
    pub fn contains_seat(&self, seat: u32) -> bool {
        seat >= 1 && seat <= self.total_seats
    }

    /// 座席番号を検証
    pub fn validate_seat(&self, seat: u32) -> Result<(), DomainError> {
        if !self.contains_seat(seat) {
            return Err(DomainError::InvalidSeat {
                seat,
                total_seats: self.total_seats,
            });
        }
        Ok(())
    }

    /// 座席数を変更
    /// 予約済み座席との整合性チェック（定員フロア）は呼び出し側の責務
    pub fn set_total_seats(&mut self, total_seats: u32) -> Result<(), DomainError> {
        if total_seats == 0 {
            return Err(DomainError::InvalidCapacity(total_seats));
        }
        self.total_seats = total_seats;
        Ok(())
    }

    /// 部分更新を適用
    /// 座席数の変更は set_total_seats と同じバリデーションを通る
    pub fn apply_update(&mut self, update: &RouteUpdate) -> Result<(), DomainError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(DomainError::RouteValidation(
                    "路線名は空にできません".to_string(),
                ));
            }
            self.name = name.clone();
        }
        if let Some(source) = &update.source {
            if source.trim().is_empty() {
                return Err(DomainError::RouteValidation(
                    "出発地は空にできません".to_string(),
                ));
            }
            self.source = source.clone();
        }
        if let Some(destination) = &update.destination {
            if destination.trim().is_empty() {
                return Err(DomainError::RouteValidation(
                    "到着地は空にできません".to_string(),
                ));
            }
            self.destination = destination.clone();
        }
        if let Some(departure_time) = &update.departure_time {
            self.departure_time = departure_time.clone();
        }
        if let Some(arrival_time) = &update.arrival_time {
            self.arrival_time = arrival_time.clone();
        }
        if let Some(total_seats) = update.total_seats {
            self.set_total_seats(total_seats)?;
        }
        if let Some(ticket_price) = update.ticket_price {
            self.ticket_price = ticket_price;
        }
        Ok(())
    }
}
