/// ドメイン層のエラー型
/// ビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 座席番号が範囲外（有効範囲は 1..=total_seats）
    InvalidSeat { seat: u32, total_seats: u32 },
    /// 座席が既に予約されている（競合の通常の結果であり、システム障害ではない）
    SeatTaken { seat: u32 },
    /// 座席数の削減が既存予約の最大座席番号を下回る
    CapacityBelowBookedSeat { requested: u32, highest_booked: u32 },
    /// 無効な座席数（路線は1席以上必要）
    InvalidCapacity(u32),
    /// 無効な運賃（負の金額など）
    InvalidPrice(i64),
    /// 通貨の不一致
    CurrencyMismatch,
    /// 路線の検証失敗（例: 名称が空）
    RouteValidation(String),
    /// 無効な値
    InvalidValue(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::InvalidSeat { seat, total_seats } => {
                write!(f, "Invalid seat {} (valid range: 1..={})", seat, total_seats)
            }
            DomainError::SeatTaken { seat } => write!(f, "Seat {} is already taken", seat),
            DomainError::CapacityBelowBookedSeat {
                requested,
                highest_booked,
            } => write!(
                f,
                "Capacity {} is below highest booked seat {}",
                requested, highest_booked
            ),
            DomainError::InvalidCapacity(n) => write!(f, "Invalid capacity: {}", n),
            DomainError::InvalidPrice(amount) => write!(f, "Invalid price: {}", amount),
            DomainError::CurrencyMismatch => write!(f, "Currency mismatch"),
            DomainError::RouteValidation(msg) => write!(f, "Route validation failed: {}", msg),
            DomainError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
