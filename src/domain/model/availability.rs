use crate::domain::model::BusRoute;
use std::collections::BTreeSet;

/// 空席情報
/// 路線の定員と予約済み座席の集合から導出される読み取り専用ビュー
/// free_seats = [1..=total_seats] \ taken_seats
#[derive(Debug, Clone, PartialEq)]
pub struct SeatAvailability {
    route_id: crate::domain::model::RouteId,
    total_seats: u32,
    taken_seats: BTreeSet<u32>,
    free_seats: BTreeSet<u32>,
}

impl SeatAvailability {
    /// 路線と予約済み座席の集合から空席情報を導出
    /// 定員範囲外の座席番号が混入していても無視する
    pub fn derive(route: &BusRoute, taken: &BTreeSet<u32>) -> Self {
        let taken_seats: BTreeSet<u32> = taken
            .iter()
            .copied()
            .filter(|seat| route.contains_seat(*seat))
            .collect();
        let free_seats: BTreeSet<u32> = (1..=route.total_seats())
            .filter(|seat| !taken_seats.contains(seat))
            .collect();
        Self {
            route_id: route.id(),
            total_seats: route.total_seats(),
            taken_seats,
            free_seats,
        }
    }

    /// 路線IDを取得
    pub fn route_id(&self) -> crate::domain::model::RouteId {
        self.route_id
    }

    /// 座席数を取得
    pub fn total_seats(&self) -> u32 {
        self.total_seats
    }

    /// 予約済み座席の集合を取得
    pub fn taken_seats(&self) -> &BTreeSet<u32> {
        &self.taken_seats
    }

    /// 空席の集合を取得
    pub fn free_seats(&self) -> &BTreeSet<u32> {
        &self.free_seats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Money, RouteId};

    fn route_with_seats(total_seats: u32) -> BusRoute {
        BusRoute::new(
            RouteId::new(),
            "Taranagar Local".to_string(),
            "Taranagar (तारानगर)".to_string(),
            "Churu (चूरू)".to_string(),
            "09:30 AM".to_string(),
            "10:30 AM".to_string(),
            total_seats,
            Money::inr(50),
        )
        .unwrap()
    }

    #[test]
    fn test_availability_derivation() {
        let route = route_with_seats(10);
        let taken: BTreeSet<u32> = [3, 7].into_iter().collect();

        let availability = SeatAvailability::derive(&route, &taken);

        let expected_free: BTreeSet<u32> = [1, 2, 4, 5, 6, 8, 9, 10].into_iter().collect();
        assert_eq!(availability.taken_seats(), &taken);
        assert_eq!(availability.free_seats(), &expected_free);
    }

    #[test]
    fn test_availability_empty_route() {
        let route = route_with_seats(5);
        let taken = BTreeSet::new();

        let availability = SeatAvailability::derive(&route, &taken);

        assert!(availability.taken_seats().is_empty());
        assert_eq!(availability.free_seats().len(), 5);
    }

    #[test]
    fn test_availability_full_route() {
        let route = route_with_seats(3);
        let taken: BTreeSet<u32> = [1, 2, 3].into_iter().collect();

        let availability = SeatAvailability::derive(&route, &taken);

        assert!(availability.free_seats().is_empty());
    }

    #[test]
    fn test_availability_ignores_out_of_range_seats() {
        // 定員削減後に古いデータが残っていた場合でも導出結果は定員内に収まる
        let route = route_with_seats(4);
        let taken: BTreeSet<u32> = [2, 9].into_iter().collect();

        let availability = SeatAvailability::derive(&route, &taken);

        let expected_taken: BTreeSet<u32> = [2].into_iter().collect();
        let expected_free: BTreeSet<u32> = [1, 3, 4].into_iter().collect();
        assert_eq!(availability.taken_seats(), &expected_taken);
        assert_eq!(availability.free_seats(), &expected_free);
    }
}
