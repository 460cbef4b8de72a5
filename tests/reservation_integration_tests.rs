use bus_reservation_system::adapter::driven::{ConsoleEventPublisher, ConsoleLogger};
use bus_reservation_system::application::service::{
    ReservationApplicationService, RouteApplicationService,
};
use bus_reservation_system::application::ApplicationError;
use bus_reservation_system::domain::error::DomainError;
use bus_reservation_system::domain::model::{
    Booking, BookingId, BusRoute, Money, Role, RouteId, User, UserId,
};
use bus_reservation_system::domain::port::{BookingRepository, RepositoryError, RouteRepository};
use bus_reservation_system::domain::store::{ReservationStore, StoreError};

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

// テスト用のモックリポジトリ
struct MockRouteRepository {
    routes: Arc<Mutex<HashMap<RouteId, BusRoute>>>,
}

impl MockRouteRepository {
    fn new() -> Self {
        Self {
            routes: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl RouteRepository for MockRouteRepository {
    async fn save(&self, route: &BusRoute) -> Result<(), RepositoryError> {
        let mut routes = self.routes.lock().await;
        routes.insert(route.id(), route.clone());
        Ok(())
    }

    async fn find_by_id(&self, route_id: RouteId) -> Result<Option<BusRoute>, RepositoryError> {
        let routes = self.routes.lock().await;
        Ok(routes.get(&route_id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<BusRoute>, RepositoryError> {
        let routes = self.routes.lock().await;
        let mut all: Vec<BusRoute> = routes.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(all)
    }

    async fn delete(&self, route_id: RouteId) -> Result<(), RepositoryError> {
        let mut routes = self.routes.lock().await;
        routes.remove(&route_id);
        Ok(())
    }
}

struct MockBookingRepository {
    bookings: Arc<Mutex<HashMap<BookingId, Booking>>>,
}

impl MockBookingRepository {
    fn new() -> Self {
        Self {
            bookings: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl BookingRepository for MockBookingRepository {
    async fn insert(&self, booking: &Booking) -> Result<(), RepositoryError> {
        let mut bookings = self.bookings.lock().await;
        // ストレージ層のバックストップ一意性制約の模倣
        if bookings
            .values()
            .any(|b| b.route_id() == booking.route_id() && b.seat_number() == booking.seat_number())
        {
            return Err(RepositoryError::ConstraintViolation(format!(
                "duplicate seat {} on route {}",
                booking.seat_number(),
                booking.route_id()
            )));
        }
        bookings.insert(booking.id(), booking.clone());
        Ok(())
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>, RepositoryError> {
        let bookings = self.bookings.lock().await;
        Ok(bookings.get(&booking_id).cloned())
    }

    async fn find_by_route(&self, route_id: RouteId) -> Result<Vec<Booking>, RepositoryError> {
        let bookings = self.bookings.lock().await;
        let mut found: Vec<Booking> = bookings
            .values()
            .filter(|b| b.route_id() == route_id)
            .cloned()
            .collect();
        found.sort_by_key(|b| b.seat_number());
        Ok(found)
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Booking>, RepositoryError> {
        let bookings = self.bookings.lock().await;
        let mut found: Vec<Booking> = bookings
            .values()
            .filter(|b| b.user_id() == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.booked_at().cmp(&a.booked_at()));
        Ok(found)
    }

    async fn find_all(&self) -> Result<Vec<Booking>, RepositoryError> {
        let bookings = self.bookings.lock().await;
        let mut all: Vec<Booking> = bookings.values().cloned().collect();
        all.sort_by(|a, b| b.booked_at().cmp(&a.booked_at()));
        Ok(all)
    }

    async fn booked_seats(&self, route_id: RouteId) -> Result<BTreeSet<u32>, RepositoryError> {
        let bookings = self.bookings.lock().await;
        Ok(bookings
            .values()
            .filter(|b| b.route_id() == route_id)
            .map(|b| b.seat_number())
            .collect())
    }

    async fn highest_booked_seat(
        &self,
        route_id: RouteId,
    ) -> Result<Option<u32>, RepositoryError> {
        let bookings = self.bookings.lock().await;
        Ok(bookings
            .values()
            .filter(|b| b.route_id() == route_id)
            .map(|b| b.seat_number())
            .max())
    }

    async fn delete(&self, booking_id: BookingId) -> Result<(), RepositoryError> {
        let mut bookings = self.bookings.lock().await;
        bookings.remove(&booking_id);
        Ok(())
    }

    async fn delete_by_route(&self, route_id: RouteId) -> Result<u64, RepositoryError> {
        let mut bookings = self.bookings.lock().await;
        let before = bookings.len();
        bookings.retain(|_, b| b.route_id() != route_id);
        Ok((before - bookings.len()) as u64)
    }
}

// テスト用のセットアップヘルパー
struct TestFixture {
    store: Arc<ReservationStore>,
    reservation_service: Arc<ReservationApplicationService>,
    route_service: Arc<RouteApplicationService>,
}

fn build_fixture() -> TestFixture {
    let store = Arc::new(ReservationStore::new(
        Arc::new(MockRouteRepository::new()),
        Arc::new(MockBookingRepository::new()),
    ));
    let event_publisher = Arc::new(ConsoleEventPublisher::new());
    let logger = Arc::new(ConsoleLogger::new());

    TestFixture {
        store: store.clone(),
        reservation_service: Arc::new(ReservationApplicationService::new(
            store.clone(),
            event_publisher.clone(),
            logger.clone(),
        )),
        route_service: Arc::new(RouteApplicationService::new(
            store,
            event_publisher,
            logger,
        )),
    }
}

fn sample_route(name: &str, total_seats: u32) -> BusRoute {
    BusRoute::new(
        RouteId::new(),
        name.to_string(),
        "Churu (चूरू)".to_string(),
        "Bikaner (बीकानेर)".to_string(),
        "08:00 AM".to_string(),
        "11:00 AM".to_string(),
        total_seats,
        Money::inr(150),
    )
    .unwrap()
}

fn rider() -> User {
    User::new(
        UserId::new(),
        format!("rider-{}", UserId::new()),
        "password".to_string(),
        Role::Rider,
    )
    .unwrap()
}

fn operator() -> User {
    User::new(
        UserId::new(),
        "admin".to_string(),
        "password".to_string(),
        Role::Operator,
    )
    .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_seat_exactly_one_succeeds() {
    let fixture = build_fixture();
    let route = sample_route("Churu Express", 40);
    let route_id = route.id();
    fixture.store.add_route(&route).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = fixture.reservation_service.clone();
        handles.push(tokio::spawn(async move {
            service.reserve_seat(route_id, 7, UserId::new()).await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(ApplicationError::DomainError(DomainError::SeatTaken { seat: 7 })) => {
                conflicts += 1
            }
            other => panic!("unexpected outcome: {:?}", other.map(|b| b.id())),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 9);

    // 座席7の予約はちょうど1件
    let availability = fixture
        .reservation_service
        .list_availability(route_id)
        .await
        .unwrap();
    assert!(availability.taken_seats().contains(&7));
    assert_eq!(availability.taken_seats().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_seats_all_succeed() {
    let fixture = build_fixture();
    let route = sample_route("Sardarshahar Deluxe", 45);
    let route_id = route.id();
    fixture.store.add_route(&route).await.unwrap();

    let mut handles = Vec::new();
    for seat in 1..=20u32 {
        let service = fixture.reservation_service.clone();
        handles.push(tokio::spawn(async move {
            service.reserve_seat(route_id, seat, UserId::new()).await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let availability = fixture
        .reservation_service
        .list_availability(route_id)
        .await
        .unwrap();
    assert_eq!(availability.taken_seats().len(), 20);
    assert_eq!(availability.free_seats().len(), 25);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reservations_on_distinct_routes() {
    let fixture = build_fixture();
    let route_a = sample_route("Taranagar Local", 30);
    let route_b = sample_route("Nohar Seva", 35);
    fixture.store.add_route(&route_a).await.unwrap();
    fixture.store.add_route(&route_b).await.unwrap();

    // 別路線の同じ座席番号は互いに独立して成功する
    let service_a = fixture.reservation_service.clone();
    let service_b = fixture.reservation_service.clone();
    let (id_a, id_b) = (route_a.id(), route_b.id());
    let handle_a =
        tokio::spawn(async move { service_a.reserve_seat(id_a, 5, UserId::new()).await });
    let handle_b =
        tokio::spawn(async move { service_b.reserve_seat(id_b, 5, UserId::new()).await });

    assert!(handle_a.await.unwrap().is_ok());
    assert!(handle_b.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_reserve_cancel_reserve_cycle() {
    let fixture = build_fixture();
    let route = sample_route("Mehri Link", 30);
    let route_id = route.id();
    fixture.store.add_route(&route).await.unwrap();

    let first_rider = rider();
    let booking = fixture
        .reservation_service
        .reserve_seat(route_id, 12, first_rider.id())
        .await
        .unwrap();

    // 本人によるキャンセル
    fixture
        .reservation_service
        .cancel_seat(booking.id(), &first_rider)
        .await
        .unwrap();

    // 解放された座席は別の利用者が予約できる
    let second = fixture
        .reservation_service
        .reserve_seat(route_id, 12, UserId::new())
        .await
        .unwrap();
    assert_ne!(second.id(), booking.id());
}

#[tokio::test]
async fn test_cancel_requires_ownership_or_operator() {
    let fixture = build_fixture();
    let route = sample_route("Buchawas Connect", 25);
    let route_id = route.id();
    fixture.store.add_route(&route).await.unwrap();

    let owner = rider();
    let booking = fixture
        .reservation_service
        .reserve_seat(route_id, 3, owner.id())
        .await
        .unwrap();

    // 他の利用者はキャンセルできない
    let stranger = rider();
    let result = fixture
        .reservation_service
        .cancel_seat(booking.id(), &stranger)
        .await;
    assert!(matches!(result, Err(ApplicationError::PermissionDenied(_))));

    // 運行管理者は任意の予約をキャンセルできる
    fixture
        .reservation_service
        .cancel_seat(booking.id(), &operator())
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancel_reserve_race_keeps_uniqueness() {
    let fixture = build_fixture();
    let route = sample_route("Gelegti Express", 30);
    let route_id = route.id();
    fixture.store.add_route(&route).await.unwrap();

    let owner = rider();
    let booking = fixture
        .reservation_service
        .reserve_seat(route_id, 9, owner.id())
        .await
        .unwrap();

    // キャンセルと同一座席への新規予約を同時に走らせる
    let cancel_service = fixture.reservation_service.clone();
    let cancel_owner = owner.clone();
    let booking_id = booking.id();
    let cancel_handle =
        tokio::spawn(
            async move { cancel_service.cancel_seat(booking_id, &cancel_owner).await },
        );

    let reserve_service = fixture.reservation_service.clone();
    let reserve_handle =
        tokio::spawn(async move { reserve_service.reserve_seat(route_id, 9, UserId::new()).await });

    let cancel_result = cancel_handle.await.unwrap();
    let reserve_result = reserve_handle.await.unwrap();

    // キャンセルは必ず成功する。新規予約はキャンセルの前後どちらに
    // 直列化されたかで成否が変わるが、どちらでも座席9の予約は高々1件
    assert!(cancel_result.is_ok());
    let availability = fixture
        .reservation_service
        .list_availability(route_id)
        .await
        .unwrap();
    match reserve_result {
        Ok(_) => assert!(availability.taken_seats().contains(&9)),
        Err(ApplicationError::DomainError(DomainError::SeatTaken { .. })) => {
            assert!(!availability.taken_seats().contains(&9))
        }
        other => panic!("unexpected outcome: {:?}", other.map(|b| b.id())),
    }
    assert!(availability.taken_seats().len() <= 1);
}

#[tokio::test]
async fn test_capacity_adjustment_floor_sequence() {
    let fixture = build_fixture();
    let route = sample_route("Churu Express", 10);
    let route_id = route.id();
    fixture.store.add_route(&route).await.unwrap();

    fixture
        .reservation_service
        .reserve_seat(route_id, 10, UserId::new())
        .await
        .unwrap();

    // 最大予約座席(10)を下回る削減は拒否
    let result = fixture.route_service.adjust_capacity(route_id, 5).await;
    assert!(matches!(
        result,
        Err(ApplicationError::DomainError(
            DomainError::CapacityBelowBookedSeat {
                requested: 5,
                highest_booked: 10,
            }
        ))
    ));

    // ちょうど10まではno-opとして受理
    let route = fixture
        .route_service
        .adjust_capacity(route_id, 10)
        .await
        .unwrap();
    assert_eq!(route.total_seats(), 10);

    // 拡張は常に受理され、新しい座席が空席として現れる
    let route = fixture
        .route_service
        .adjust_capacity(route_id, 20)
        .await
        .unwrap();
    assert_eq!(route.total_seats(), 20);

    let availability = fixture
        .reservation_service
        .list_availability(route_id)
        .await
        .unwrap();
    assert_eq!(availability.free_seats().len(), 19);
    assert!(availability.free_seats().contains(&20));
}

#[tokio::test]
async fn test_route_removal_cascades_bookings() {
    let fixture = build_fixture();
    let route = sample_route("Nohar Seva", 35);
    let route_id = route.id();
    fixture.store.add_route(&route).await.unwrap();

    let user = rider();
    let booking1 = fixture
        .reservation_service
        .reserve_seat(route_id, 1, user.id())
        .await
        .unwrap();
    let booking2 = fixture
        .reservation_service
        .reserve_seat(route_id, 2, user.id())
        .await
        .unwrap();

    let removed = fixture.route_service.remove_route(route_id).await.unwrap();
    assert_eq!(removed, 2);

    // 路線と予約の両方が消えている
    assert!(matches!(
        fixture.route_service.get_route_by_id(route_id).await,
        Err(ApplicationError::NotFound(_))
    ));
    for booking_id in [booking1.id(), booking2.id()] {
        assert!(matches!(
            fixture.store.get_booking(booking_id).await,
            Err(StoreError::BookingNotFound(_))
        ));
    }

    // 利用者の予約一覧からも消えている
    let remaining = fixture
        .reservation_service
        .get_bookings_by_user(user.id())
        .await
        .unwrap();
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn test_seat_range_validation_boundaries() {
    let fixture = build_fixture();
    let route = sample_route("Taranagar Local", 30);
    let route_id = route.id();
    fixture.store.add_route(&route).await.unwrap();

    for seat in [0u32, 31] {
        let result = fixture
            .reservation_service
            .reserve_seat(route_id, seat, UserId::new())
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::DomainError(DomainError::InvalidSeat { .. }))
        ));
    }

    // 境界値1と30は有効
    for seat in [1u32, 30] {
        assert!(fixture
            .reservation_service
            .reserve_seat(route_id, seat, UserId::new())
            .await
            .is_ok());
    }
}
