use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use uuid::Uuid;

use crate::adapter::driver::request_dto::{
    CreateBookingRequest, CreateRouteRequest, LoginRequest, SendMessageRequest, UpdateRouteRequest,
};
use crate::adapter::driver::response_dto::{
    AvailabilityResponse, BookingResponse, LoginResponse, MessageResponse, RouteResponse,
    UserResponse,
};
use crate::adapter::driver::session::SessionStore;
use crate::application::service::{
    AuthApplicationService, MessageApplicationService, ReservationApplicationService,
    RouteApplicationService,
};
use crate::application::ApplicationError;
use crate::domain::model::{BookingId, Money, RouteId, User};

// REST API用のエラーDTO
#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

// アプリケーションサービスを含む状態
pub type AppState = AppStateInner;

#[derive(Clone)]
pub struct AppStateInner {
    pub reservation_service: Arc<ReservationApplicationService>,
    pub route_service: Arc<RouteApplicationService>,
    pub auth_service: Arc<AuthApplicationService>,
    pub message_service: Arc<MessageApplicationService>,
    pub session_store: SessionStore,
}

// REST APIルーターを作成
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/me", get(me))
        .route("/api/buses", get(get_routes).post(create_route))
        .route(
            "/api/buses/:route_id",
            get(get_route_by_id)
                .patch(update_route)
                .delete(delete_route),
        )
        .route("/api/buses/:route_id/availability", get(get_availability))
        .route("/api/bookings", get(get_all_bookings).post(create_booking))
        .route("/api/bookings/:booking_id", delete(cancel_booking))
        .route("/api/my-bookings", get(get_my_bookings))
        .route("/api/messages", get(get_messages).post(send_message))
}

// ヘルスチェックエンドポイント
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "bus-reservation-system",
        "version": "0.1.0"
    }))
}

/// AuthorizationヘッダーのBearerトークンを取り出す
fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .and_then(|value| Uuid::parse_str(value).ok())
}

fn unauthorized(message: &str) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiError {
            error: message.to_string(),
            code: "NOT_LOGGED_IN".to_string(),
        }),
    )
}

/// リクエストのセッショントークンからログイン中の利用者を解決する
async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<User, (StatusCode, Json<ApiError>)> {
    let token = bearer_token(headers).ok_or_else(|| unauthorized("ログインしていません"))?;
    let user_id = state
        .session_store
        .resolve(token)
        .ok_or_else(|| unauthorized("セッションが無効です"))?;

    state
        .auth_service
        .get_user_by_id(user_id)
        .await
        .map_err(|_| unauthorized("利用者が見つかりません"))
}

/// 運行管理者権限を要求する
fn require_operator(user: &User) -> Result<(), (StatusCode, Json<ApiError>)> {
    if !user.is_operator() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiError {
                error: "運行管理者権限が必要です".to_string(),
                code: "FORBIDDEN".to_string(),
            }),
        ));
    }
    Ok(())
}

// ログインエンドポイント
// ユーザー名が未登録なら利用者として自動登録する
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<ApiError>)> {
    match state
        .auth_service
        .login_or_register(request.username, request.password)
        .await
    {
        Ok(user) => {
            let token = state.session_store.create(user.id());
            Ok(Json(LoginResponse {
                token: token.to_string(),
                user: UserResponse::from_user(&user),
            }))
        }
        Err(err) => Err(map_application_error(err)),
    }
}

// ログアウトエンドポイント
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ApiError>)> {
    if let Some(token) = bearer_token(&headers) {
        state.session_store.destroy(token);
    }
    Ok(Json(serde_json::json!({ "message": "ログアウトしました" })))
}

// ログイン中の利用者情報エンドポイント
async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserResponse>, (StatusCode, Json<ApiError>)> {
    let user = authenticate(&state, &headers).await?;
    Ok(Json(UserResponse::from_user(&user)))
}

// 路線一覧取得エンドポイント
async fn get_routes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RouteResponse>>, (StatusCode, Json<ApiError>)> {
    match state.route_service.get_all_routes().await {
        Ok(routes) => Ok(Json(routes.iter().map(RouteResponse::from_route).collect())),
        Err(err) => Err(map_application_error(err)),
    }
}

// 路線詳細取得エンドポイント
async fn get_route_by_id(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
) -> Result<Json<RouteResponse>, (StatusCode, Json<ApiError>)> {
    let route_id = RouteId::from_uuid(route_id);

    match state.route_service.get_route_by_id(route_id).await {
        Ok(route) => Ok(Json(RouteResponse::from_route(&route))),
        Err(err) => Err(map_application_error(err)),
    }
}

// 空席状況取得エンドポイント
async fn get_availability(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
) -> Result<Json<AvailabilityResponse>, (StatusCode, Json<ApiError>)> {
    let route_id = RouteId::from_uuid(route_id);

    match state.reservation_service.list_availability(route_id).await {
        Ok(availability) => Ok(Json(AvailabilityResponse::from_availability(&availability))),
        Err(err) => Err(map_application_error(err)),
    }
}

// 路線作成エンドポイント（運行管理者のみ）
async fn create_route(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateRouteRequest>,
) -> Result<(StatusCode, Json<RouteResponse>), (StatusCode, Json<ApiError>)> {
    let user = authenticate(&state, &headers).await?;
    require_operator(&user)?;

    let ticket_price = match Money::new(request.ticket_price, "INR".to_string()) {
        Ok(price) => price,
        Err(err) => return Err(map_domain_error(err)),
    };

    match state
        .route_service
        .create_route(
            request.name,
            request.source,
            request.destination,
            request.departure_time,
            request.arrival_time,
            request.total_seats,
            ticket_price,
        )
        .await
    {
        Ok(route) => Ok((StatusCode::CREATED, Json(RouteResponse::from_route(&route)))),
        Err(err) => Err(map_application_error(err)),
    }
}

// 路線更新エンドポイント（運行管理者のみ）
async fn update_route(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
    headers: HeaderMap,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<RouteResponse>, (StatusCode, Json<ApiError>)> {
    let user = authenticate(&state, &headers).await?;
    require_operator(&user)?;

    let route_id = RouteId::from_uuid(route_id);
    let update = match request.into_route_update() {
        Ok(update) => update,
        Err(err) => return Err(map_domain_error(err)),
    };

    match state.route_service.update_route(route_id, update).await {
        Ok(route) => Ok(Json(RouteResponse::from_route(&route))),
        Err(err) => Err(map_application_error(err)),
    }
}

// 路線削除エンドポイント（運行管理者のみ）
// その路線の予約もカスケード削除される
async fn delete_route(
    State(state): State<AppState>,
    Path(route_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let user = authenticate(&state, &headers).await?;
    require_operator(&user)?;

    let route_id = RouteId::from_uuid(route_id);

    match state.route_service.remove_route(route_id).await {
        Ok(_removed) => Ok(StatusCode::NO_CONTENT),
        Err(err) => Err(map_application_error(err)),
    }
}

// 予約一覧取得エンドポイント（運行管理者のみ）
async fn get_all_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<BookingResponse>>, (StatusCode, Json<ApiError>)> {
    let user = authenticate(&state, &headers).await?;
    require_operator(&user)?;

    match state.reservation_service.get_all_bookings().await {
        Ok(bookings) => Ok(Json(
            bookings.iter().map(BookingResponse::from_booking).collect(),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 自分の予約一覧取得エンドポイント
async fn get_my_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<BookingResponse>>, (StatusCode, Json<ApiError>)> {
    let user = authenticate(&state, &headers).await?;

    match state
        .reservation_service
        .get_bookings_by_user(user.id())
        .await
    {
        Ok(bookings) => Ok(Json(
            bookings.iter().map(BookingResponse::from_booking).collect(),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 予約作成エンドポイント
async fn create_booking(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), (StatusCode, Json<ApiError>)> {
    let user = authenticate(&state, &headers).await?;
    let route_id = RouteId::from_uuid(request.route_id);

    match state
        .reservation_service
        .reserve_seat(route_id, request.seat_number, user.id())
        .await
    {
        Ok(booking) => Ok((
            StatusCode::CREATED,
            Json(BookingResponse::from_booking(&booking)),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 予約キャンセルエンドポイント
// 利用者は自分の予約のみ、運行管理者は任意の予約をキャンセルできる
async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let user = authenticate(&state, &headers).await?;
    let booking_id = BookingId::from_uuid(booking_id);

    match state
        .reservation_service
        .cancel_seat(booking_id, &user)
        .await
    {
        Ok(_cancelled) => Ok(StatusCode::NO_CONTENT),
        Err(err) => Err(map_application_error(err)),
    }
}

// メッセージ一覧取得エンドポイント
async fn get_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<MessageResponse>>, (StatusCode, Json<ApiError>)> {
    authenticate(&state, &headers).await?;

    match state.message_service.get_all_messages().await {
        Ok(messages) => Ok(Json(
            messages
                .iter()
                .map(|(message, sender)| MessageResponse::from_message(message, sender.as_ref()))
                .collect(),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// メッセージ送信エンドポイント
async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), (StatusCode, Json<ApiError>)> {
    let user = authenticate(&state, &headers).await?;

    match state
        .message_service
        .post_message(user.id(), request.content)
        .await
    {
        Ok(message) => Ok((
            StatusCode::CREATED,
            Json(MessageResponse::from_message(&message, Some(&user))),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// アプリケーションエラーをHTTPエラーにマッピング
fn map_application_error(err: ApplicationError) -> (StatusCode, Json<ApiError>) {
    match err {
        ApplicationError::DomainError(domain_err) => map_domain_error(domain_err),
        ApplicationError::RepositoryError(repo_err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError {
                error: format!("{}", repo_err),
                code: "REPOSITORY_ERROR".to_string(),
            }),
        ),
        ApplicationError::EventPublishingFailed(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError {
                error: msg,
                code: "PUBLISHER_ERROR".to_string(),
            }),
        ),
        ApplicationError::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: msg,
                code: "NOT_FOUND".to_string(),
            }),
        ),
        ApplicationError::AuthenticationFailed(msg) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiError {
                error: msg,
                code: "INVALID_PASSWORD".to_string(),
            }),
        ),
        ApplicationError::PermissionDenied(msg) => (
            StatusCode::FORBIDDEN,
            Json(ApiError {
                error: msg,
                code: "FORBIDDEN".to_string(),
            }),
        ),
    }
}

// ドメインエラーを適切なHTTPステータスコードとエラーコードにマッピング
fn map_domain_error(domain_err: crate::domain::error::DomainError) -> (StatusCode, Json<ApiError>) {
    use crate::domain::error::DomainError;

    match domain_err {
        // 座席競合は再試行せず409でそのまま報告する
        DomainError::SeatTaken { seat } => (
            StatusCode::CONFLICT,
            Json(ApiError {
                error: format!("座席{}は既に予約されています", seat),
                code: "SEAT_TAKEN".to_string(),
            }),
        ),
        DomainError::InvalidSeat { seat, total_seats } => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: format!(
                    "座席番号{}は無効です（有効範囲: 1〜{}）",
                    seat, total_seats
                ),
                code: "INVALID_SEAT".to_string(),
            }),
        ),
        DomainError::CapacityBelowBookedSeat {
            requested,
            highest_booked,
        } => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: format!(
                    "座席数を{}に削減できません（座席{}に予約があります）",
                    requested, highest_booked
                ),
                code: "CAPACITY_BELOW_BOOKED_SEAT".to_string(),
            }),
        ),
        DomainError::InvalidCapacity(capacity) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: format!("無効な座席数です: {}", capacity),
                code: "INVALID_CAPACITY".to_string(),
            }),
        ),
        DomainError::InvalidPrice(amount) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: format!("無効な運賃です: {}", amount),
                code: "INVALID_PRICE".to_string(),
            }),
        ),
        DomainError::CurrencyMismatch => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "通貨が一致しません".to_string(),
                code: "CURRENCY_MISMATCH".to_string(),
            }),
        ),
        DomainError::RouteValidation(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: msg,
                code: "ROUTE_VALIDATION".to_string(),
            }),
        ),
        DomainError::InvalidValue(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: msg,
                code: "INVALID_VALUE".to_string(),
            }),
        ),
    }
}
