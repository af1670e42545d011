//! Reservation API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_manager;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    // 员工路由：自助预订、取消、签到、可预订查询
    let staff_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/attendance/confirm", post(handler::confirm_attendance))
        .route("/availability", get(handler::availability));

    // 管理路由：列表、状态修改、硬删除
    let manage_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}", delete(handler::remove))
        .layer(middleware::from_fn(require_manager));

    staff_routes.merge(manage_routes)
}
