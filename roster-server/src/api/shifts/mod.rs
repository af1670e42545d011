//! Shift API 模块

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_manager;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/shifts", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：任何已登录用户
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/summary", get(handler::summary));

    // 管理路由：店长或管理员
    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/{id}/change-booking", post(handler::change_booking))
        .layer(middleware::from_fn(require_manager));

    read_routes.merge(manage_routes)
}
