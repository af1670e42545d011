//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 登录和当前用户
//! - [`cafes`] - 咖啡馆管理接口
//! - [`staff`] - 员工管理接口
//! - [`shifts`] - 班次管理接口
//! - [`reservations`] - 预订接口 (排班核心的外部入口)
//! - [`bot`] - bot 平台回调

pub mod auth;
pub mod bot;
pub mod cafes;
pub mod health;
pub mod reservations;
pub mod shifts;
pub mod staff;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
