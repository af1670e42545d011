//! Roster Server - 连锁咖啡馆排班服务
//!
//! # 架构概述
//!
//! 本模块是 Roster Server 的主入口，提供以下核心功能：
//!
//! - **排班核心** (`scheduling`): 预订生命周期、容量与时间冲突规则
//! - **数据库** (`db`): SQLite 存储与 repository 层
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **HTTP API** (`api`): RESTful API 接口
//! - **Bot 对话** (`bot`): 基于显式状态机的会话层
//! - **通知** (`services::notifier`): fire-and-forget 通知队列
//!
//! # 模块结构
//!
//! ```text
//! roster-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、角色检查
//! ├── scheduling/    # 排班与预订核心
//! ├── api/           # HTTP 路由和处理器
//! ├── bot/           # 会话状态机
//! ├── services/      # 通知队列
//! ├── db/            # 数据库层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod bot;
pub mod core;
pub mod db;
pub mod scheduling;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, build_app};
pub use scheduling::SchedulePolicy;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____            __
   / __ \____  _____/ /____  _____
  / /_/ / __ \/ ___/ __/ _ \/ ___/
 / _, _/ /_/ (__  ) /_/  __/ /
/_/ |_|\____/____/\__/\___/_/
    "#
    );
}
